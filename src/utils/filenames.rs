//! Turning server-supplied names into safe local file names.

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest file name most file systems accept, in bytes.
pub const MAX_FILENAME_BYTES: usize = 255;

static INVALID_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/:*?"<>|\x00-\x1f\x7f]"#).expect("static regex compile"));

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Strips path separators, reserved punctuation and control characters from
/// `name`, and keeps it under [`MAX_FILENAME_BYTES`].
///
/// ```
/// use slack_exporter::utils::filenames::sanitize_filename;
///
/// assert_eq!(sanitize_filename("../q3: report?.pdf"), "..q3 report.pdf");
/// assert_eq!(sanitize_filename("con.txt"), "con_.txt");
/// ```
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let cleaned = INVALID_CHARS.replace_all(name, "");
    let mut cleaned = cleaned.trim_end_matches([' ', '.']).trim_start().to_string();

    let stem = cleaned.split('.').next().unwrap_or_default();
    if RESERVED_NAMES.iter().any(|r| r.eq_ignore_ascii_case(stem)) {
        let stem_len = stem.len();
        cleaned.insert(stem_len, '_');
    }

    if cleaned.len() > MAX_FILENAME_BYTES {
        let mut cut = MAX_FILENAME_BYTES;
        while !cleaned.is_char_boundary(cut) {
            cut -= 1;
        }
        cleaned.truncate(cut);
    }

    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}
