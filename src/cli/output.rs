//! Where CLI results go: stdout, or one file each in a timestamped directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use crate::errors::ExportError;

const RUN_DIR_FORMAT: &str = "slack_export_%m-%d-%Y_%H%M%S";

/// Expands a leading `~` to `$HOME`.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

#[derive(Debug, Clone)]
pub struct Output {
    dir: Option<PathBuf>,
    json: bool,
}

impl Output {
    /// With a parent directory, files land in
    /// `{parent}/slack_export_{%m-%d-%Y_%H%M%S}` for the run's start time.
    #[must_use]
    pub fn new<Tz>(parent: Option<&Path>, json: bool, started: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let dir = parent
            .map(|p| expand_home(p).join(started.format(RUN_DIR_FORMAT).to_string()));
        Self { dir, json }
    }

    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.json
    }

    #[must_use]
    pub fn extension(&self) -> &'static str {
        if self.json { "json" } else { "txt" }
    }

    /// Writes `body` as `{name}.{json|txt}`, or prints it when there is no
    /// output directory. Returns the written path.
    pub fn save(&self, name: &str, body: &str) -> Result<Option<PathBuf>, ExportError> {
        let Some(dir) = &self.dir else {
            println!("{body}");
            return Ok(None);
        };

        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{name}.{}", self.extension()));
        println!("Writing output to {}", path.display());
        std::fs::write(&path, body)?;
        Ok(Some(path))
    }
}
