//! Runs one slash-command export: fetch, render, write, link.

use std::path::{Path, PathBuf};

use tracing::info;
use url::Url;
use uuid::Uuid;

use crate::api::download::is_safe_filename;
use crate::core::config::AppConfig;
use crate::core::models::{ExportKind, ExportMode, ExportTask};
use crate::errors::ExportError;
use crate::render::{
    TranscriptRenderer, UserDirectory, command_history_header, command_replies_header,
};
use crate::slack::{SlackExporter, root_timestamps};
use crate::utils::filenames::sanitize_filename;

const SUFFIX_LEN: usize = 6;

impl ExportKind {
    /// Filename tag: `ch` for history, `re` for reply threads.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            ExportKind::History => "ch",
            ExportKind::Replies => "re",
        }
    }

    #[must_use]
    pub fn start_message(self) -> &'static str {
        match self {
            ExportKind::History => "Retrieving history for this channel...",
            ExportKind::Replies => "Retrieving reply threads for this channel...",
        }
    }

    #[must_use]
    pub fn done_message(self, link: &str) -> String {
        match self {
            ExportKind::History => format!(
                "Done! This channel's history is available for download here (note that this link is single-use): {link}"
            ),
            ExportKind::Replies => format!(
                "Done! This channel's reply threads are available for download here (note that this link is single-use): {link}"
            ),
        }
    }
}

/// A form value made safe to embed in a file name: no separators, no `..`,
/// no leading dot.
fn name_component(value: &str) -> String {
    let mut cleaned = sanitize_filename(value);
    while cleaned.contains("..") {
        cleaned = cleaned.replace("..", ".");
    }
    match cleaned.trim_start_matches('.') {
        "" => "unnamed".to_string(),
        rest => rest.to_string(),
    }
}

/// `{team_domain}-{ch|re}_{channel_id}-{6 hex}.{txt|json}`, with both form
/// values sanitized.
#[must_use]
pub fn export_filename(task: &ExportTask) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}_{}-{}.{}",
        name_component(&task.team_domain),
        task.kind.tag(),
        name_component(&task.channel_id),
        &suffix[..SUFFIX_LEN],
        task.mode.extension()
    )
}

/// Absolute download URL for `filename` under `url_root`.
pub fn download_link(url_root: &str, filename: &str) -> Result<String, ExportError> {
    let mut root = url_root.to_string();
    if !root.ends_with('/') {
        root.push('/');
    }
    let base = Url::parse(&root).map_err(|e| ExportError::Config(format!("bad url root: {e}")))?;
    let link = base
        .join(&format!("download/{filename}"))
        .map_err(|e| ExportError::Config(format!("bad download link: {e}")))?;
    Ok(link.to_string())
}

/// Fetches and renders the document a task asks for.
pub async fn render_export(
    exporter: &SlackExporter,
    task: &ExportTask,
    config: &AppConfig,
) -> Result<String, ExportError> {
    let history = exporter.get_history(&task.channel_id, None, None).await?;

    match (task.kind, task.mode) {
        (ExportKind::History, ExportMode::Json) => Ok(serde_json::to_string_pretty(&history)?),
        (ExportKind::History, ExportMode::Text) => {
            let users = exporter.list_users(Some(&task.team_id)).await?;
            let directory = UserDirectory::new(&users);
            let renderer = TranscriptRenderer::new(&directory).with_timezone(config.timezone);
            Ok(command_history_header(&task.channel_name, &task.channel_id, history.len())
                + &renderer.render(&history, false))
        }
        (ExportKind::Replies, mode) => {
            let threads = exporter
                .get_replies(&root_timestamps(&history), &task.channel_id)
                .await?;
            if mode == ExportMode::Json {
                return Ok(serde_json::to_string_pretty(&threads)?);
            }
            let users = exporter.list_users(Some(&task.team_id)).await?;
            let directory = UserDirectory::new(&users);
            let renderer = TranscriptRenderer::new(&directory).with_timezone(config.timezone);
            Ok(command_replies_header(&task.channel_name, threads.len())
                + &renderer.render_replies(&threads))
        }
    }
}

/// Writes `body` to `dir/filename`. Names the download route would refuse are
/// refused here too.
pub async fn write_export(dir: &Path, filename: &str, body: &str) -> Result<PathBuf, ExportError> {
    if !is_safe_filename(filename) {
        return Err(ExportError::Parse(format!("unsafe export file name '{filename}'")));
    }
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(filename);
    tokio::fs::write(&path, body).await?;
    Ok(path)
}

/// Announces start, exports, and announces the download link, which is
/// returned. Failures are announced before being returned.
pub async fn run_export(
    exporter: &SlackExporter,
    task: &ExportTask,
    config: &AppConfig,
) -> Result<String, ExportError> {
    let announcer = exporter.announcer();
    announcer.announce(task.kind.start_message()).await;

    // Accessor failures are announced by the exporter itself.
    let body = render_export(exporter, task, config).await?;

    let filename = export_filename(task);
    let saved = async {
        let link = download_link(&task.url_root, &filename)?;
        let path = write_export(&config.exports_dir, &filename, &body).await?;
        Ok::<_, ExportError>((link, path))
    }
    .await;

    let (link, path) = match saved {
        Ok(saved) => saved,
        Err(e) => {
            exporter.report(&e).await;
            return Err(e);
        }
    };

    info!(
        "Export {} for channel {} written to {}",
        task.correlation_id,
        task.channel_id,
        path.display()
    );
    announcer.announce(&task.kind.done_message(&link)).await;
    Ok(link)
}
