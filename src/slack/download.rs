//! Bulk download of workspace file attachments.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;
use tracing::{info, warn};

use super::exporter::SlackExporter;
use crate::core::models::SlackFile;
use crate::errors::ExportError;
use crate::utils::filenames::sanitize_filename;

/// Attempts per file before the whole batch is abandoned.
pub const MAX_DOWNLOAD_ATTEMPTS: usize = 10;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    /// Already present locally from an earlier run.
    pub skipped: usize,
    /// Listed without any download link (deleted or tombstoned).
    pub unavailable: usize,
    pub elapsed: Duration,
}

impl DownloadSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped
    }
}

enum Outcome {
    Downloaded,
    Skipped,
    Unavailable,
}

/// Local path for `file` inside `dir`: `{id}-{sanitized name}`.
#[must_use]
pub fn destination_path(dir: &Path, file: &SlackFile) -> PathBuf {
    let name = sanitize_filename(file.name().unwrap_or_default());
    dir.join(format!("{}-{}", file.id, name))
}

pub struct Downloader<'a> {
    exporter: &'a SlackExporter,
    retry_delay: Duration,
}

impl<'a> Downloader<'a> {
    #[must_use]
    pub fn new(exporter: &'a SlackExporter) -> Self {
        Self {
            exporter,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Downloads every listed file into `target_dir`, skipping ones already on
    /// disk.
    ///
    /// # Errors
    ///
    /// Fails on a file listing error, a local I/O error, or once any single
    /// file has failed [`MAX_DOWNLOAD_ATTEMPTS`] times.
    pub async fn download_all(
        &self,
        target_dir: &Path,
        channel_id: Option<&str>,
    ) -> Result<DownloadSummary, ExportError> {
        let start = Instant::now();
        tokio::fs::create_dir_all(target_dir).await?;

        let mut summary = DownloadSummary {
            downloaded: 0,
            skipped: 0,
            unavailable: 0,
            elapsed: Duration::ZERO,
        };
        let mut pages = self.exporter.file_pages(channel_id);

        while let Some(files) = pages.next_page().await? {
            for file in &files {
                match self.download_file(file, target_dir).await? {
                    Outcome::Downloaded => summary.downloaded += 1,
                    Outcome::Skipped => summary.skipped += 1,
                    Outcome::Unavailable => summary.unavailable += 1,
                }
            }
        }

        summary.elapsed = start.elapsed();
        info!(
            "Downloaded {} files in {} seconds",
            summary.total(),
            summary.elapsed.as_secs()
        );
        Ok(summary)
    }

    async fn download_file(&self, file: &SlackFile, dir: &Path) -> Result<Outcome, ExportError> {
        let destination = destination_path(dir, file);
        if tokio::fs::try_exists(&destination).await? {
            info!("Skipping existing {}", destination.display());
            return Ok(Outcome::Skipped);
        }

        let Some(url) = file.url_private().or(file.url_private_download()) else {
            warn!(file_id = %file.id, "File has no download link, skipping");
            return Ok(Outcome::Unavailable);
        };

        let strategy =
            FixedInterval::new(self.retry_delay).take(MAX_DOWNLOAD_ATTEMPTS.saturating_sub(1));
        let mut attempt = 0;
        let result = Retry::spawn(strategy, || {
            attempt += 1;
            self.fetch_to_file(url, &destination, attempt)
        })
        .await;

        if result.is_err() {
            let error = ExportError::Download {
                url: url.to_string(),
                attempts: MAX_DOWNLOAD_ATTEMPTS,
            };
            self.exporter.report(&error).await;
            return Err(error);
        }

        Ok(Outcome::Downloaded)
    }

    async fn fetch_to_file(
        &self,
        url: &str,
        destination: &Path,
        attempt: usize,
    ) -> Result<(), ExportError> {
        info!(
            "Downloading file on attempt {} to {}",
            attempt,
            destination.display()
        );

        let outcome = self.write_download(url, destination).await;
        if let Err(e) = &outcome {
            warn!(
                "Unexpected error on {} attempt {}; {}",
                destination.display(),
                attempt,
                e
            );
        }
        outcome
    }

    async fn write_download(&self, url: &str, destination: &Path) -> Result<(), ExportError> {
        let response = self.exporter.fetcher().fetch(url, &[]).await?;
        if !response.is_success() {
            return Err(ExportError::Http {
                status: response.status,
                reason: response.reason,
            });
        }

        // A `.part` file never counts as downloaded on a rerun.
        let partial = partial_path(destination);
        tokio::fs::write(&partial, &response.body).await?;
        tokio::fs::rename(&partial, destination).await?;
        Ok(())
    }
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    destination.with_file_name(name)
}
