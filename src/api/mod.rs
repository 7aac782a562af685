//! Webhook web service: slash command endpoints and single-use downloads

pub mod download;
pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod signature;
pub mod slash_handler;

use std::sync::Arc;

use crate::core::config::AppConfig;
use crate::core::models::ExportTask;
use crate::errors::ExportError;
use crate::slack::{Fetcher, HttpTransport, SlackExporter, Sleeper, TokioSleeper, Transport};
use crate::worker::ResponseUrlAnnouncer;

pub use handler::build_router;

/// Shared by every request: settings plus the Slack transport exports run on.
pub struct AppState {
    pub config: Arc<AppConfig>,
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self::with_parts(config, Arc::new(HttpTransport), Arc::new(TokioSleeper))
    }

    #[must_use]
    pub fn with_parts(
        config: AppConfig,
        transport: Arc<dyn Transport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            sleeper,
        }
    }

    /// An exporter that reports back to the task's `response_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Config`] when no credential is configured.
    pub fn exporter_for(&self, task: &ExportTask) -> Result<SlackExporter, ExportError> {
        let fetcher = Fetcher::with_parts(&self.config, self.transport.clone(), self.sleeper.clone())?;
        Ok(SlackExporter::from_fetcher(fetcher, &self.config.api_base_url)
            .with_announcer(Arc::new(ResponseUrlAnnouncer::new(&task.response_url))))
    }
}
