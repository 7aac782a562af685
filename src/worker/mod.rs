//! Background side of the slash commands: export, then report back

pub mod deliver;
pub mod export;

pub use deliver::ResponseUrlAnnouncer;
pub use export::run_export;

use tracing::{error, info};

use crate::core::config::AppConfig;
use crate::core::models::ExportTask;
use crate::slack::SlackExporter;

/// Runs a task to completion, logging the outcome. Users have already been
/// told about failures through the exporter's announcer.
pub async fn process_task(exporter: SlackExporter, task: ExportTask, config: &AppConfig) {
    info!(
        "Processing {:?} export {} for channel {}",
        task.kind, task.correlation_id, task.channel_id
    );
    match run_export(&exporter, &task, config).await {
        Ok(link) => info!("Export {} ready at {}", task.correlation_id, link),
        Err(e) => error!("Export {} failed: {}", task.correlation_id, e),
    }
}
