/// Slack Exporter - dumps a Slack workspace's channels, users, message
/// histories, thread replies and file attachments.
///
/// The crate ships two front ends over one core:
/// 1. A command-line exporter that writes JSON or plain-text transcripts to a
///    timestamped directory (or stdout)
/// 2. A web service answering the `/export-channel` and `/export-replies`
///    slash commands with a single-use download link
///
/// # Architecture
///
/// - `slack` fetches every collection through a rate-limit-aware [`slack::Fetcher`]
///   and a cursor paginator
/// - `render` turns records into deterministic plain text
/// - `cli`, `api` and `worker` are thin shells over both
///
/// # Example
///
/// ```no_run
/// use slack_exporter::core::config::AppConfig;
/// use slack_exporter::render::{UserDirectory, render_transcript};
/// use slack_exporter::slack::SlackExporter;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     slack_exporter::setup_logging();
///
///     let config = AppConfig::with_token("xoxp-dummy");
///     let exporter = SlackExporter::new(&config)?;
///
///     let users = exporter.list_users(None).await?;
///     let history = exporter.get_history("C12345678", None, None).await?;
///     print!("{}", render_transcript(&history, &UserDirectory::new(&users), false));
///
///     Ok(())
/// }
/// ```
pub mod api;
pub mod cli;
pub mod core;
pub mod errors;
pub mod render;
pub mod slack;
pub mod utils;
pub mod worker;

pub use errors::ExportError;

/// Configure structured JSON logging on stderr.
///
/// Stdout stays reserved for export output. The level comes from `RUST_LOG`,
/// defaulting to `info` (`debug` with the `debug-logs` feature). Calling this
/// more than once is harmless.
///
/// # Example
///
/// ```
/// slack_exporter::setup_logging();
/// slack_exporter::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let default_level = if cfg!(feature = "debug-logs") {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
