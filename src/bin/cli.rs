use anyhow::{Context, anyhow};
use clap::Parser;
use slack_exporter::cli::{self, Cli};
use slack_exporter::core::config::AppConfig;
use slack_exporter::slack::SlackExporter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` may supply CHANNEL_ID for `--ch`.
    let _ = dotenvy::dotenv();
    let args = Cli::parse();
    slack_exporter::setup_logging();

    let config = AppConfig::from_env().map_err(|e| anyhow!(e))?;
    let exporter = SlackExporter::new(&config).context("Failed to set up the Slack client")?;

    // Failures have already been announced on stderr.
    cli::run(&args, &exporter, &config).await?;
    Ok(())
}
