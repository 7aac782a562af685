use std::sync::Arc;

use anyhow::{Context, anyhow};
use slack_exporter::api::{AppState, build_router};
use slack_exporter::core::config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    slack_exporter::setup_logging();

    let config = AppConfig::from_env().map_err(|e| anyhow!(e))?;
    let addr = config.bind_addr.clone();
    let router = build_router(Arc::new(AppState::new(config)));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Export bot listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;
    Ok(())
}
