use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use tracing::{error, info, warn};

use super::AppState;
use super::helpers::{err_response, header_str, ok_empty, ok_text, url_root};
use super::parsing::parse_slash_command;
use super::signature::verify_slack_signature;
use crate::core::models::ExportKind;
use crate::errors::ExportError;
use crate::worker;

/// Reply for a command body missing one of the required fields.
pub const KEY_ERROR_REPLY: &str = "Sorry! I got an unexpected response (KeyError).";

fn is_authentic(state: &AppState, headers: &HeaderMap, body: &str) -> bool {
    let Some(secret) = state.config.slack_signing_secret.as_deref() else {
        return true;
    };
    match (
        header_str(headers, "x-slack-request-timestamp"),
        header_str(headers, "x-slack-signature"),
    ) {
        (Some(timestamp), Some(signature)) => {
            verify_slack_signature(body, timestamp, signature, secret)
        }
        _ => {
            error!("Missing Slack signature headers");
            false
        }
    }
}

/// Acknowledges an export command and runs the export in the background.
pub async fn handle_slash_command(
    state: &AppState,
    headers: &HeaderMap,
    body: &str,
    kind: ExportKind,
) -> Response {
    if !is_authentic(state, headers, body) {
        return err_response(StatusCode::UNAUTHORIZED, "Invalid signature");
    }

    let command = match parse_slash_command(body) {
        Ok(command) => command,
        Err(ExportError::MissingField(detail)) => {
            warn!("Rejecting export command: {}", detail);
            return ok_text(KEY_ERROR_REPLY);
        }
        Err(e) => {
            error!("Failed to parse export command: {}", e);
            return err_response(StatusCode::BAD_REQUEST, &e.to_string());
        }
    };

    let task = command.into_task(kind, url_root(headers, &state.config));
    let exporter = match state.exporter_for(&task) {
        Ok(exporter) => exporter,
        Err(e) => {
            error!("Cannot start export {}: {}", task.correlation_id, e);
            return err_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };

    info!(
        "Accepted {:?} export {} for channel {} ({:?})",
        task.kind, task.correlation_id, task.channel_id, task.mode
    );
    let config = state.config.clone();
    tokio::spawn(async move {
        worker::process_task(exporter, task, &config).await;
    });

    ok_empty()
}
