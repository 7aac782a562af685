use std::io::ErrorKind;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::{error, info, warn};

use super::AppState;
use super::helpers::err_response;
use crate::utils::mime::export_content_type;

/// A bare file name: no separators, no parent references.
#[must_use]
pub fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && !filename.contains("..")
        && !filename.contains(['/', '\\', '\0'])
}

/// `GET /download/{filename}`: serves an export once, then deletes it.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    if !is_safe_filename(&filename) {
        warn!("Rejected download of '{}'", filename);
        return err_response(StatusCode::BAD_REQUEST, "Invalid filename");
    }

    let path = state.config.exports_dir.join(&filename);
    let body = match tokio::fs::read(&path).await {
        Ok(body) => body,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return err_response(StatusCode::NOT_FOUND, "No such export");
        }
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            return err_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read export");
        }
    };

    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!("Failed to remove served export {}: {}", path.display(), e);
    }
    info!("Served and removed {}", filename);

    (
        [
            (header::CONTENT_TYPE, export_content_type(&filename)),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}
