//! Response builders and request accessors shared by the route handlers.

use axum::Json;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::core::config::AppConfig;

/// 200 with an empty body; Slack shows nothing for it.
#[must_use]
pub fn ok_empty() -> Response {
    StatusCode::OK.into_response()
}

/// 200 with a plain-text body, shown to the invoking user.
#[must_use]
pub fn ok_text(text: &str) -> Response {
    (StatusCode::OK, text.to_string()).into_response()
}

#[must_use]
pub fn err_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[must_use]
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Public base URL of this service, ending in `/`.
///
/// The configured public URL wins; otherwise it is rebuilt from the `Host`
/// and `X-Forwarded-Proto` headers.
#[must_use]
pub fn url_root(headers: &HeaderMap, config: &AppConfig) -> String {
    let mut root = match config.public_url.as_deref() {
        Some(public) => public.to_string(),
        None => {
            let host = header_str(headers, header::HOST.as_str()).unwrap_or("localhost");
            let scheme = header_str(headers, "x-forwarded-proto").unwrap_or("http");
            format!("{scheme}://{host}")
        }
    };
    if !root.ends_with('/') {
        root.push('/');
    }
    root
}
