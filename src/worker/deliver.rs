use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::core::announce::Announcer;
use crate::errors::ExportError;
use crate::slack::client::HTTP_CLIENT;

/// Payload visible only to the user who ran the slash command.
#[must_use]
pub fn ephemeral_payload(text: &str) -> Value {
    json!({
        "text": text,
        "response_type": "ephemeral"
    })
}

/// POSTs `text` to a slash command's `response_url`.
pub async fn send_response_url(response_url: &str, text: &str) -> Result<(), ExportError> {
    let resp = HTTP_CLIENT
        .post(response_url)
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .json(&ephemeral_payload(text))
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        let body_text = resp
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());
        error!(
            "response_url POST failed: status={} body={}",
            status, body_text
        );
        return Err(ExportError::Http {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }
    Ok(())
}

/// Reports progress back into the Slack conversation a command came from.
#[derive(Debug, Clone)]
pub struct ResponseUrlAnnouncer {
    response_url: String,
}

impl ResponseUrlAnnouncer {
    #[must_use]
    pub fn new(response_url: impl Into<String>) -> Self {
        Self {
            response_url: response_url.into(),
        }
    }

    #[must_use]
    pub fn response_url(&self) -> &str {
        &self.response_url
    }
}

#[async_trait]
impl Announcer for ResponseUrlAnnouncer {
    async fn announce(&self, text: &str) {
        debug!("Announcing to response_url: {}", text);
        if let Err(e) = send_response_url(&self.response_url, text).await {
            error!("Failed to announce to response_url: {}", e);
        }
    }
}
