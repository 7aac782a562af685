//! Slack Web API transport
//!
//! A single authenticated GET, plus the rate-limit recovery loop every export
//! request goes through.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::RETRY_AFTER;
use tracing::{debug, warn};

use crate::core::config::AppConfig;
use crate::errors::ExportError;

/// Used when a throttled response carries no usable `Retry-After` header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

pub(crate) static HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Query parameters in the order they are sent.
pub type Query = Vec<(String, String)>;

/// Status line, throttling hint and body of one HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    /// `Retry-After` in seconds, when the server sent a numeric value.
    pub retry_after: Option<u64>,
    pub body: Vec<u8>,
}

impl RawResponse {
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues one GET. Only network failures are errors; every status code,
    /// including 429 and 5xx, comes back as a response.
    async fn get(&self, url: &str, query: &[(String, String)], token: &str)
    -> Result<RawResponse, ExportError>;
}

/// `reqwest`-backed transport sharing one pooled client.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTransport;

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
        token: &str,
    ) -> Result<RawResponse, ExportError> {
        let resp = HTTP_CLIENT
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        let retry_after = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());
        let body = resp.bytes().await?.to_vec();

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            retry_after,
            body,
        })
    }
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Authenticated GETs that wait out rate limiting.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
    token: String,
    margin: Duration,
    max_attempts: u32,
}

impl Fetcher {
    /// # Errors
    ///
    /// Returns [`ExportError::Config`] when no credential is configured.
    pub fn new(config: &AppConfig) -> Result<Self, ExportError> {
        Self::with_parts(config, Arc::new(HttpTransport), Arc::new(TokioSleeper))
    }

    /// # Errors
    ///
    /// Returns [`ExportError::Config`] when no credential is configured.
    pub fn with_parts(
        config: &AppConfig,
        transport: Arc<dyn Transport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self, ExportError> {
        if config.slack_user_token.trim().is_empty() {
            return Err(ExportError::Config(
                "Missing SLACK_USER_TOKEN in environment variables".to_string(),
            ));
        }

        Ok(Self {
            transport,
            sleeper,
            token: config.slack_user_token.clone(),
            margin: Duration::from_secs(config.rate_limit_margin_secs),
            max_attempts: config.rate_limit_max_attempts.max(1),
        })
    }

    /// Performs the GET, sleeping `Retry-After + margin` after each 429.
    ///
    /// Any other status is returned untouched for the caller to classify.
    ///
    /// # Errors
    ///
    /// Returns the transport error on network failure, or
    /// [`ExportError::RateLimited`] once the attempt bound is reached.
    pub async fn fetch(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<RawResponse, ExportError> {
        let mut attempt: u32 = 0;

        loop {
            let response = self.transport.get(url, query, &self.token).await?;
            attempt += 1;

            if !response.is_rate_limited() {
                debug!(url, status = response.status, attempt, "Fetched");
                return Ok(response);
            }

            if attempt >= self.max_attempts {
                return Err(ExportError::RateLimited { attempts: attempt });
            }

            let retry_after = response.retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            let wait = Duration::from_secs(retry_after) + self.margin;
            warn!(
                "Rate-limited. Retrying after {} seconds ({}x).",
                wait.as_secs(),
                attempt
            );
            self.sleeper.sleep(wait).await;
        }
    }
}
