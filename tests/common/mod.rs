#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use slack_exporter::core::announce::Announcer;
use slack_exporter::core::config::AppConfig;
use slack_exporter::errors::ExportError;
use slack_exporter::slack::{Fetcher, RawResponse, SlackExporter, Sleeper, Transport};

pub const BASE_URL: &str = "https://slack.test/api";

pub fn ok_json(body: Value) -> RawResponse {
    RawResponse {
        status: 200,
        reason: "OK".to_string(),
        retry_after: None,
        body: body.to_string().into_bytes(),
    }
}

pub fn bytes(body: &[u8]) -> RawResponse {
    RawResponse {
        status: 200,
        reason: "OK".to_string(),
        retry_after: None,
        body: body.to_vec(),
    }
}

pub fn status(code: u16, reason: &str) -> RawResponse {
    RawResponse {
        status: code,
        reason: reason.to_string(),
        retry_after: None,
        body: Vec::new(),
    }
}

pub fn throttled(retry_after: Option<u64>) -> RawResponse {
    RawResponse {
        status: 429,
        reason: "Too Many Requests".to_string(),
        retry_after,
        body: Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub token: String,
}

impl Call {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Answers requests from a fixed script, in order, and records every call.
/// An exhausted script answers with a transport error.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<RawResponse>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<RawResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
        token: &str,
    ) -> Result<RawResponse, ExportError> {
        self.calls.lock().unwrap().push(Call {
            url: url.to_string(),
            query: query.to_vec(),
            token: token.to_string(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ExportError::Transport("connection refused".to_string()))
    }
}

/// Records requested sleeps without waiting.
#[derive(Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

#[derive(Default)]
pub struct RecordingAnnouncer {
    messages: Mutex<Vec<String>>,
}

impl RecordingAnnouncer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Announcer for RecordingAnnouncer {
    async fn announce(&self, text: &str) {
        self.messages.lock().unwrap().push(text.to_string());
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::with_token("xoxp-test");
    config.api_base_url = BASE_URL.to_string();
    config
}

pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub sleeper: Arc<RecordingSleeper>,
    pub announcer: Arc<RecordingAnnouncer>,
    pub exporter: SlackExporter,
}

pub fn harness(responses: Vec<RawResponse>) -> Harness {
    harness_with(&test_config(), responses)
}

pub fn harness_with(config: &AppConfig, responses: Vec<RawResponse>) -> Harness {
    let transport = ScriptedTransport::new(responses);
    let sleeper = RecordingSleeper::new();
    let announcer = RecordingAnnouncer::new();
    let fetcher = Fetcher::with_parts(config, transport.clone(), sleeper.clone()).unwrap();
    let exporter = SlackExporter::from_fetcher(fetcher, &config.api_base_url)
        .with_announcer(announcer.clone());
    Harness {
        transport,
        sleeper,
        announcer,
        exporter,
    }
}
