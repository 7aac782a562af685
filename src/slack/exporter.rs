//! The four paginated Slack collections an export needs, plus the file listing.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use super::client::{Fetcher, Query};
use super::paginator::{decode_page, paginate};
use crate::core::announce::{Announcer, ConsoleAnnouncer};
use crate::core::config::AppConfig;
use crate::core::models::{Channel, Message, SlackFile, Thread, User};
use crate::errors::ExportError;

pub const PAGE_SIZE: u32 = 200;

/// Every conversation kind a user token can see.
pub const CONVERSATION_TYPES: &str = "public_channel,private_channel,mpim,im";

fn query(pairs: &[(&str, Option<&str>)]) -> Query {
    pairs
        .iter()
        .filter_map(|(k, v)| v.map(|v| ((*k).to_string(), v.to_string())))
        .collect()
}

/// Slack Web API accessors. Failures are announced before being returned.
#[derive(Clone)]
pub struct SlackExporter {
    fetcher: Fetcher,
    base_url: String,
    announcer: Arc<dyn Announcer>,
}

impl SlackExporter {
    /// # Errors
    ///
    /// Returns [`ExportError::Config`] when no credential is configured.
    pub fn new(config: &AppConfig) -> Result<Self, ExportError> {
        Ok(Self::from_fetcher(Fetcher::new(config)?, &config.api_base_url))
    }

    #[must_use]
    pub fn from_fetcher(fetcher: Fetcher, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            announcer: Arc::new(ConsoleAnnouncer),
        }
    }

    /// Routes failure reports to `announcer` instead of stderr.
    #[must_use]
    pub fn with_announcer(mut self, announcer: Arc<dyn Announcer>) -> Self {
        self.announcer = announcer;
        self
    }

    #[must_use]
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    #[must_use]
    pub fn announcer(&self) -> &Arc<dyn Announcer> {
        &self.announcer
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// Sends the error's user-facing text down the announce channel.
    pub async fn report(&self, error: &ExportError) {
        self.announcer.announce(&error.to_string()).await;
    }

    async fn collect<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &Query,
        collection_key: &str,
    ) -> Result<Vec<T>, ExportError> {
        match paginate(&self.fetcher, &self.endpoint(method), query, Some(collection_key)).await {
            Ok(records) => Ok(records),
            Err(e) => {
                self.report(&e).await;
                Err(e)
            }
        }
    }

    /// # Errors
    ///
    /// Fails if any page fails; the error has already been announced.
    pub async fn list_channels(&self, team_id: Option<&str>) -> Result<Vec<Channel>, ExportError> {
        let limit = PAGE_SIZE.to_string();
        let q = query(&[
            ("team_id", team_id),
            ("types", Some(CONVERSATION_TYPES)),
            ("limit", Some(limit.as_str())),
        ]);
        self.collect("conversations.list", &q, "channels").await
    }

    /// Messages newest first, optionally bounded by `oldest`/`latest` timestamps.
    ///
    /// # Errors
    ///
    /// Fails if any page fails; the error has already been announced.
    pub async fn get_history(
        &self,
        channel_id: &str,
        oldest: Option<&str>,
        latest: Option<&str>,
    ) -> Result<Vec<Message>, ExportError> {
        let limit = PAGE_SIZE.to_string();
        let q = query(&[
            ("channel", Some(channel_id)),
            ("limit", Some(limit.as_str())),
            ("oldest", oldest),
            ("latest", latest),
        ]);
        let messages: Vec<Message> = self.collect("conversations.history", &q, "messages").await?;
        info!(channel_id, count = messages.len(), "Fetched channel history");
        Ok(messages)
    }

    /// One thread per root timestamp, in input order, each starting with its root.
    ///
    /// # Errors
    ///
    /// Fails on the first thread that fails; the error has already been announced.
    pub async fn get_replies(
        &self,
        root_timestamps: &[String],
        channel_id: &str,
    ) -> Result<Vec<Thread>, ExportError> {
        let limit = PAGE_SIZE.to_string();
        let mut threads = Vec::with_capacity(root_timestamps.len());

        for ts in root_timestamps {
            let q = query(&[
                ("channel", Some(channel_id)),
                ("ts", Some(ts.as_str())),
                ("limit", Some(limit.as_str())),
            ]);
            threads.push(self.collect("conversations.replies", &q, "messages").await?);
        }

        info!(channel_id, threads = threads.len(), "Fetched reply threads");
        Ok(threads)
    }

    /// # Errors
    ///
    /// Fails if any page fails; the error has already been announced.
    pub async fn list_users(&self, team_id: Option<&str>) -> Result<Vec<User>, ExportError> {
        let limit = PAGE_SIZE.to_string();
        let q = query(&[("limit", Some(limit.as_str())), ("team_id", team_id)]);
        self.collect("users.list", &q, "members").await
    }

    /// One page of `files.list`, with the total page count the server reports.
    ///
    /// # Errors
    ///
    /// Fails on any HTTP, API or decoding problem; the error has already been
    /// announced.
    pub async fn list_files_page(
        &self,
        channel_id: Option<&str>,
        page: u32,
    ) -> Result<(Vec<SlackFile>, u32), ExportError> {
        let page_str = page.to_string();
        let q = query(&[("page", Some(page_str.as_str())), ("channel", channel_id)]);

        let result = self.fetch_files_page(&q).await;

        if let Err(e) = &result {
            self.report(e).await;
        }
        result
    }

    async fn fetch_files_page(&self, q: &Query) -> Result<(Vec<SlackFile>, u32), ExportError> {
        let response = self.fetcher.fetch(&self.endpoint("files.list"), q).await?;
        let mut body = decode_page(&response)?;
        let pages = body
            .pointer("/paging/pages")
            .and_then(Value::as_u64)
            .ok_or_else(|| ExportError::MissingField("'paging.pages'".to_string()))?;
        let files = body
            .get_mut("files")
            .map(Value::take)
            .ok_or_else(|| ExportError::MissingField("'files'".to_string()))?;
        let files: Vec<SlackFile> = serde_json::from_value(files)?;
        Ok((files, u32::try_from(pages).unwrap_or(u32::MAX)))
    }

    /// Walker over `files.list` pages `1..=total`, where `total` is whatever
    /// the latest page reported.
    #[must_use]
    pub fn file_pages<'a>(&'a self, channel_id: Option<&'a str>) -> FilePages<'a> {
        FilePages {
            exporter: self,
            channel_id,
            page: 1,
            total_pages: 1,
        }
    }

    /// Every file visible to the token.
    ///
    /// # Errors
    ///
    /// Fails on the first failing page.
    pub async fn list_files(&self, channel_id: Option<&str>) -> Result<Vec<SlackFile>, ExportError> {
        let mut pages = self.file_pages(channel_id);
        let mut files = Vec::new();
        while let Some(batch) = pages.next_page().await? {
            files.extend(batch);
        }
        Ok(files)
    }
}

/// Page-numbered walk over `files.list`, one request per call.
pub struct FilePages<'a> {
    exporter: &'a SlackExporter,
    channel_id: Option<&'a str>,
    page: u32,
    total_pages: u32,
}

impl FilePages<'_> {
    /// The next page of files, or `None` once the reported total is reached.
    ///
    /// # Errors
    ///
    /// Fails on any page error; the error has already been announced.
    pub async fn next_page(&mut self) -> Result<Option<Vec<SlackFile>>, ExportError> {
        if self.page > self.total_pages {
            return Ok(None);
        }
        let (batch, pages) = self
            .exporter
            .list_files_page(self.channel_id, self.page)
            .await?;
        self.total_pages = pages;
        self.page += 1;
        Ok(Some(batch))
    }
}

/// Timestamps of messages that start a thread.
#[must_use]
pub fn root_timestamps(messages: &[Message]) -> Vec<String> {
    messages
        .iter()
        .filter(|m| m.is_thread_root())
        .map(|m| m.ts.clone())
        .collect()
}
