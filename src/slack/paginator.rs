//! Cursor pagination over Slack list endpoints.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::client::{Fetcher, Query, RawResponse};
use crate::errors::ExportError;

pub const CURSOR_PARAM: &str = "cursor";

/// Checks the HTTP status and the body's `ok` flag, returning the decoded body.
///
/// # Errors
///
/// [`ExportError::Http`] for a non-2xx status, [`ExportError::Api`] when `ok`
/// is false, and [`ExportError::MissingField`] for an undecodable body.
pub fn decode_page(response: &RawResponse) -> Result<Value, ExportError> {
    if !response.is_success() {
        return Err(ExportError::Http {
            status: response.status,
            reason: response.reason.clone(),
        });
    }

    let body: Value = serde_json::from_slice(&response.body)
        .map_err(|e| ExportError::MissingField(format!("undecodable response body ({e})")))?;

    match body.get("ok").and_then(Value::as_bool) {
        Some(true) => Ok(body),
        Some(false) => Err(ExportError::Api(
            body.get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_string(),
        )),
        None => Err(ExportError::MissingField("'ok'".to_string())),
    }
}

/// The next cursor, treating a blank one as the end of the listing.
#[must_use]
pub fn next_cursor(body: &Value) -> Option<String> {
    body.pointer("/response_metadata/next_cursor")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string)
}

/// Replaces `key` in `query`, appending it when absent.
pub fn set_param(query: &mut Query, key: &str, value: String) {
    match query.iter_mut().find(|(k, _)| k == key) {
        Some(entry) => entry.1 = value,
        None => query.push((key.to_string(), value)),
    }
}

/// Follows `next_cursor` until exhausted, concatenating the `collection_key`
/// array of every page in server order. Without a key each page body is one
/// record.
///
/// # Errors
///
/// The first failing page aborts the whole listing; nothing partial is returned.
pub async fn paginate<T: DeserializeOwned>(
    fetcher: &Fetcher,
    url: &str,
    base: &Query,
    collection_key: Option<&str>,
) -> Result<Vec<T>, ExportError> {
    let mut query = base.clone();
    let mut records: Vec<T> = Vec::new();
    let mut pages = 0usize;

    loop {
        let response = fetcher.fetch(url, &query).await?;
        let mut body = decode_page(&response)?;
        let cursor = next_cursor(&body);

        match collection_key {
            Some(key) => {
                let items = body
                    .get_mut(key)
                    .map(Value::take)
                    .ok_or_else(|| ExportError::MissingField(format!("'{key}'")))?;
                let page: Vec<T> = serde_json::from_value(items)
                    .map_err(|e| ExportError::MissingField(format!("'{key}' ({e})")))?;
                records.extend(page);
            }
            None => records.push(serde_json::from_value(body)?),
        }
        pages += 1;

        match cursor {
            Some(next) => set_param(&mut query, CURSOR_PARAM, next),
            None => break,
        }
    }

    debug!(url, pages, records = records.len(), "Pagination complete");
    Ok(records)
}
