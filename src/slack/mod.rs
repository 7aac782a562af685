//! All Slack Web API access

pub mod client;
pub mod download;
pub mod exporter;
pub mod paginator;

// Re-export main types for convenience
pub use client::{Fetcher, HttpTransport, RawResponse, Sleeper, TokioSleeper, Transport};
pub use download::{DownloadSummary, Downloader};
pub use exporter::{FilePages, SlackExporter, root_timestamps};
