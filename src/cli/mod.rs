//! The command-line exporter.

pub mod output;

use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use serde::Serialize;
use tracing::info;

use crate::core::config::AppConfig;
use crate::core::models::{Channel, Message, User};
use crate::errors::ExportError;
use crate::render::{
    TranscriptRenderer, UserDirectory, channel_label, history_header, render_channel_list,
    render_user_list, replies_header,
};
use crate::slack::{Downloader, SlackExporter, root_timestamps};

pub use output::Output;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "slack-exporter",
    version,
    about = "Export Slack conversations, users, message histories, reply threads and files"
)]
pub struct Cli {
    /// Directory in which to save output files (if left blank, prints to stdout)
    #[arg(short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// List all conversations in your workspace
    #[arg(long = "lc")]
    pub list_channels: bool,

    /// List all users in your workspace
    #[arg(long = "lu")]
    pub list_users: bool,

    /// Give the requested output in raw JSON format (no parsing)
    #[arg(long)]
    pub json: bool,

    /// Get history for all accessible conversations
    #[arg(short = 'c')]
    pub histories: bool,

    /// Restrict to given Channel ID
    #[arg(long = "ch", env = "CHANNEL_ID", value_name = "ID")]
    pub channel: Option<String>,

    /// Unix timestamp for earliest message
    #[arg(long = "fr", value_name = "TS")]
    pub from: Option<String>,

    /// Unix timestamp for latest message
    #[arg(long = "to", value_name = "TS")]
    pub to: Option<String>,

    /// Get reply threads for all accessible conversations
    #[arg(short = 'r')]
    pub replies: bool,

    /// Download all files
    #[arg(long, requires = "output_dir")]
    pub files: bool,
}

fn to_json<T: Serialize + ?Sized>(data: &T) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// One CLI run. Channel and user lists are fetched at most once.
pub struct Session<'a> {
    cli: &'a Cli,
    exporter: &'a SlackExporter,
    config: &'a AppConfig,
    output: Output,
    channels: Option<Vec<Channel>>,
    users: Option<Vec<User>>,
}

impl<'a> Session<'a> {
    #[must_use]
    pub fn new(cli: &'a Cli, exporter: &'a SlackExporter, config: &'a AppConfig, output: Output) -> Self {
        Self {
            cli,
            exporter,
            config,
            output,
            channels: None,
            users: None,
        }
    }

    #[must_use]
    pub fn output(&self) -> &Output {
        &self.output
    }

    async fn ensure_channels(&mut self) -> Result<(), ExportError> {
        if self.channels.is_none() {
            self.channels = Some(self.exporter.list_channels(None).await?);
        }
        Ok(())
    }

    async fn ensure_users(&mut self) -> Result<(), ExportError> {
        if self.users.is_none() {
            self.users = Some(self.exporter.list_users(None).await?);
        }
        Ok(())
    }

    async fn save_channel_list(&mut self) -> Result<(), ExportError> {
        self.ensure_channels().await?;
        self.ensure_users().await?;
        let channels = self.channels.as_deref().unwrap_or_default();
        let body = if self.output.is_json() {
            to_json(channels)?
        } else {
            let users = self.users.as_deref().unwrap_or_default();
            render_channel_list(channels, &UserDirectory::new(users))
        };
        self.output.save("channel_list", &body)?;
        Ok(())
    }

    async fn save_user_list(&mut self) -> Result<(), ExportError> {
        self.ensure_users().await?;
        let users = self.users.as_deref().unwrap_or_default();
        let body = if self.output.is_json() {
            to_json(users)?
        } else {
            render_user_list(users)
        };
        self.output.save("user_list", &body)?;
        Ok(())
    }

    fn save_history(&self, channel_id: &str, history: &[Message]) -> Result<(), ExportError> {
        let body = if self.output.is_json() {
            to_json(history)?
        } else {
            let channels = self.channels.as_deref().unwrap_or_default();
            let users = UserDirectory::new(self.users.as_deref().unwrap_or_default());
            let (name, label) = channel_label(channel_id, channels);
            history_header(channel_id, label, &name, history.len())
                + &TranscriptRenderer::new(&users)
                    .with_timezone(self.config.timezone)
                    .render(history, false)
        };
        self.output.save(&format!("channel_{channel_id}"), &body)?;
        Ok(())
    }

    async fn save_replies(&self, channel_id: &str, history: &[Message]) -> Result<(), ExportError> {
        let threads = self
            .exporter
            .get_replies(&root_timestamps(history), channel_id)
            .await?;
        let body = if self.output.is_json() {
            to_json(&threads)?
        } else {
            let channels = self.channels.as_deref().unwrap_or_default();
            let users = UserDirectory::new(self.users.as_deref().unwrap_or_default());
            let (name, label) = channel_label(channel_id, channels);
            replies_header(label, &name, threads.len())
                + &TranscriptRenderer::new(&users)
                    .with_timezone(self.config.timezone)
                    .render_replies(&threads)
        };
        self.output
            .save(&format!("channel-replies_{channel_id}"), &body)?;
        Ok(())
    }

    async fn history(&self, channel_id: &str) -> Result<Vec<Message>, ExportError> {
        self.exporter
            .get_history(channel_id, self.cli.from.as_deref(), self.cli.to.as_deref())
            .await
    }

    /// Ids to export: the `--ch` channel for histories, otherwise every
    /// visible conversation.
    async fn target_channels(&mut self) -> Result<Vec<String>, ExportError> {
        self.ensure_channels().await?;
        let restricted = if self.cli.histories {
            self.cli.channel.clone()
        } else {
            None
        };
        Ok(match restricted {
            Some(id) => vec![id],
            None => self
                .channels
                .iter()
                .flatten()
                .map(|c| c.id.clone())
                .collect(),
        })
    }

    /// Performs every action the flags ask for, in a fixed order.
    pub async fn run(&mut self) -> Result<(), ExportError> {
        if self.cli.list_channels {
            self.save_channel_list().await?;
        }
        if self.cli.list_users {
            self.save_user_list().await?;
        }

        // Histories and replies share one history fetch per channel.
        if self.cli.histories || self.cli.replies {
            let targets = self.target_channels().await?;
            self.ensure_users().await?;
            for channel_id in &targets {
                let history = self.history(channel_id).await?;
                if self.cli.histories {
                    self.save_history(channel_id, &history)?;
                }
                if self.cli.replies {
                    self.save_replies(channel_id, &history).await?;
                }
            }
        }

        if self.cli.files {
            let Some(dir) = self.output.dir() else {
                return Err(ExportError::Config(
                    "If you specify --files you also need to specify an output directory with -o"
                        .to_string(),
                ));
            };
            let summary = Downloader::new(self.exporter)
                .download_all(dir, self.cli.channel.as_deref())
                .await?;
            info!(
                "Files: {} downloaded, {} already present, {} unavailable",
                summary.downloaded, summary.skipped, summary.unavailable
            );
        }
        Ok(())
    }
}

/// Runs the exporter for parsed flags.
///
/// # Errors
///
/// The first fetch, render or write failure; it has already been announced.
pub async fn run(cli: &Cli, exporter: &SlackExporter, config: &AppConfig) -> Result<(), ExportError> {
    let output = Output::new(cli.output_dir.as_deref(), cli.json, &Local::now());
    Session::new(cli, exporter, config, output).run().await
}
