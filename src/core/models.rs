//! Records returned by the Slack Web API, and the export job description.
//!
//! Slack records carry no fixed schema. A field the renderer reads is an
//! `Option<Option<T>>`: the outer layer says whether the server sent the key,
//! the inner one whether it sent `null`. Accessors collapse both into one
//! `Option`. Fields this crate does not read are kept in `extra`, so JSON
//! exports reproduce what the server sent, explicit nulls included.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::rust::double_option;

fn text(field: &Option<Option<String>>) -> Option<&str> {
    field.as_ref().and_then(Option::as_deref)
}

fn flag(field: &Option<Option<bool>>) -> bool {
    matches!(field, Some(Some(true)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub is_private: Option<Option<bool>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub is_im: Option<Option<bool>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub is_mpim: Option<Option<bool>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub is_group: Option<Option<bool>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub creator: Option<Option<String>>,
    /// Peer user of a direct-message conversation.
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub user: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Channel {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        text(&self.name)
    }

    #[must_use]
    pub fn creator(&self) -> Option<&str> {
        text(&self.creator)
    }

    #[must_use]
    pub fn peer(&self) -> Option<&str> {
        text(&self.user)
    }

    #[must_use]
    pub fn is_private(&self) -> bool {
        flag(&self.is_private)
    }

    #[must_use]
    pub fn is_im(&self) -> bool {
        flag(&self.is_im)
    }

    #[must_use]
    pub fn is_mpim(&self) -> bool {
        flag(&self.is_mpim)
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        flag(&self.is_group)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub real_name: Option<Option<String>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub real_name: Option<Option<String>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub tz: Option<Option<String>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub profile: Option<Option<UserProfile>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<Option<bool>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub is_owner: Option<Option<bool>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub is_primary_owner: Option<Option<bool>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub is_restricted: Option<Option<bool>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub is_ultra_restricted: Option<Option<bool>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub is_bot: Option<Option<bool>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub is_app_user: Option<Option<bool>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        text(&self.name)
    }

    #[must_use]
    pub fn tz(&self) -> Option<&str> {
        text(&self.tz)
    }

    /// Profile real name, then profile display name, then the legacy top-level
    /// `real_name`.
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        let profile = self.profile.as_ref().and_then(Option::as_ref);
        profile
            .and_then(|p| text(&p.real_name))
            .or_else(|| profile.and_then(|p| text(&p.display_name)))
            .or(text(&self.real_name))
    }

    /// Role flags in their fixed display order, keeping only those set to true.
    #[must_use]
    pub fn roles(&self) -> Vec<&'static str> {
        [
            ("admin", &self.is_admin),
            ("owner", &self.is_owner),
            ("primary_owner", &self.is_primary_owner),
            ("restricted", &self.is_restricted),
            ("ultra_restricted", &self.is_ultra_restricted),
            ("bot", &self.is_bot),
            ("app_user", &self.is_app_user),
        ]
        .into_iter()
        .filter(|(_, set)| flag(set))
        .map(|(label, _)| label)
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub name: String,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackFile {
    #[serde(default)]
    pub id: String,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub url_private: Option<Option<String>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub url_private_download: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SlackFile {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        text(&self.name)
    }

    #[must_use]
    pub fn url_private(&self) -> Option<&str> {
        text(&self.url_private)
    }

    #[must_use]
    pub fn url_private_download(&self) -> Option<&str> {
        text(&self.url_private_download)
    }

    /// Deleted, tombstoned and oversize files come back without a name or
    /// download link.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.name().is_some() && self.url_private_download().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Decimal seconds; doubles as the message id within its channel.
    pub ts: String,
    #[serde(rename = "type", default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Option<String>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub user: Option<Option<String>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub text: Option<Option<String>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub reactions: Option<Option<Vec<Reaction>>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub files: Option<Option<Vec<SlackFile>>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<Option<u64>>,
    /// Present only on thread replies.
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub parent_user_id: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    #[must_use]
    pub fn is_message(&self) -> bool {
        text(&self.kind) == Some("message")
    }

    #[must_use]
    pub fn user(&self) -> Option<&str> {
        text(&self.user)
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        text(&self.text)
    }

    #[must_use]
    pub fn reactions(&self) -> Option<&[Reaction]> {
        self.reactions.as_ref().and_then(Option::as_deref)
    }

    #[must_use]
    pub fn files(&self) -> Option<&[SlackFile]> {
        self.files.as_ref().and_then(Option::as_deref)
    }

    /// A root has replies; a zero `reply_count` starts no thread.
    #[must_use]
    pub fn is_thread_root(&self) -> bool {
        matches!(self.reply_count, Some(Some(count)) if count > 0)
    }

    #[must_use]
    pub fn is_reply(&self) -> bool {
        text(&self.parent_user_id).is_some()
    }
}

/// A root message followed by its replies, in server order.
pub type Thread = Vec<Message>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    Text,
    Json,
}

impl ExportMode {
    /// Slash command argument: `text` selects a transcript, anything else raw JSON.
    #[must_use]
    pub fn from_command_text(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case("text") {
            ExportMode::Text
        } else {
            ExportMode::Json
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportMode::Text => "txt",
            ExportMode::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    History,
    Replies,
}

/// One slash-command export, handed from the webhook route to the worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportTask {
    pub correlation_id: String,
    pub kind: ExportKind,
    pub mode: ExportMode,
    pub team_id: String,
    pub team_domain: String,
    pub channel_id: String,
    pub channel_name: String,
    pub response_url: String,
    /// Public base used to build the download link.
    pub url_root: String,
}
