//! Message transcripts: one block per message, thread replies indented.

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;

use crate::core::models::{Message, SlackFile, Thread};

use super::{SEPARATOR, UserDirectory};

pub const NO_CONTENT: &str = "[no message content]";
pub const UNAVAILABLE_FILE: &str = "[deleted, oversize, or unavailable file]";

const TIMESTAMP_FORMAT: &str = "%m-%d-%y %H:%M:%S";

/// Rewrites every `<@ID>` of a known user to `<@ID> (name)`.
///
/// ```
/// use serde_json::json;
/// use slack_exporter::core::models::User;
/// use slack_exporter::render::{UserDirectory, resolve_mentions};
///
/// let users: Vec<User> = serde_json::from_value(json!([
///     {"id": "U1", "name": "alice"},
///     {"id": "U2", "name": "bob"},
/// ]))
/// .unwrap();
/// let dir = UserDirectory::new(&users);
/// assert_eq!(
///     resolve_mentions("hello <@U1> and <@U2>", &dir),
///     "hello <@U1> (alice) and <@U2> (bob)"
/// );
/// ```
#[must_use]
pub fn resolve_mentions(text: &str, users: &UserDirectory<'_>) -> String {
    let mut text = text.to_string();
    if !text.contains("<@") {
        return text;
    }

    for user in users.iter() {
        let mention = format!("<@{}>", user.id);
        if text.contains(&mention) {
            let resolved = format!("{mention} ({})", users.name(&user.id));
            text = text.replace(&mention, &resolved);
        }
    }
    text
}

/// `ts` rounded to the second (ties to even) in `tz`; unparseable stamps are
/// returned as-is.
#[must_use]
pub fn format_timestamp(ts: &str, tz: Tz) -> String {
    let Ok(seconds) = ts.trim().parse::<f64>() else {
        return ts.to_string();
    };

    #[allow(clippy::cast_possible_truncation)]
    let whole = seconds.round_ties_even() as i64;
    match Utc.timestamp_opt(whole, 0).single() {
        Some(at) => at.with_timezone(&tz).format(TIMESTAMP_FORMAT).to_string(),
        None => ts.to_string(),
    }
}

fn file_line(file: &SlackFile) -> String {
    match (file.name(), file.url_private_download()) {
        (Some(name), Some(url)) => format!(" - [{}] {}, {}", file.id, name, url),
        _ => format!(" - [{}] {}", file.id, UNAVAILABLE_FILE),
    }
}

fn indent_block(block: &str) -> String {
    block
        .split('\n')
        .map(|line| format!("\t{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders message blocks against a user directory in a fixed timezone.
#[derive(Debug, Clone)]
pub struct TranscriptRenderer<'a> {
    users: &'a UserDirectory<'a>,
    tz: Tz,
}

impl<'a> TranscriptRenderer<'a> {
    #[must_use]
    pub fn new(users: &'a UserDirectory<'a>) -> Self {
        Self { users, tz: Tz::UTC }
    }

    #[must_use]
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.tz = tz;
        self
    }

    /// Concatenated blocks for every `message`-typed record, in input order.
    /// With `is_thread`, replies are indented one tab under their root.
    #[must_use]
    pub fn render(&self, messages: &[Message], is_thread: bool) -> String {
        messages
            .iter()
            .filter(|m| m.is_message())
            .map(|m| self.render_message(m, is_thread))
            .collect()
    }

    /// Every thread rendered as a thread, each followed by a blank line.
    #[must_use]
    pub fn render_replies(&self, threads: &[Thread]) -> String {
        threads
            .iter()
            .map(|thread| self.render(thread, true) + "\n")
            .collect()
    }

    fn render_message(&self, msg: &Message, is_thread: bool) -> String {
        let users = self.users;
        let (name, full_name) = match msg.user() {
            Some(id) => (users.name(id), users.full_name(id)),
            None => ("", "none"),
        };

        let raw = msg.text().unwrap_or_default();
        let text = if raw.trim().is_empty() {
            NO_CONTENT.to_string()
        } else {
            resolve_mentions(raw, users)
        };

        let mut block = format!(
            "Message at {}\nUser: {} ({})\n{}",
            format_timestamp(&msg.ts, self.tz),
            name,
            full_name,
            text
        );

        if let Some(reactions) = msg.reactions() {
            let summary = reactions
                .iter()
                .map(|r| {
                    let who: Vec<&str> = r.users.iter().map(|u| users.name(u)).collect();
                    format!("{} ({})", r.name, who.join(", "))
                })
                .collect::<Vec<_>>()
                .join(", ");
            block.push_str("\nReactions: ");
            block.push_str(&summary);
        }

        if let Some(files) = msg.files() {
            let (available, missing): (Vec<&SlackFile>, Vec<&SlackFile>) =
                files.iter().partition(|f| f.is_available());
            let lines: Vec<String> = available
                .into_iter()
                .chain(missing)
                .map(file_line)
                .collect();
            block.push_str("\nFiles:\n");
            block.push_str(&lines.join("\n"));
        }

        block.push_str(&format!("\n\n{SEPARATOR}\n\n"));

        if is_thread && msg.is_reply() {
            block = indent_block(&block);
        }
        block.trim_end_matches('\t').to_string()
    }
}

/// Transcript of `messages` with UTC timestamps.
#[must_use]
pub fn render_transcript(messages: &[Message], users: &UserDirectory<'_>, is_thread: bool) -> String {
    TranscriptRenderer::new(users).render(messages, is_thread)
}

/// Every thread's transcript, separated by blank lines, with UTC timestamps.
#[must_use]
pub fn render_replies(threads: &[Thread], users: &UserDirectory<'_>) -> String {
    TranscriptRenderer::new(users).render_replies(threads)
}
