//! Document headers placed above exported transcripts.

use crate::core::models::Channel;

/// Underlines a document header.
pub const HEADER_RULE: &str = "========================";

pub const NULL_CHANNEL: &str = "[null channel]";

/// Display name and kind label for a conversation: the peer user id for a
/// direct message, the channel name otherwise.
#[must_use]
pub fn channel_label(channel_id: &str, channels: &[Channel]) -> (String, &'static str) {
    match channels.iter().find(|c| c.id == channel_id) {
        Some(channel) => match channel.peer() {
            Some(peer) => (peer.to_string(), "Direct Message"),
            None => (channel.name().unwrap_or_default().to_string(), "Channel"),
        },
        None => (NULL_CHANNEL.to_string(), "Channel"),
    }
}

#[must_use]
pub fn history_header(channel_id: &str, label: &str, name: &str, count: usize) -> String {
    format!("Channel ID: {channel_id}\n{label} Name: {name}\n{count} Messages\n{HEADER_RULE}\n\n")
}

#[must_use]
pub fn replies_header(label: &str, name: &str, count: usize) -> String {
    format!("Threads in {label}: {name}\n{count} Messages\n{HEADER_RULE}\n\n")
}

/// History header for slash command exports, which know the channel name from
/// the command but not the conversation kind.
#[must_use]
pub fn command_history_header(channel_name: &str, channel_id: &str, count: usize) -> String {
    format!("Channel Name: {channel_name}\nChannel ID: {channel_id}\n{count} Messages\n{HEADER_RULE}\n\n")
}

#[must_use]
pub fn command_replies_header(channel_name: &str, count: usize) -> String {
    format!("Threads in: {channel_name}\n{count} Messages\n{HEADER_RULE}\n\n")
}
