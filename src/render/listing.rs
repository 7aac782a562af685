use crate::core::models::{Channel, User};

use super::UserDirectory;

fn channel_kind(channel: &Channel) -> &'static str {
    if channel.is_im() {
        "direct_message"
    } else if channel.is_mpim() {
        "multiparty-direct_message"
    } else if channel.is_group() {
        "group"
    } else {
        "channel"
    }
}

fn channel_line(channel: &Channel, users: &UserDirectory<'_>) -> String {
    let mut line = format!("[{}]", channel.id);

    if let Some(name) = channel.name().filter(|n| !n.trim().is_empty()) {
        line.push_str(&format!(" {name}:"));
    }

    line.push(' ');
    if channel.is_private() {
        line.push_str("private ");
    }
    line.push_str(channel_kind(channel));

    if let Some(creator) = channel.creator() {
        line.push_str(&format!(" created by {}", users.name(creator)));
    } else if let Some(peer) = channel.peer() {
        line.push_str(&format!(" with {}", users.name(peer)));
    }

    line
}

/// One line per conversation: id, name, visibility, kind and owner.
///
/// ```text
/// [C024BE91L] general: channel created by alice
/// [D0C0F7S8Y] direct_message with bob
/// ```
#[must_use]
pub fn render_channel_list(channels: &[Channel], users: &UserDirectory<'_>) -> String {
    channels
        .iter()
        .map(|c| channel_line(c, users) + "\n")
        .collect()
}

fn user_line(user: &User) -> String {
    let mut line = format!("[{}]", user.id);

    if let Some(name) = user.name() {
        line.push_str(&format!(" {name}"));
    }
    if let Some(full) = user.full_name() {
        line.push_str(&format!(" ({full})"));
    }
    if let Some(tz) = user.tz() {
        line.push_str(&format!(", {tz}"));
    }

    let roles = user.roles();
    if !roles.is_empty() {
        line.push_str(", ");
        line.push_str(&roles.join("|"));
    }

    line
}

/// One line per user: id, handle, full name, timezone and role flags.
#[must_use]
pub fn render_user_list(users: &[User]) -> String {
    users.iter().map(|u| user_line(u) + "\n").collect()
}
