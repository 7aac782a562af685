//! Plain-text rendering of Slack records.
//!
//! Everything here is a pure function of its inputs: the same records and user
//! directory always produce the same text.

pub mod headers;
pub mod listing;
pub mod transcript;

use std::collections::HashMap;

use crate::core::models::User;

pub use headers::{
    channel_label, command_history_header, command_replies_header, history_header, replies_header,
};
pub use listing::{render_channel_list, render_user_list};
pub use transcript::{TranscriptRenderer, render_replies, render_transcript, resolve_mentions};

/// Closes every message block.
pub const SEPARATOR: &str = "************************";

pub const NULL_USER: &str = "[null user]";
pub const NO_FULL_NAME: &str = "[no full name]";

/// User lookup by id. The first record wins when ids repeat.
#[derive(Debug, Clone)]
pub struct UserDirectory<'a> {
    users: &'a [User],
    by_id: HashMap<&'a str, &'a User>,
}

impl<'a> UserDirectory<'a> {
    #[must_use]
    pub fn new(users: &'a [User]) -> Self {
        let mut by_id = HashMap::with_capacity(users.len());
        for user in users {
            by_id.entry(user.id.as_str()).or_insert(user);
        }
        Self { users, by_id }
    }

    #[must_use]
    pub fn get(&self, user_id: &str) -> Option<&'a User> {
        self.by_id.get(user_id).copied()
    }

    /// Users in directory order.
    pub fn iter(&self) -> impl Iterator<Item = &'a User> + '_ {
        self.users.iter()
    }

    /// Handle for `user_id`; the id itself for a record without a name.
    #[must_use]
    pub fn name(&self, user_id: &str) -> &'a str {
        match self.get(user_id) {
            Some(user) => user.name().unwrap_or(user.id.as_str()),
            None => NULL_USER,
        }
    }

    #[must_use]
    pub fn full_name(&self, user_id: &str) -> &'a str {
        match self.get(user_id) {
            Some(user) => user.full_name().unwrap_or(NO_FULL_NAME),
            None => NULL_USER,
        }
    }
}
