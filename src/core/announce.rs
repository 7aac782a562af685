//! Status reporting towards whoever started an export.

use async_trait::async_trait;

/// Surfaces progress and failure text to an interactive caller.
#[async_trait]
pub trait Announcer: Send + Sync {
    async fn announce(&self, text: &str);
}

/// Writes announcements to stderr; used when there is no Slack caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleAnnouncer;

#[async_trait]
impl Announcer for ConsoleAnnouncer {
    async fn announce(&self, text: &str) {
        eprintln!("{text}");
    }
}
