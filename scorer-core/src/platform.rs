// scorer-core/src/platform.rs
//!
//! Collaborator traits for the host platform's moderation API and the
//! outbound messaging surface. Both are thin async boundaries; every call
//! is independently fallible.

use async_trait::async_trait;

use crate::Error;

/// Live state of a comment as reported by the platform.
#[derive(Debug, Clone)]
pub struct CommentState {
    pub id: String,
    pub removed: bool,
    pub spam: bool,
}

/// Moderation-action API of the host platform.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentApi: Send + Sync {
    async fn get_comment(&self, comment_id: &str) -> Result<CommentState, Error>;
    async fn report(&self, comment_id: &str, reason: &str) -> Result<(), Error>;
    async fn remove(&self, comment_id: &str) -> Result<(), Error>;
}

/// Outbound messaging collaborator used to deliver generated reports.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> Result<(), Error>;
}
