// src/models/event.rs
use serde::{Deserialize, Serialize};

/// Comment reference carried on inbound events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentInfo {
    pub id: String,
}

/// Actor identity supplied by the host platform (already authenticated).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
}

/// "Content submitted" event from the host platform's event delivery.
///
/// Fields the handlers require are optional here so that an absent field
/// can be raised as a fatal `Error::MissingField` for the invocation
/// instead of being silently defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentSubmitEvent {
    pub comment: Option<CommentInfo>,
    pub author: Option<UserInfo>,
    pub subreddit: Option<String>,
}

/// "Moderation action" event from the host platform.
///
/// `action` is the platform's raw action name; only comment removal,
/// spam-filtering, and approval are of interest here (see
/// [`ModActionKind::parse`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModActionEvent {
    pub action: Option<String>,
    pub target_comment: Option<CommentInfo>,
    pub target_user: Option<UserInfo>,
    pub moderator: Option<UserInfo>,
    pub subreddit: Option<String>,
}

/// The moderation actions that affect removal tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModActionKind {
    RemoveComment,
    SpamComment,
    ApproveComment,
}

impl ModActionKind {
    /// Map a raw platform action name onto a tracked kind. Returns `None`
    /// for every other action type (bans, post removals, ...), which the
    /// handler ignores.
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "removecomment" => Some(Self::RemoveComment),
            "spamcomment" => Some(Self::SpamComment),
            "approvecomment" => Some(Self::ApproveComment),
            _ => None,
        }
    }

    /// Whether this action marks the comment as removed (as opposed to
    /// approving it back).
    pub fn is_removal(self) -> bool {
        matches!(self, Self::RemoveComment | Self::SpamComment)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RemoveComment => "removecomment",
            Self::SpamComment => "spamcomment",
            Self::ApproveComment => "approvecomment",
        }
    }
}

impl std::fmt::Display for ModActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload carried by the one-shot deferred re-invocation of the
/// moderation-action handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayedModActionPayload {
    pub action: ModActionKind,
    pub username: String,
    pub comment_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tracked_action_kinds() {
        assert_eq!(ModActionKind::parse("removecomment"), Some(ModActionKind::RemoveComment));
        assert_eq!(ModActionKind::parse("spamcomment"), Some(ModActionKind::SpamComment));
        assert_eq!(ModActionKind::parse("approvecomment"), Some(ModActionKind::ApproveComment));
        assert_eq!(ModActionKind::parse("banuser"), None);
        assert_eq!(ModActionKind::parse("removelink"), None);
    }

    #[test]
    fn payload_round_trips_through_json() {
        let payload = DelayedModActionPayload {
            action: ModActionKind::SpamComment,
            username: "shiruken".to_string(),
            comment_id: "t1_xyz".to_string(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["action"], "spamcomment");
        let back: DelayedModActionPayload = serde_json::from_value(value).unwrap();
        assert_eq!(back.action, ModActionKind::SpamComment);
        assert_eq!(back.username, "shiruken");
        assert_eq!(back.comment_id, "t1_xyz");
    }
}
