// src/models/user.rs
use serde::{Deserialize, Serialize};

use crate::constants::SCORE_UNASSIGNED;

/// Current User Score for a tracked user.
///
/// `Unassigned` means "not enough history to judge", which is distinct
/// from a score of zero. The store and the global index encode it as the
/// reserved sentinel value `-1.0`; that encoding never leaves the storage
/// layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UserScore {
    Unassigned,
    Assigned(f64),
}

impl UserScore {
    /// Numeric encoding used by the store hash field and the sorted index.
    pub fn to_index_value(self) -> f64 {
        match self {
            UserScore::Unassigned => SCORE_UNASSIGNED,
            UserScore::Assigned(v) => v,
        }
    }

    /// Decode the store/index representation. Any negative value is the
    /// unassigned sentinel; real scores are always in `[0, 1]`.
    pub fn from_index_value(value: f64) -> Self {
        if value < 0.0 {
            UserScore::Unassigned
        } else {
            UserScore::Assigned(value)
        }
    }

    pub fn assigned(self) -> Option<f64> {
        match self {
            UserScore::Unassigned => None,
            UserScore::Assigned(v) => Some(v),
        }
    }

    pub fn is_assigned(self) -> bool {
        matches!(self, UserScore::Assigned(_))
    }
}

/// Per-user record held in the persistent store, keyed by username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Opaque platform user ID. Immutable once set.
    pub id: String,
    /// Username; also the store lookup key. Immutable.
    pub name: String,
    /// Tracked comment IDs in chronological arrival order, no duplicates,
    /// at most `MAX_ITEMS` entries.
    pub tracked_ids: Vec<String>,
    /// Comment IDs currently flagged as moderator-removed, bounded like
    /// `tracked_ids`.
    pub removed_ids: Vec<String>,
    /// Last computed User Score.
    pub score: UserScore,
    /// Window size in effect when `score` was last computed. Lets a later
    /// read detect a settings change and recompute.
    pub window_used: usize,
}

impl UserRecord {
    pub fn new(name: &str, id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            tracked_ids: Vec::new(),
            removed_ids: Vec::new(),
            score: UserScore::Unassigned,
            window_used: 0,
        }
    }

    pub fn is_tracked(&self, comment_id: &str) -> bool {
        self.tracked_ids.iter().any(|id| id == comment_id)
    }

    pub fn is_removed(&self, comment_id: &str) -> bool {
        self.removed_ids.iter().any(|id| id == comment_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_round_trip() {
        assert_eq!(UserScore::Unassigned.to_index_value(), SCORE_UNASSIGNED);
        assert_eq!(UserScore::from_index_value(-1.0), UserScore::Unassigned);
        assert_eq!(UserScore::from_index_value(0.0), UserScore::Assigned(0.0));
        assert_eq!(UserScore::from_index_value(0.4), UserScore::Assigned(0.4));
    }

    #[test]
    fn new_record_is_empty_and_unscored() {
        let record = UserRecord::new("shiruken", "t2_abc123");
        assert!(record.tracked_ids.is_empty());
        assert!(record.removed_ids.is_empty());
        assert_eq!(record.score, UserScore::Unassigned);
        assert_eq!(record.window_used, 0);
    }
}
