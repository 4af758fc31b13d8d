// scorer-core/src/scoring.rs
//!
//! The User Score calculation. Pure; no I/O, no side effects.

use scorer_common::constants::MIN_TRACKED;
use scorer_common::models::{UserRecord, UserScore};

/// Calculate the User Score for a user based on their recent comments.
///
/// User Score = fraction of the most recent `window` tracked comments
/// that have been removed by a moderator. Users with fewer than
/// `MIN_TRACKED` tracked comments are not scored.
///
/// The caller is responsible for `window` being within
/// `[MIN_TRACKED, MAX_ITEMS]`; configuration validation enforces that
/// upstream.
pub fn calculate_score(record: &UserRecord, window: usize) -> UserScore {
    if record.tracked_ids.len() < MIN_TRACKED {
        return UserScore::Unassigned;
    }
    let start = record.tracked_ids.len().saturating_sub(window);
    let recent = &record.tracked_ids[start..];
    let removed = recent.iter().filter(|id| record.is_removed(id)).count();
    UserScore::Assigned(removed as f64 / recent.len() as f64)
}

/// Number of comments the current score was (or would be) computed over.
pub fn window_length(record: &UserRecord, window: usize) -> usize {
    record.tracked_ids.len().min(window)
}
