// src/constants.rs

/// Maximum number of items to track per user.
pub const MAX_ITEMS: usize = 1000;

/// Minimum number of tracked comments necessary to start assigning User Scores.
pub const MIN_TRACKED: usize = 5;

/// Key of the sorted index of all tracked users (`username -> score`).
pub const USERS_KEY: &str = "#users";

/// Sentinel written to the store and the sorted index for users without
/// enough history to score. Never surfaces past the storage layer; the
/// domain model uses [`UserScore::Unassigned`](crate::models::UserScore).
pub const SCORE_UNASSIGNED: f64 = -1.0;

/// Seconds to wait before re-running a mod action that referenced an
/// untracked user or comment. Fixed, not configurable.
pub const MOD_ACTION_RETRY_DELAY_SECS: i64 = 5;

/// Longest bar drawn in the report histogram before switching to
/// proportional scaling.
pub const HISTOGRAM_MAX_BAR_LENGTH: usize = 50;
