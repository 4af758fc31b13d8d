// scorer-core/src/services/mod.rs

pub mod moderation;
pub mod report;
pub mod submission;

pub use moderation::{ModActionService, DELAYED_MOD_ACTION_JOB};
pub use report::ReportService;
pub use submission::SubmissionService;

/// Comments from these accounts are never tracked: the platform's
/// automated moderation account and the community's shared mod account.
pub(crate) fn is_automated_account(username: &str, subreddit: &str) -> bool {
    username == "AutoModerator" || username == format!("{}-ModTeam", subreddit)
}

/// Moderation actions targeting these accounts are ignored; deleted
/// accounts additionally so, since their history can no longer change.
pub(crate) fn is_ignored_target(username: &str, subreddit: &str) -> bool {
    is_automated_account(username, subreddit) || username == "[deleted]"
}

/// Only actions by the platform itself or its automated moderator are
/// eligible for delayed-retry handling; a human moderator acting on an
/// untracked comment is a genuine miss.
pub(crate) fn is_automated_moderator(username: &str) -> bool {
    username == "AutoModerator" || username == "reddit"
}

/// Format a score the way it appears in reports and report reasons:
/// at least one decimal, at most two.
pub(crate) fn format_score(score: f64) -> String {
    let s = format!("{:.2}", score);
    let trimmed = s.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}
