// scorer-core/src/services/moderation.rs
//!
//! Handler for moderation actions on existing comments. Tracks removal
//! and approval against users' histories.
//!
//! The "new submission" and "moderation action" event streams arrive
//! through separate channels and may be ordered either way for the same
//! comment. When an automated moderator's action references a comment the
//! submission handler has not persisted yet, processing is deferred once
//! by a fixed delay and re-run; if the comment is still untracked after
//! the delay it is dropped for good.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{error, info};

use scorer_common::constants::MOD_ACTION_RETRY_DELAY_SECS;
use scorer_common::models::{DelayedModActionPayload, ModActionEvent, ModActionKind, UserRecord};
use scorer_common::traits::{JobScheduler, KvStore, SettingsProvider};

use crate::history::trim_history;
use crate::scoring::calculate_score;
use crate::services::{is_automated_moderator, is_ignored_target};
use crate::storage::UserScoreStore;
use crate::Error;

/// Scheduler job name for the deferred re-invocation.
pub const DELAYED_MOD_ACTION_JOB: &str = "delayed_mod_action";

pub struct ModActionService<K: KvStore> {
    store: UserScoreStore<K>,
    scheduler: Arc<dyn JobScheduler>,
    settings: Arc<dyn SettingsProvider>,
}

impl<K: KvStore> ModActionService<K> {
    pub fn new(
        store: UserScoreStore<K>,
        scheduler: Arc<dyn JobScheduler>,
        settings: Arc<dyn SettingsProvider>,
    ) -> Self {
        Self { store, scheduler, settings }
    }

    /// Process a moderation action delivered by the host platform.
    pub async fn handle_mod_action(&self, event: &ModActionEvent) -> Result<(), Error> {
        let action_name = event.action.as_deref().ok_or(Error::MissingField("action"))?;

        // Only comment removals and approvals matter here
        let Some(action) = ModActionKind::parse(action_name) else {
            return Ok(());
        };

        let comment = event
            .target_comment
            .as_ref()
            .ok_or(Error::MissingField("target_comment"))?;
        let user = event
            .target_user
            .as_ref()
            .ok_or(Error::MissingField("target_user"))?;
        let subreddit = event.subreddit.as_deref().ok_or(Error::MissingField("subreddit"))?;

        if is_ignored_target(&user.name, subreddit) {
            return Ok(());
        }

        let data = self.store.get_user(&user.name).await?;

        match data {
            Some(record) if record.is_tracked(&comment.id) => {
                self.apply_mod_action(record, action, &comment.id).await
            }
            // User or comment not yet tracked: the submission handler may
            // still be in flight, so defer automated actions once
            _ => {
                let moderator = event
                    .moderator
                    .as_ref()
                    .ok_or(Error::MissingField("moderator"))?;

                if is_automated_moderator(&moderator.name) {
                    let payload = serde_json::to_value(DelayedModActionPayload {
                        action,
                        username: user.name.clone(),
                        comment_id: comment.id.clone(),
                    })?;
                    let run_at = Utc::now() + Duration::seconds(MOD_ACTION_RETRY_DELAY_SECS);
                    self.scheduler
                        .schedule(DELAYED_MOD_ACTION_JOB, run_at, payload)
                        .await?;
                    info!(
                        "u/{}: Delaying processing of {} by {} on {}",
                        user.name, action, moderator.name, comment.id
                    );
                } else {
                    error!(
                        "u/{}: Skipped {} on {} by {}, user or comment not tracked",
                        user.name, action, comment.id, moderator.name
                    );
                }
                Ok(())
            }
        }
    }

    /// Deferred re-invocation entry point. Re-runs the lookup with no
    /// prior record reference; if the comment is still untracked the
    /// action is dropped, never retried again. That happens when the
    /// action targeted a comment older than this installation.
    pub async fn process_delayed(&self, payload: serde_json::Value) -> Result<(), Error> {
        let payload: DelayedModActionPayload = serde_json::from_value(payload)
            .map_err(|e| Error::Payload(e.to_string()))?;

        info!(
            "u/{}: Beginning delayed processing of {} on {}",
            payload.username, payload.action, payload.comment_id
        );

        let Some(record) = self.store.get_user(&payload.username).await? else {
            error!(
                "u/{}: Skipped {} on {}, user not tracked after delayed processing",
                payload.username, payload.action, payload.comment_id
            );
            return Ok(());
        };

        if record.tracked_ids.is_empty() {
            error!(
                "u/{}: Skipped {} on {}, no comments tracked",
                payload.username, payload.action, payload.comment_id
            );
            return Ok(());
        }

        if !record.is_tracked(&payload.comment_id) {
            error!(
                "u/{}: Skipped {} on {}, missing from tracked comments",
                payload.username, payload.action, payload.comment_id
            );
            return Ok(());
        }

        self.apply_mod_action(record, payload.action, &payload.comment_id).await
    }

    /// Apply a removal/approval to the user's removed-comment set and
    /// persist the recomputed score. Idempotent against duplicate
    /// delivery of the same action.
    async fn apply_mod_action(
        &self,
        mut record: UserRecord,
        action: ModActionKind,
        comment_id: &str,
    ) -> Result<(), Error> {
        let settings = self.settings.get_settings().await?;
        let username = record.name.clone();

        if action.is_removal() {
            if !record.is_removed(comment_id) {
                record.removed_ids.push(comment_id.to_string());
                trim_history(&mut record.removed_ids);
                record.score = calculate_score(&record, settings.num_comments);
                record.window_used = settings.num_comments;
                self.store.save_moderation(&record).await?;
                info!(
                    "u/{}: {} on {} (comments={}, removed={}, score={:?})",
                    username,
                    action,
                    comment_id,
                    record.tracked_ids.len(),
                    record.removed_ids.len(),
                    record.score
                );
            } else {
                info!(
                    "u/{}: Skipped {} on {}, already tracked in removed comments",
                    username, action, comment_id
                );
            }
        } else {
            // Approval reverses a removal
            if let Some(index) = record.removed_ids.iter().position(|id| id == comment_id) {
                record.removed_ids.remove(index);
                record.score = calculate_score(&record, settings.num_comments);
                record.window_used = settings.num_comments;
                self.store.save_moderation(&record).await?;
                info!(
                    "u/{}: {} on {} (comments={}, removed={}, score={:?})",
                    username,
                    action,
                    comment_id,
                    record.tracked_ids.len(),
                    record.removed_ids.len(),
                    record.score
                );
            } else {
                info!(
                    "u/{}: Skipped {} on {}, not tracked as removed comment",
                    username, action, comment_id
                );
            }
        }
        Ok(())
    }
}
