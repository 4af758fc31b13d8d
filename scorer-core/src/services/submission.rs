// scorer-core/src/services/submission.rs
//!
//! Handler for "content submitted" events: tracks the new comment in the
//! author's history, actions it when the author's score exceeds the
//! configured thresholds, and persists the recomputed score.

use std::sync::Arc;

use tracing::{error, info};

use scorer_common::constants::MIN_TRACKED;
use scorer_common::models::{AppSettings, CommentSubmitEvent, UserRecord, UserScore};
use scorer_common::traits::{KvStore, SettingsProvider};

use crate::history::trim_history;
use crate::platform::ContentApi;
use crate::scoring::{calculate_score, window_length};
use crate::services::{format_score, is_automated_account};
use crate::storage::UserScoreStore;
use crate::Error;

pub struct SubmissionService<K: KvStore> {
    store: UserScoreStore<K>,
    content: Arc<dyn ContentApi>,
    settings: Arc<dyn SettingsProvider>,
}

impl<K: KvStore> SubmissionService<K> {
    pub fn new(
        store: UserScoreStore<K>,
        content: Arc<dyn ContentApi>,
        settings: Arc<dyn SettingsProvider>,
    ) -> Self {
        Self { store, content, settings }
    }

    /// Track and action a newly submitted comment.
    pub async fn handle_comment_submit(&self, event: &CommentSubmitEvent) -> Result<(), Error> {
        let comment = event.comment.as_ref().ok_or(Error::MissingField("comment"))?;
        let author = event.author.as_ref().ok_or(Error::MissingField("author"))?;
        let subreddit = event.subreddit.as_deref().ok_or(Error::MissingField("subreddit"))?;

        if is_automated_account(&author.name, subreddit) {
            return Ok(());
        }

        let mut record = match self.store.get_user(&author.name).await? {
            Some(record) => record,
            None => self.store.init_user(&author.name, &author.id).await?,
        };

        if record.is_tracked(&comment.id) {
            info!("u/{}: Skipped {}, already tracked", author.name, comment.id);
            return Ok(());
        }

        let settings = self.settings.get_settings().await?;

        // Action the comment, if enabled and eligible. The decision is
        // made against the pre-append history; the score persisted below
        // covers the updated history.
        if settings.report_comments || settings.remove_comments {
            if record.tracked_ids.len() >= MIN_TRACKED {
                // Recalculate if the window setting changed since the
                // stored score was computed
                if settings.num_comments != record.window_used {
                    record.score = calculate_score(&record, settings.num_comments);
                    info!(
                        "u/{}: Recalculated score on settings change (score={:?})",
                        author.name, record.score
                    );
                }

                let lower_threshold = settings.report_threshold.min(settings.remove_threshold);
                if let UserScore::Assigned(score) = record.score {
                    if score >= lower_threshold {
                        self.action_comment(&record, score, &comment.id, &settings).await;
                    }
                }
            } else {
                info!(
                    "u/{}: Insufficient history to action {} (comments={})",
                    author.name,
                    comment.id,
                    record.tracked_ids.len()
                );
            }
        } else {
            error!("No actions are enabled in installation settings");
        }

        record.tracked_ids.push(comment.id.clone());
        trim_history(&mut record.tracked_ids);
        record.score = calculate_score(&record, settings.num_comments);
        record.window_used = settings.num_comments;
        self.store.save_submission(&record).await?;
        info!(
            "u/{}: Added {} (comments={}, removed={}, score={:?})",
            author.name,
            comment.id,
            record.tracked_ids.len(),
            record.removed_ids.len(),
            record.score
        );
        Ok(())
    }

    /// Report and/or remove the comment. Each attempt is independent;
    /// failures are logged and never abort the caller's bookkeeping.
    async fn action_comment(
        &self,
        record: &UserRecord,
        score: f64,
        comment_id: &str,
        settings: &AppSettings,
    ) {
        let state = match self.content.get_comment(comment_id).await {
            Ok(state) => state,
            Err(e) => {
                error!("u/{}: Error fetching {}: {}", record.name, comment_id, e);
                return;
            }
        };

        if settings.report_comments && score >= settings.report_threshold {
            let num_recent = window_length(record, settings.num_comments);
            let num_removed = (num_recent as f64 * score).round() as usize;
            let reason = format!(
                "Bad User Score ({}: {} of {} recent comments removed)",
                format_score(score),
                num_removed,
                num_recent
            );
            match self.content.report(comment_id, &reason).await {
                Ok(()) => info!("u/{}: Reported {} (score={})", record.name, comment_id, score),
                Err(e) => error!("u/{}: Error reporting {}: {}", record.name, comment_id, e),
            }
        }

        if settings.remove_comments && score >= settings.remove_threshold {
            if !state.removed && !state.spam {
                match self.content.remove(comment_id).await {
                    Ok(()) => info!("u/{}: Removed {} (score={})", record.name, comment_id, score),
                    Err(e) => error!("u/{}: Error removing {}: {}", record.name, comment_id, e),
                }
            } else {
                info!("u/{}: {} is already removed, skipping", record.name, comment_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MockContentApi;
    use crate::storage::InMemoryKv;
    use crate::test_utils::StaticSettings;
    use scorer_common::models::{CommentInfo, UserInfo};

    fn submit_event(comment_id: &str, username: &str) -> CommentSubmitEvent {
        CommentSubmitEvent {
            comment: Some(CommentInfo { id: comment_id.to_string() }),
            author: Some(UserInfo { id: "t2_abc".to_string(), name: username.to_string() }),
            subreddit: Some("rust".to_string()),
        }
    }

    #[tokio::test]
    async fn reports_with_formatted_reason_when_threshold_met() {
        let kv = Arc::new(InMemoryKv::new());
        let store = UserScoreStore::new(kv);

        // 5 tracked, 3 removed => score 0.6 against window 10
        let mut record = UserRecord::new("shiruken", "t2_abc");
        record.tracked_ids = (0..5).map(|i| format!("t1_{i}")).collect();
        record.removed_ids = vec!["t1_0", "t1_1", "t1_2"].into_iter().map(String::from).collect();
        record.score = UserScore::Assigned(0.6);
        record.window_used = 10;
        store.init_user("shiruken", "t2_abc").await.unwrap();
        store.save_submission(&record).await.unwrap();
        store.save_moderation(&record).await.unwrap();

        let mut content = MockContentApi::new();
        content
            .expect_get_comment()
            .returning(|id| Ok(crate::platform::CommentState { id: id.to_string(), removed: false, spam: false }));
        content
            .expect_report()
            .withf(|id, reason| id == "t1_new" && reason == "Bad User Score (0.6: 3 of 5 recent comments removed)")
            .times(1)
            .returning(|_, _| Ok(()));

        let service = SubmissionService::new(
            store.clone(),
            Arc::new(content),
            Arc::new(StaticSettings::new(AppSettings::default())),
        );
        service.handle_comment_submit(&submit_event("t1_new", "shiruken")).await.unwrap();

        let updated = store.get_user("shiruken").await.unwrap().unwrap();
        assert_eq!(updated.tracked_ids.len(), 6);
        assert!(updated.is_tracked("t1_new"));
    }
}
