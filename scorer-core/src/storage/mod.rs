// scorer-core/src/storage/mod.rs
//!
//! The user record store and its mirror into the global sorted index.
//!
//! One hash per user, keyed by username, plus the `#users` sorted set
//! mapping every tracked username to its current score. Every write of a
//! score also updates the index in the same logical step; a crash between
//! the two leaves the index stale for that user until the next successful
//! write, which is accepted and self-healing.
//!
//! The submission and moderation write paths touch disjoint field groups
//! of the same hash (`tracked_ids` vs `removed_ids`) on purpose: the two
//! handlers may run concurrently for the same user with no lock, and a
//! whole-record write from one would clobber the other's in-flight update.

pub mod memory;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use scorer_common::constants::USERS_KEY;
use scorer_common::models::{UserRecord, UserScore};
use scorer_common::traits::KvStore;

use crate::Error;

pub use memory::InMemoryKv;

// Hash field schema. Fixed and versionless; additions only.
const FIELD_ID: &str = "id";
const FIELD_NAME: &str = "name";
const FIELD_TRACKED_IDS: &str = "tracked_ids";
const FIELD_REMOVED_IDS: &str = "removed_ids";
const FIELD_SCORE: &str = "score";
const FIELD_WINDOW_USED: &str = "window_used";

pub struct UserScoreStore<K: KvStore> {
    kv: Arc<K>,
}

impl<K: KvStore> Clone for UserScoreStore<K> {
    fn clone(&self) -> Self {
        Self { kv: Arc::clone(&self.kv) }
    }
}

impl<K: KvStore> UserScoreStore<K> {
    pub fn new(kv: Arc<K>) -> Self {
        Self { kv }
    }

    /// Read the record for `username`. Returns `None` if the user has
    /// never been tracked, so callers can tell a new user apart from a
    /// user with zero history.
    pub async fn get_user(&self, username: &str) -> Result<Option<UserRecord>, Error> {
        let hash = self.kv.hgetall(username).await?;
        if hash.is_empty() {
            return Ok(None);
        }
        Ok(Some(parse_record(username, &hash)?))
    }

    /// Create storage for a user seen for the first time.
    ///
    /// The submission handler performs check-then-init with no mutual
    /// exclusion, so a record may have appeared since the caller's check.
    /// In that case the existing record is returned untouched instead of
    /// being reset to empty histories.
    pub async fn init_user(&self, username: &str, id: &str) -> Result<UserRecord, Error> {
        if let Some(existing) = self.get_user(username).await? {
            info!("u/{}: Storage already initialized, reusing record", username);
            return Ok(existing);
        }

        let record = UserRecord::new(username, id);
        self.kv
            .hset(
                username,
                &[
                    (FIELD_ID, record.id.clone()),
                    (FIELD_NAME, record.name.clone()),
                    (FIELD_TRACKED_IDS, serde_json::to_string(&record.tracked_ids)?),
                    (FIELD_REMOVED_IDS, serde_json::to_string(&record.removed_ids)?),
                    (FIELD_SCORE, record.score.to_index_value().to_string()),
                    (FIELD_WINDOW_USED, record.window_used.to_string()),
                ],
            )
            .await?;
        self.kv
            .zadd(USERS_KEY, username, record.score.to_index_value())
            .await?;

        info!("u/{}: Initialized storage", username);
        Ok(record)
    }

    /// Persist `tracked_ids`, score, and window after a submission.
    /// Leaves `removed_ids` untouched.
    pub async fn save_submission(&self, record: &UserRecord) -> Result<(), Error> {
        self.kv
            .hset(
                &record.name,
                &[
                    (FIELD_TRACKED_IDS, serde_json::to_string(&record.tracked_ids)?),
                    (FIELD_SCORE, record.score.to_index_value().to_string()),
                    (FIELD_WINDOW_USED, record.window_used.to_string()),
                ],
            )
            .await?;
        self.mirror_score(record).await
    }

    /// Persist `removed_ids`, score, and window after a moderation action.
    /// Leaves `tracked_ids` untouched.
    pub async fn save_moderation(&self, record: &UserRecord) -> Result<(), Error> {
        self.kv
            .hset(
                &record.name,
                &[
                    (FIELD_REMOVED_IDS, serde_json::to_string(&record.removed_ids)?),
                    (FIELD_SCORE, record.score.to_index_value().to_string()),
                    (FIELD_WINDOW_USED, record.window_used.to_string()),
                ],
            )
            .await?;
        self.mirror_score(record).await
    }

    /// Persist only the score. Used when a read path recomputes after a
    /// settings change without touching either history list.
    pub async fn save_score(&self, record: &UserRecord) -> Result<(), Error> {
        self.kv
            .hset(
                &record.name,
                &[(FIELD_SCORE, record.score.to_index_value().to_string())],
            )
            .await?;
        self.mirror_score(record).await
    }

    /// Administrative purge of one user's record and index entry.
    pub async fn delete_user(&self, username: &str) -> Result<(), Error> {
        self.kv.del(username).await?;
        self.kv.zrem(USERS_KEY, username).await?;
        info!("u/{}: Deleted from storage", username);
        Ok(())
    }

    /// Cardinality of the global index, obtained independently of any
    /// range scan.
    pub async fn user_count(&self) -> Result<u64, Error> {
        self.kv.zcard(USERS_KEY).await
    }

    /// Usernames and scores with `min <= score <= max`, ascending by score.
    pub async fn scores_in_range(&self, min: f64, max: f64) -> Result<Vec<(String, f64)>, Error> {
        self.kv.zrange_by_score(USERS_KEY, min, max).await
    }

    async fn mirror_score(&self, record: &UserRecord) -> Result<(), Error> {
        self.kv
            .zadd(USERS_KEY, &record.name, record.score.to_index_value())
            .await
    }
}

fn parse_record(username: &str, hash: &HashMap<String, String>) -> Result<UserRecord, Error> {
    let field = |name: &str| -> Result<&String, Error> {
        hash.get(name)
            .ok_or_else(|| Error::Storage(format!("u/{}: missing `{}` field", username, name)))
    };

    Ok(UserRecord {
        id: field(FIELD_ID)?.clone(),
        name: field(FIELD_NAME)?.clone(),
        tracked_ids: serde_json::from_str(field(FIELD_TRACKED_IDS)?)?,
        removed_ids: serde_json::from_str(field(FIELD_REMOVED_IDS)?)?,
        score: UserScore::from_index_value(field(FIELD_SCORE)?.parse::<f64>()?),
        window_used: field(FIELD_WINDOW_USED)?.parse::<usize>()?,
    })
}
