// scorer-core/src/test_utils/mod.rs
//!
//! Collaborator fakes shared by the integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use scorer_common::models::AppSettings;
use scorer_common::traits::{JobScheduler, SettingsProvider};

use crate::platform::{CommentState, ContentApi, Messenger};
use crate::Error;

/// Initialize tracing output for tests that want it (`RUST_LOG` driven).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Fixed settings, never changing between invocations.
pub struct StaticSettings {
    settings: AppSettings,
}

impl StaticSettings {
    pub fn new(settings: AppSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SettingsProvider for StaticSettings {
    async fn get_settings(&self) -> Result<AppSettings, Error> {
        Ok(self.settings.clone())
    }
}

/// Scripted [`ContentApi`]: comment states are seeded up front, and every
/// report/remove call is recorded. Report and remove failures can be
/// injected independently.
#[derive(Default)]
pub struct FakeContentApi {
    comments: Mutex<HashMap<String, CommentState>>,
    reported: Mutex<Vec<(String, String)>>,
    removed: Mutex<Vec<String>>,
    fail_report: AtomicBool,
    fail_remove: AtomicBool,
}

impl FakeContentApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_comment(&self, id: &str, removed: bool, spam: bool) {
        self.comments
            .lock()
            .unwrap()
            .insert(id.to_string(), CommentState { id: id.to_string(), removed, spam });
    }

    pub fn fail_reports(&self) {
        self.fail_report.store(true, Ordering::SeqCst);
    }

    pub fn fail_removals(&self) {
        self.fail_remove.store(true, Ordering::SeqCst);
    }

    pub fn reported(&self) -> Vec<(String, String)> {
        self.reported.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentApi for FakeContentApi {
    async fn get_comment(&self, comment_id: &str) -> Result<CommentState, Error> {
        self.comments
            .lock()
            .unwrap()
            .get(comment_id)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("no such comment: {}", comment_id)))
    }

    async fn report(&self, comment_id: &str, reason: &str) -> Result<(), Error> {
        if self.fail_report.load(Ordering::SeqCst) {
            return Err(Error::Platform("report failed".to_string()));
        }
        self.reported
            .lock()
            .unwrap()
            .push((comment_id.to_string(), reason.to_string()));
        Ok(())
    }

    async fn remove(&self, comment_id: &str) -> Result<(), Error> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(Error::Platform("remove failed".to_string()));
        }
        self.removed.lock().unwrap().push(comment_id.to_string());
        Ok(())
    }
}

/// [`JobScheduler`] that records every scheduled job without running it.
#[derive(Default)]
pub struct RecordingScheduler {
    jobs: Mutex<Vec<(String, DateTime<Utc>, serde_json::Value)>>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheduled(&self) -> Vec<(String, DateTime<Utc>, serde_json::Value)> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobScheduler for RecordingScheduler {
    async fn schedule(
        &self,
        name: &str,
        run_at: DateTime<Utc>,
        payload: serde_json::Value,
    ) -> Result<Uuid, Error> {
        self.jobs
            .lock()
            .unwrap()
            .push((name.to_string(), run_at, payload));
        Ok(Uuid::new_v4())
    }
}

/// [`Messenger`] that collects sent messages for assertions.
#[derive(Default)]
pub struct CollectingMessenger {
    messages: Mutex<Vec<(String, String)>>,
}

impl CollectingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for CollectingMessenger {
    async fn send(&self, subject: &str, body: &str) -> Result<(), Error> {
        self.messages
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}
