// src/traits/app_traits.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Error;
use crate::models::AppSettings;

/// Settings collaborator. Handlers read the active settings on every
/// invocation, so a configuration change between events is always seen.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    async fn get_settings(&self) -> Result<AppSettings, Error>;
}

/// Deferred job scheduling collaborator: one-shot jobs with at-least-once,
/// single delivery after the requested instant.
#[async_trait]
pub trait JobScheduler: Send + Sync {
    async fn schedule(
        &self,
        name: &str,
        run_at: DateTime<Utc>,
        payload: serde_json::Value,
    ) -> Result<Uuid, Error>;
}
