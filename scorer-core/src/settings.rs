// scorer-core/src/settings.rs
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use scorer_common::models::AppSettings;
use scorer_common::traits::SettingsProvider;

use crate::Error;

/// [`SettingsProvider`] backed by shared mutable state, for hosts that
/// update the installation settings at runtime. Handlers re-read settings
/// on every invocation, so an `update` takes effect on the next event.
#[derive(Clone)]
pub struct SharedSettings {
    inner: Arc<RwLock<AppSettings>>,
}

impl SharedSettings {
    pub fn new(settings: AppSettings) -> Self {
        Self { inner: Arc::new(RwLock::new(settings)) }
    }

    /// Replace the active settings. Bounds are checked here because this
    /// path bypasses any validating settings UI.
    pub async fn update(&self, settings: AppSettings) -> Result<(), Error> {
        settings.validate()?;
        *self.inner.write().await = settings;
        Ok(())
    }
}

impl Default for SharedSettings {
    fn default() -> Self {
        Self::new(AppSettings::default())
    }
}

#[async_trait]
impl SettingsProvider for SharedSettings {
    async fn get_settings(&self) -> Result<AppSettings, Error> {
        Ok(self.inner.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_replaces_settings_after_validation() {
        tokio_test::block_on(async {
            let shared = SharedSettings::default();

            let mut next = AppSettings::default();
            next.num_comments = 25;
            shared.update(next.clone()).await.unwrap();
            assert_eq!(shared.get_settings().await.unwrap(), next);

            let mut invalid = AppSettings::default();
            invalid.report_threshold = 2.0;
            assert!(shared.update(invalid).await.is_err());
            // Rejected update left the previous settings in place
            assert_eq!(shared.get_settings().await.unwrap().num_comments, 25);
        });
    }
}
