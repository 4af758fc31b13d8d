// src/models/settings.rs
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_ITEMS, MIN_TRACKED};
use crate::error::Error;

/// Installation settings supplied by the settings collaborator.
///
/// Bounds validation is the settings surface's responsibility; the core
/// treats a delivered `AppSettings` as pre-validated. [`AppSettings::validate`]
/// is provided for hosts without a validating settings UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Number of recent comments to consider when calculating a User Score.
    pub num_comments: usize,
    /// Enable reporting of comments that exceed the report threshold.
    pub report_comments: bool,
    /// Report comments with a User Score greater than or equal to this value.
    pub report_threshold: f64,
    /// Enable removal of comments that exceed the remove threshold.
    pub remove_comments: bool,
    /// Remove comments with a User Score greater than or equal to this value.
    pub remove_threshold: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            num_comments: 10,
            report_comments: true,
            report_threshold: 0.4,
            remove_comments: false,
            remove_threshold: 0.6,
        }
    }
}

impl AppSettings {
    pub fn validate(&self) -> Result<(), Error> {
        if self.num_comments < MIN_TRACKED {
            return Err(Error::Platform(format!(
                "num_comments must be greater than or equal to {}",
                MIN_TRACKED
            )));
        }
        if self.num_comments > MAX_ITEMS {
            return Err(Error::Platform(format!(
                "num_comments must be less than or equal to {}",
                MAX_ITEMS
            )));
        }
        for (name, value) in [
            ("report_threshold", self.report_threshold),
            ("remove_threshold", self.remove_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Platform(format!("{} must be within [0, 1]", name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AppSettings::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_bounds_values() {
        let mut settings = AppSettings::default();
        settings.num_comments = 2;
        assert!(settings.validate().is_err());

        let mut settings = AppSettings::default();
        settings.num_comments = MAX_ITEMS + 1;
        assert!(settings.validate().is_err());

        let mut settings = AppSettings::default();
        settings.report_threshold = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = AppSettings::default();
        settings.remove_threshold = -0.1;
        assert!(settings.validate().is_err());
    }
}
