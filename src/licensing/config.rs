use crate::licensing::types::LicenseError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the event posted whenever the license state changes
pub const LICENSE_CHANGED_EVENT: &str = "License Changed";

/// Webview event names only allow alphanumerics and `-/:_`
pub const DESKTOP_LICENSE_CHANGED_EVENT: &str = "license-changed";
pub const DESKTOP_INVALID_LICENSE_EVENT: &str = "invalid-license";

/// Trial configuration
pub const TRIAL_DAYS: i64 = 30;
pub const MAX_TRIAL_DAYS: i64 = 3650;

/// Storage file names in the app data dir
pub const LICENSE_FILE: &str = "license.json";
pub const TRIAL_FILE: &str = "trial.json";

pub const DEFAULT_APP_IDENTIFIER: &str = "trial-license";

/// Keys of the notification user info
pub mod user_info_keys {
    pub const REGISTERED: &str = "registered";
    pub const NAME: &str = "name";
    pub const LICENSE_CODE: &str = "licenseCode";
    pub const ON_TRIAL: &str = "on_trial";
    pub const START_DATE: &str = "start_date";
    pub const END_DATE: &str = "end_date";
}

/// Where licensing data lives and how long the trial lasts
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LicensingConfig {
    pub app_identifier: String,
    pub license_file: String,
    pub trial_file: String,
    pub trial_days: i64,
}

impl Default for LicensingConfig {
    fn default() -> Self {
        Self {
            app_identifier: DEFAULT_APP_IDENTIFIER.to_string(),
            license_file: LICENSE_FILE.to_string(),
            trial_file: TRIAL_FILE.to_string(),
            trial_days: TRIAL_DAYS,
        }
    }
}

/// Reject trial lengths outside `1..=MAX_TRIAL_DAYS`
pub fn validate_trial_days(days: i64) -> Result<(), LicenseError> {
    if (1..=MAX_TRIAL_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(LicenseError::InvalidTrialDays(days))
    }
}

impl LicensingConfig {
    pub fn new(app_identifier: impl Into<String>) -> Self {
        Self {
            app_identifier: app_identifier.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), LicenseError> {
        validate_trial_days(self.trial_days)
    }

    /// Resolve the app data directory, creating it if needed
    pub fn data_dir(&self) -> Result<PathBuf, LicenseError> {
        let dir = dirs::data_local_dir()
            .ok_or(LicenseError::NoDataDir)?
            .join(&self.app_identifier);

        std::fs::create_dir_all(&dir)
            .map_err(|e| LicenseError::Storage(format!("Failed to create app data dir: {}", e)))?;

        Ok(dir)
    }
}
