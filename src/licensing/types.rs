use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::licensing::config::user_info_keys;

/// A verified registration: the licensee name and the code issued for it
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct License {
    pub name: String,
    pub license_code: String,
}

impl License {
    pub fn new(name: impl Into<String>, license_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            license_code: license_code.into(),
        }
    }
}

/// Time window in which the app can be used without a license
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct TrialPeriod {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl TrialPeriod {
    /// Trial starting at `start` and lasting `days`, `None` if the end date
    /// is not representable
    pub fn new(start: DateTime<Utc>, days: i64) -> Option<Self> {
        let end_date = start.checked_add_signed(Duration::try_days(days)?)?;

        Some(Self {
            start_date: start,
            end_date,
        })
    }

    /// A window that ended just before `now`
    pub fn expired(now: DateTime<Utc>) -> Self {
        let end_date = now - Duration::seconds(1);

        Self {
            start_date: end_date,
            end_date,
        }
    }

    /// Whole days remaining at `now`, never negative
    pub fn days_left(&self, now: DateTime<Utc>) -> i64 {
        (self.end_date - now).num_days().max(0)
    }

    pub fn ended(&self, now: DateTime<Utc>) -> bool {
        now > self.end_date
    }
}

/// Current licensing state of the application
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(tag = "state", content = "details", rename_all = "snake_case")]
pub enum LicenseInformation {
    Registered(License),
    OnTrial(TrialPeriod),
    TrialUp,
}

impl LicenseInformation {
    pub fn is_registered(&self) -> bool {
        matches!(self, LicenseInformation::Registered(_))
    }

    /// Flat key/value projection attached to "License Changed" notifications
    pub fn user_info(&self) -> Map<String, Value> {
        let mut info = Map::new();

        match self {
            LicenseInformation::Registered(license) => {
                info.insert(user_info_keys::REGISTERED.into(), Value::Bool(true));
                info.insert(user_info_keys::NAME.into(), Value::String(license.name.clone()));
                info.insert(
                    user_info_keys::LICENSE_CODE.into(),
                    Value::String(license.license_code.clone()),
                );
            }
            LicenseInformation::OnTrial(period) => {
                info.insert(user_info_keys::REGISTERED.into(), Value::Bool(false));
                info.insert(user_info_keys::ON_TRIAL.into(), Value::Bool(true));
                info.insert(
                    user_info_keys::START_DATE.into(),
                    Value::String(period.start_date.to_rfc3339()),
                );
                info.insert(
                    user_info_keys::END_DATE.into(),
                    Value::String(period.end_date.to_rfc3339()),
                );
            }
            LicenseInformation::TrialUp => {
                info.insert(user_info_keys::REGISTERED.into(), Value::Bool(false));
                info.insert(user_info_keys::ON_TRIAL.into(), Value::Bool(false));
            }
        }

        info
    }

    /// Parse a projection produced by [`LicenseInformation::user_info`]
    pub fn from_user_info(info: &Map<String, Value>) -> Option<Self> {
        let registered = info.get(user_info_keys::REGISTERED)?.as_bool()?;

        if registered {
            let name = info.get(user_info_keys::NAME)?.as_str()?;
            let license_code = info.get(user_info_keys::LICENSE_CODE)?.as_str()?;
            return Some(LicenseInformation::Registered(License::new(name, license_code)));
        }

        if !info.get(user_info_keys::ON_TRIAL)?.as_bool()? {
            return Some(LicenseInformation::TrialUp);
        }

        let parse_date = |key: &str| {
            info.get(key)
                .and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|d| d.with_timezone(&Utc))
        };

        Some(LicenseInformation::OnTrial(TrialPeriod {
            start_date: parse_date(user_info_keys::START_DATE)?,
            end_date: parse_date(user_info_keys::END_DATE)?,
        }))
    }
}

/// Licensing state for the frontend (simplified view)
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct LicenseSummary {
    pub information: LicenseInformation,
    pub trial_days_remaining: Option<i64>,
    pub can_use_app: bool,
}

/// Error types for licensing infrastructure (files, data directories)
#[derive(thiserror::Error, Debug)]
pub enum LicenseError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupt data: {0}")]
    Corrupt(String),

    #[error("Trial length out of range: {0} days")]
    InvalidTrialDays(i64),

    #[error("No data directory available on this platform")]
    NoDataDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Serialize for LicenseError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
