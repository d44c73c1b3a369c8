use crate::licensing::config::validate_trial_days;
use crate::licensing::ports::{Clock, ProvidesTrial, SystemClock};
use crate::licensing::storage::{read_json, remove_file, write_json};
use crate::licensing::types::{LicenseError, TrialPeriod};
use std::path::PathBuf;
use std::sync::Mutex;

/// Tracks the trial window, persisted next to the license file
#[derive(Debug)]
pub struct TrialProvider<C = SystemClock> {
    path: Option<PathBuf>,
    clock: C,
    period: Mutex<Option<TrialPeriod>>,
}

impl TrialProvider<SystemClock> {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LicenseError> {
        Self::open_with_clock(path, SystemClock)
    }
}

impl<C: Clock> TrialProvider<C> {
    /// Open the trial stored at `path`.
    ///
    /// A corrupt file is replaced by an already expired trial so that
    /// damaging the file never grants a fresh one.
    pub fn open_with_clock(path: impl Into<PathBuf>, clock: C) -> Result<Self, LicenseError> {
        let path = path.into();
        let period = match read_json::<TrialPeriod>(&path) {
            Ok(period) => period,
            Err(LicenseError::Corrupt(reason)) => {
                log::warn!("Unreadable trial file {}, treating trial as expired", reason);
                let expired = TrialPeriod::expired(clock.now());
                if let Err(e) = write_json(&path, &expired) {
                    log::warn!("Could not rewrite trial file: {}", e);
                }
                Some(expired)
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            path: Some(path),
            clock,
            period: Mutex::new(period),
        })
    }

    pub fn in_memory(clock: C) -> Self {
        Self {
            path: None,
            clock,
            period: Mutex::new(None),
        }
    }

    /// Start a trial of `days` unless one was already started.
    /// Returns the trial in effect afterwards.
    pub fn start_trial(&self, days: i64) -> Result<TrialPeriod, LicenseError> {
        validate_trial_days(days)?;

        let mut period = self.period.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(existing) = *period {
            return Ok(existing);
        }

        let started = TrialPeriod::new(self.clock.now(), days)
            .ok_or(LicenseError::InvalidTrialDays(days))?;
        if let Some(path) = &self.path {
            write_json(path, &started)?;
        }

        log::info!("Started {}-day trial ending {}", days, started.end_date);
        *period = Some(started);
        Ok(started)
    }

    /// Stored trial, whether or not it has ended
    pub fn trial_period(&self) -> Option<TrialPeriod> {
        *self.period.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Days left in the trial, `None` if no trial was started
    pub fn days_left(&self) -> Option<i64> {
        self.trial_period().map(|p| p.days_left(self.clock.now()))
    }

    /// Forget the stored trial (for testing or reset)
    pub fn clear(&self) -> Result<(), LicenseError> {
        if let Some(path) = &self.path {
            remove_file(path)?;
        }

        *self.period.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

impl<C: Clock> ProvidesTrial for TrialProvider<C> {
    fn current_trial_period(&self) -> Option<TrialPeriod> {
        self.trial_period()
            .filter(|period| !period.ended(self.clock.now()))
    }
}
