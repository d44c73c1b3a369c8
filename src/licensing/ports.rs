//! Collaborator interfaces consumed by the registration flow.

use crate::licensing::types::{License, LicenseInformation, TrialPeriod};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Called with the new state after every license change
pub type LicenseChangeCallback = Box<dyn Fn(LicenseInformation) + Send + Sync>;

/// Called with `(name, license_code)` when verification rejects a registration
pub type InvalidLicenseCallback = Box<dyn Fn(&str, &str) + Send + Sync>;

/// Decides whether a license code was issued for a name
pub trait LicenseVerifier {
    fn is_valid(&self, license_code: &str, for_name: &str) -> bool;
}

impl<F> LicenseVerifier for F
where
    F: Fn(&str, &str) -> bool,
{
    fn is_valid(&self, license_code: &str, for_name: &str) -> bool {
        self(license_code, for_name)
    }
}

/// Write side of license persistence
pub trait WritesLicense {
    fn store(&self, license_code: &str, for_name: &str);
    fn remove_license(&self);
}

/// Read side of license persistence
pub trait ProvidesLicense {
    fn current_license(&self) -> Option<License>;
}

pub trait ProvidesLicenseInformation {
    fn current_license_information(&self) -> LicenseInformation;
}

/// Trial window that still remains, i.e. was started and has not ended
pub trait ProvidesTrial {
    fn current_trial_period(&self) -> Option<TrialPeriod>;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Entry point for UI code that only needs to submit a registration
pub trait HandlesRegistering {
    fn register(&self, name: &str, license_code: &str);
}

impl<T: WritesLicense + ?Sized> WritesLicense for &T {
    fn store(&self, license_code: &str, for_name: &str) {
        (**self).store(license_code, for_name)
    }

    fn remove_license(&self) {
        (**self).remove_license()
    }
}

impl<T: ProvidesLicense + ?Sized> ProvidesLicense for &T {
    fn current_license(&self) -> Option<License> {
        (**self).current_license()
    }
}

impl<T: ProvidesLicenseInformation + ?Sized> ProvidesLicenseInformation for &T {
    fn current_license_information(&self) -> LicenseInformation {
        (**self).current_license_information()
    }
}

impl<T: ProvidesTrial + ?Sized> ProvidesTrial for &T {
    fn current_trial_period(&self) -> Option<TrialPeriod> {
        (**self).current_trial_period()
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<T: WritesLicense + ?Sized> WritesLicense for Arc<T> {
    fn store(&self, license_code: &str, for_name: &str) {
        (**self).store(license_code, for_name)
    }

    fn remove_license(&self) {
        (**self).remove_license()
    }
}

impl<T: ProvidesLicense + ?Sized> ProvidesLicense for Arc<T> {
    fn current_license(&self) -> Option<License> {
        (**self).current_license()
    }
}

impl<T: ProvidesTrial + ?Sized> ProvidesTrial for Arc<T> {
    fn current_trial_period(&self) -> Option<TrialPeriod> {
        (**self).current_trial_period()
    }
}
