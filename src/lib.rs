//! License registration for desktop applications.
//!
//! [`RegistrationService`](licensing::RegistrationService) verifies and stores
//! licenses and reports every change of the licensing state through a
//! callback. [`AppLicensing`](licensing::AppLicensing) wires it to file
//! storage and a trial period; with the `desktop` feature the state is
//! exposed to a Tauri webview.

pub mod licensing;

pub use licensing::{
    AppLicensing, HandlesRegistering, License, LicenseChangeBroadcaster, LicenseError,
    LicenseInformation, LicenseVerifier, LicensingConfig, NotificationCenter, RegistrationService,
    TrialPeriod,
};
