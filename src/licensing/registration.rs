use crate::licensing::ports::{
    HandlesRegistering, InvalidLicenseCallback, LicenseChangeCallback, LicenseVerifier,
    ProvidesLicenseInformation, ProvidesTrial, WritesLicense,
};
use crate::licensing::types::{License, LicenseInformation};

/// Registers and unregisters the application, reporting every state change
/// through the change callback.
pub struct RegistrationService<V, W, I, T> {
    verifier: V,
    writer: W,
    information: I,
    trial: T,
    change_callback: LicenseChangeCallback,
    invalid_license_callback: InvalidLicenseCallback,
}

impl<V, W, I, T> RegistrationService<V, W, I, T>
where
    V: LicenseVerifier,
    W: WritesLicense,
    I: ProvidesLicenseInformation,
    T: ProvidesTrial,
{
    pub fn new(
        verifier: V,
        writer: W,
        information: I,
        trial: T,
        change_callback: LicenseChangeCallback,
        invalid_license_callback: InvalidLicenseCallback,
    ) -> Self {
        Self {
            verifier,
            writer,
            information,
            trial,
            change_callback,
            invalid_license_callback,
        }
    }

    /// Verify and store a license.
    ///
    /// A rejected code is reported to the invalid license callback and
    /// leaves the stored state untouched.
    pub fn register(&self, name: &str, license_code: &str) {
        if !self.verifier.is_valid(license_code, name) {
            log::warn!("Rejected license code for {}", name);
            (self.invalid_license_callback)(name, license_code);
            return;
        }

        let license = License::new(name, license_code);
        self.writer.store(&license.license_code, &license.name);

        log::info!("Registered license for {}", license.name);
        (self.change_callback)(LicenseInformation::Registered(license));
    }

    /// Remove the stored license.
    ///
    /// Removal always happens. Only a previously registered app reports a
    /// change, falling back to the remaining trial or to trial-up.
    pub fn unregister(&self) {
        let previous = self.information.current_license_information();

        self.writer.remove_license();

        if !previous.is_registered() {
            return;
        }

        let current = match self.trial.current_trial_period() {
            Some(period) => LicenseInformation::OnTrial(period),
            None => LicenseInformation::TrialUp,
        };

        log::info!("Unregistered license, now {:?}", current);
        (self.change_callback)(current);
    }
}

impl<V, W, I, T> HandlesRegistering for RegistrationService<V, W, I, T>
where
    V: LicenseVerifier,
    W: WritesLicense,
    I: ProvidesLicenseInformation,
    T: ProvidesTrial,
{
    fn register(&self, name: &str, license_code: &str) {
        RegistrationService::register(self, name, license_code)
    }
}
