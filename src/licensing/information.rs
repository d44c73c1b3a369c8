use crate::licensing::ports::{ProvidesLicense, ProvidesLicenseInformation, ProvidesTrial};
use crate::licensing::types::LicenseInformation;

/// Derives the current licensing state from the stored license and trial.
///
/// A stored license wins over everything else; without one the app is on
/// trial while a trial period remains, and out of trial otherwise.
#[derive(Debug, Clone)]
pub struct LicenseInformationProvider<L, T> {
    licenses: L,
    trial: T,
}

impl<L, T> LicenseInformationProvider<L, T> {
    pub fn new(licenses: L, trial: T) -> Self {
        Self { licenses, trial }
    }
}

impl<L, T> ProvidesLicenseInformation for LicenseInformationProvider<L, T>
where
    L: ProvidesLicense,
    T: ProvidesTrial,
{
    fn current_license_information(&self) -> LicenseInformation {
        if let Some(license) = self.licenses.current_license() {
            return LicenseInformation::Registered(license);
        }

        match self.trial.current_trial_period() {
            Some(period) => LicenseInformation::OnTrial(period),
            None => LicenseInformation::TrialUp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::licensing::ports::WritesLicense;
    use crate::licensing::storage::LicenseStore;
    use crate::licensing::trial::tests::FixedClock;
    use crate::licensing::trial::TrialProvider;
    use crate::licensing::types::License;
    use chrono::Duration;

    #[test]
    fn test_trial_up_without_license_or_trial() {
        let store = LicenseStore::in_memory();
        let trial = TrialProvider::in_memory(FixedClock::new());
        let provider = LicenseInformationProvider::new(&store, &trial);

        assert_eq!(provider.current_license_information(), LicenseInformation::TrialUp);
    }

    #[test]
    fn test_on_trial_while_trial_remains() {
        let clock = FixedClock::new();
        let store = LicenseStore::in_memory();
        let trial = TrialProvider::in_memory(clock.clone());
        let period = trial.start_trial(30).unwrap();
        let provider = LicenseInformationProvider::new(&store, &trial);

        assert_eq!(
            provider.current_license_information(),
            LicenseInformation::OnTrial(period)
        );

        clock.advance(Duration::days(31));
        assert_eq!(provider.current_license_information(), LicenseInformation::TrialUp);
    }

    #[test]
    fn test_license_wins_over_trial() {
        let store = LicenseStore::in_memory();
        let trial = TrialProvider::in_memory(FixedClock::new());
        trial.start_trial(30).unwrap();
        store.store("CODE", "Jane");

        let provider = LicenseInformationProvider::new(&store, &trial);
        assert_eq!(
            provider.current_license_information(),
            LicenseInformation::Registered(License::new("Jane", "CODE"))
        );
    }
}
