use crate::licensing::config::LicensingConfig;
use crate::licensing::information::LicenseInformationProvider;
use crate::licensing::ports::{
    Clock, HandlesRegistering, LicenseVerifier, ProvidesLicenseInformation, ProvidesTrial,
    SystemClock,
};
use crate::licensing::registration::RegistrationService;
use crate::licensing::storage::LicenseStore;
use crate::licensing::trial::TrialProvider;
use crate::licensing::types::{LicenseError, LicenseInformation, LicenseSummary};
use std::sync::Arc;

type Information<C> = LicenseInformationProvider<Arc<LicenseStore>, Arc<TrialProvider<C>>>;
type Registration<V, C> =
    RegistrationService<V, Arc<LicenseStore>, Information<C>, Arc<TrialProvider<C>>>;

/// Licensing for one application: storage, trial and registration wired together
pub struct AppLicensing<V, C = SystemClock> {
    store: Arc<LicenseStore>,
    trial: Arc<TrialProvider<C>>,
    information: Information<C>,
    registration: Registration<V, C>,
    change_callback: Arc<dyn Fn(LicenseInformation) + Send + Sync>,
}

impl<V: LicenseVerifier> AppLicensing<V, SystemClock> {
    /// Open licensing data in the platform data dir and start the trial on
    /// first launch
    pub fn set_up<F, G>(
        config: LicensingConfig,
        verifier: V,
        on_change: F,
        on_invalid_license: G,
    ) -> Result<Self, LicenseError>
    where
        F: Fn(LicenseInformation) + Send + Sync + 'static,
        G: Fn(&str, &str) + Send + Sync + 'static,
    {
        config.validate()?;

        let dir = config.data_dir()?;
        let store = LicenseStore::open(dir.join(&config.license_file))?;
        let trial = TrialProvider::open(dir.join(&config.trial_file))?;

        Self::with_components(config, store, trial, verifier, on_change, on_invalid_license)
    }
}

impl<V: LicenseVerifier, C: Clock> AppLicensing<V, C> {
    pub fn with_components<F, G>(
        config: LicensingConfig,
        store: LicenseStore,
        trial: TrialProvider<C>,
        verifier: V,
        on_change: F,
        on_invalid_license: G,
    ) -> Result<Self, LicenseError>
    where
        F: Fn(LicenseInformation) + Send + Sync + 'static,
        G: Fn(&str, &str) + Send + Sync + 'static,
    {
        config.validate()?;
        trial.start_trial(config.trial_days)?;

        let store = Arc::new(store);
        let trial = Arc::new(trial);
        let change_callback: Arc<dyn Fn(LicenseInformation) + Send + Sync> = Arc::new(on_change);

        let registration = RegistrationService::new(
            verifier,
            store.clone(),
            LicenseInformationProvider::new(store.clone(), trial.clone()),
            trial.clone(),
            {
                let change_callback = change_callback.clone();
                Box::new(move |info: LicenseInformation| change_callback(info))
            },
            Box::new(on_invalid_license),
        );

        Ok(Self {
            information: LicenseInformationProvider::new(store.clone(), trial.clone()),
            store,
            trial,
            registration,
            change_callback,
        })
    }

    /// Report the current state to the change callback once, e.g. after
    /// the UI is ready
    pub fn start_up(&self) {
        let current = self.current_license_information();
        log::info!("Licensing started: {:?}", current);
        (self.change_callback)(current);
    }

    pub fn current_license_information(&self) -> LicenseInformation {
        self.information.current_license_information()
    }

    pub fn register(&self, name: &str, license_code: &str) {
        self.registration.register(name, license_code)
    }

    pub fn unregister(&self) {
        self.registration.unregister()
    }

    /// Days left in the trial, `None` once registered
    pub fn trial_days_left(&self) -> Option<i64> {
        if self.store.load().is_some() {
            return None;
        }

        self.trial.days_left()
    }

    /// Whether the app may be used: registered or trial remaining
    pub fn can_use_app(&self) -> bool {
        self.store.load().is_some() || self.trial.current_trial_period().is_some()
    }

    pub fn summary(&self) -> LicenseSummary {
        LicenseSummary {
            information: self.current_license_information(),
            trial_days_remaining: self.trial_days_left(),
            can_use_app: self.can_use_app(),
        }
    }
}

impl<V: LicenseVerifier, C: Clock> HandlesRegistering for AppLicensing<V, C> {
    fn register(&self, name: &str, license_code: &str) {
        AppLicensing::register(self, name, license_code)
    }
}
