// Licensing system module
// Registration, trial tracking and license change notification

pub mod types;
pub mod config;
pub mod ports;
pub mod storage;
pub mod trial;
pub mod information;
pub mod registration;
pub mod broadcast;
pub mod manager;
#[cfg(feature = "desktop")]
pub mod desktop;

pub use types::*;
pub use config::*;
pub use ports::*;
pub use storage::LicenseStore;
pub use trial::TrialProvider;
pub use information::LicenseInformationProvider;
pub use registration::RegistrationService;
pub use broadcast::{LicenseChangeBroadcaster, Notification, NotificationCenter, ObserverToken};
pub use manager::AppLicensing;
