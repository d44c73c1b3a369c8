//! "License Changed" notifications over an in-process notification center.

use crate::licensing::config::LICENSE_CHANGED_EVENT;
use crate::licensing::ports::LicenseChangeCallback;
use crate::licensing::types::LicenseInformation;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};

/// A posted event with its attached metadata
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Notification {
    pub name: String,
    pub user_info: Map<String, Value>,
}

/// Handle returned by [`NotificationCenter::add_observer`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverToken(u64);

type Observer = Arc<dyn Fn(&Notification) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_token: u64,
    observers: Vec<(ObserverToken, String, Observer)>,
}

/// Synchronous pub/sub keyed by event name.
///
/// Observers run on the posting thread, in the order they were added.
#[derive(Clone, Default)]
pub struct NotificationCenter {
    registry: Arc<Mutex<Registry>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer<F>(&self, name: &str, observer: F) -> ObserverToken
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let observer: Observer = Arc::new(observer);
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        let token = ObserverToken(registry.next_token);
        registry.next_token += 1;
        registry.observers.push((token, name.to_string(), observer));
        token
    }

    /// Detach an observer; returns whether it was registered
    pub fn remove_observer(&self, token: ObserverToken) -> bool {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        let before = registry.observers.len();
        registry.observers.retain(|(t, _, _)| *t != token);
        registry.observers.len() != before
    }

    pub fn post(&self, name: &str, user_info: Map<String, Value>) {
        // Observers may add or remove observers, so call them unlocked
        let observers: Vec<Observer> = {
            let registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
            registry
                .observers
                .iter()
                .filter(|(_, observed, _)| observed == name)
                .map(|(_, _, observer)| observer.clone())
                .collect()
        };

        let notification = Notification {
            name: name.to_string(),
            user_info,
        };

        for observer in observers {
            observer(&notification);
        }
    }
}

/// Posts license changes to a [`NotificationCenter`]
#[derive(Clone)]
pub struct LicenseChangeBroadcaster {
    notification_center: NotificationCenter,
}

impl LicenseChangeBroadcaster {
    pub fn new(notification_center: NotificationCenter) -> Self {
        Self { notification_center }
    }

    pub fn broadcast(&self, license_information: &LicenseInformation) {
        log::debug!("Broadcasting {}: {:?}", LICENSE_CHANGED_EVENT, license_information);
        self.notification_center
            .post(LICENSE_CHANGED_EVENT, license_information.user_info());
    }

    /// Use the broadcaster as the change callback of a registration service
    pub fn into_callback(self) -> LicenseChangeCallback {
        Box::new(move |info: LicenseInformation| self.broadcast(&info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::licensing::types::License;

    fn recorder(center: &NotificationCenter, name: &str) -> Arc<Mutex<Vec<Notification>>> {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        center.add_observer(name, move |n| sink.lock().unwrap().push(n.clone()));
        received
    }

    #[test]
    fn test_broadcast_posts_license_changed() {
        let center = NotificationCenter::new();
        let received = recorder(&center, LICENSE_CHANGED_EVENT);
        let info = LicenseInformation::Registered(License::new("Jane", "CODE"));

        LicenseChangeBroadcaster::new(center).broadcast(&info);

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].name, "License Changed");
        assert_eq!(received[0].user_info, info.user_info());
    }

    #[test]
    fn test_other_events_are_not_delivered() {
        let center = NotificationCenter::new();
        let received = recorder(&center, "Something Else");

        LicenseChangeBroadcaster::new(center).broadcast(&LicenseInformation::TrialUp);

        assert!(received.lock().unwrap().is_empty());
    }

    #[test]
    fn test_observers_fire_in_registration_order() {
        let center = NotificationCenter::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for id in 0..3 {
            let order = order.clone();
            center.add_observer(LICENSE_CHANGED_EVENT, move |_| order.lock().unwrap().push(id));
        }

        center.post(LICENSE_CHANGED_EVENT, Map::new());
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_remove_observer() {
        let center = NotificationCenter::new();
        let count = Arc::new(Mutex::new(0));
        let counter = count.clone();
        let token = center.add_observer(LICENSE_CHANGED_EVENT, move |_| {
            *counter.lock().unwrap() += 1;
        });

        center.post(LICENSE_CHANGED_EVENT, Map::new());
        assert!(center.remove_observer(token));
        assert!(!center.remove_observer(token));
        center.post(LICENSE_CHANGED_EVENT, Map::new());

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_into_callback() {
        let center = NotificationCenter::new();
        let received = recorder(&center, LICENSE_CHANGED_EVENT);
        let callback = LicenseChangeBroadcaster::new(center).into_callback();

        callback(LicenseInformation::TrialUp);

        let received = received.lock().unwrap();
        assert_eq!(
            LicenseInformation::from_user_info(&received[0].user_info),
            Some(LicenseInformation::TrialUp)
        );
    }
}
