//! Tauri integration: managed licensing state, webview events and commands.

use crate::licensing::config::{
    LicensingConfig, DESKTOP_INVALID_LICENSE_EVENT, DESKTOP_LICENSE_CHANGED_EVENT,
};
use crate::licensing::manager::AppLicensing;
use crate::licensing::types::{LicenseError, LicenseInformation, LicenseSummary};
use serde::Serialize;
use tauri::{AppHandle, Emitter, Manager, Runtime, State};

pub type DesktopVerifier = Box<dyn Fn(&str, &str) -> bool + Send + Sync>;
pub type DesktopLicensing = AppLicensing<DesktopVerifier>;

/// Payload of the invalid license event
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InvalidLicensePayload {
    pub name: String,
    pub license_code: String,
}

/// Set up licensing and hand it to Tauri's state manager.
///
/// License changes are emitted to the webview as `license-changed` with the
/// user info projection as payload.
pub fn manage<R, V>(
    app: &AppHandle<R>,
    config: LicensingConfig,
    verifier: V,
) -> Result<(), LicenseError>
where
    R: Runtime,
    V: Fn(&str, &str) -> bool + Send + Sync + 'static,
{
    let changes = app.clone();
    let rejections = app.clone();

    let licensing = AppLicensing::set_up(
        config,
        Box::new(verifier) as DesktopVerifier,
        move |info: LicenseInformation| {
            if let Err(e) = changes.emit(DESKTOP_LICENSE_CHANGED_EVENT, info.user_info()) {
                log::warn!("Could not emit license change: {}", e);
            }
        },
        move |name: &str, license_code: &str| {
            let payload = InvalidLicensePayload {
                name: name.to_string(),
                license_code: license_code.to_string(),
            };
            if let Err(e) = rejections.emit(DESKTOP_INVALID_LICENSE_EVENT, payload) {
                log::warn!("Could not emit invalid license: {}", e);
            }
        },
    )?;

    app.manage(licensing);
    Ok(())
}

/// Tauri commands for license management
pub mod commands {
    use super::*;

    /// Current licensing state plus trial days for the UI
    #[tauri::command]
    pub fn get_license_information(licensing: State<'_, DesktopLicensing>) -> LicenseSummary {
        licensing.summary()
    }

    /// Report the current state as a `license-changed` event
    #[tauri::command]
    pub fn start_licensing(licensing: State<'_, DesktopLicensing>) {
        licensing.start_up();
    }

    /// Outcome arrives as a `license-changed` or `invalid-license` event
    #[tauri::command]
    pub fn register_license(
        name: String,
        license_code: String,
        licensing: State<'_, DesktopLicensing>,
    ) {
        licensing.register(name.trim(), license_code.trim());
    }

    #[tauri::command]
    pub fn unregister_license(licensing: State<'_, DesktopLicensing>) {
        licensing.unregister();
    }
}
