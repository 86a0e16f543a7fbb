//! Canonical sites and constants for the camera request scenario
//!
//! Call chain: `MainActivity.onCreate → Helper.askCamera → Activity.requestPermission`

use permtrace_core::MethodSite;

pub const PACKAGE: &str = "com.app";
pub const ENTRY_COMPONENT: &str = "com.app.MainActivity";
pub const CAMERA: &str = "CAMERA";
pub const CAMERA_RESOURCE_ID: u64 = 1234567890;
pub const CAMERA_RATIONALE: &str = "We need your camera to scan documents";

pub fn on_create() -> MethodSite {
    MethodSite::new("com.app.MainActivity", "onCreate", "(Landroid/os/Bundle;)V")
}

pub fn ask_camera() -> MethodSite {
    MethodSite::new("com.app.Helper", "askCamera", "()V")
}

pub fn request_permission() -> MethodSite {
    MethodSite::new("android.app.Activity", "requestPermission", "(Ljava/lang/String;I)V")
}

/// Classifier accepting text that mentions the permission, case-insensitively
pub fn mentions_permission(permission: &str, text: &str) -> bool {
    text.to_lowercase().contains(&permission.to_lowercase())
}

pub fn reject_all(_permission: &str, _text: &str) -> bool {
    false
}
