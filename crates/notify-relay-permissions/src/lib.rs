//! Listener authorization for notify-relay.
//!
//! Defines the [`SecureSettings`] and [`SettingsLauncher`] traits that stand
//! in for the host's system settings, the [`PermissionGateway`] built on top
//! of them, and the [`ControlSurface`] that exposes the gateway as named
//! method calls.

pub mod control;
pub mod error;
pub mod gateway;
pub mod host;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use control::{ControlSurface, MethodCall, MethodResponse};
pub use error::PermissionError;
pub use gateway::{AuthorizationOutcome, PermissionGateway};
pub use host::{CommandLauncher, StaticSettings};

/// System setting holding the colon-delimited authorized listener list.
pub const ENABLED_NOTIFICATION_LISTENERS: &str = "enabled_notification_listeners";

/// Action resolved to find the listener authorization screen.
pub const ACTION_NOTIFICATION_LISTENER_SETTINGS: &str =
    "android.settings.ACTION_NOTIFICATION_LISTENER_SETTINGS";

/// Read-only view of the host's secure settings store.
pub trait SecureSettings: Send + Sync {
    /// Current value for `key`, read live on every call.
    fn get_string(&self, key: &str) -> Option<String>;
}

/// Opens system screens by action name.
pub trait SettingsLauncher: Send + Sync {
    /// Whether anything on the host can handle `action`.
    fn resolve(&self, action: &str) -> bool;

    /// Open the screen for `action`.
    fn launch(&self, action: &str) -> Result<(), PermissionError>;
}
