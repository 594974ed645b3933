//! Configuration loaded from TOML.

use notify_relay_types::{ComponentName, ComponentNameError};
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub listener: ListenerConfig,
    #[serde(default)]
    pub channels: ChannelsConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// Process-wide runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Identity of the listener component the host must authorize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerConfig {
    #[serde(default = "default_package")]
    pub package: String,
    /// Fully-qualified class, or `.Name` relative to `package`.
    #[serde(default = "default_service_class")]
    pub service_class: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            package: default_package(),
            service_class: default_service_class(),
        }
    }
}

impl ListenerConfig {
    /// The listener's component name in normalized form.
    pub fn component(&self) -> Result<ComponentName, ComponentNameError> {
        format!("{}/{}", self.package, self.service_class).parse()
    }
}

/// Names of the two channels exposed to the consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelsConfig {
    #[serde(default = "default_event_channel")]
    pub event: String,
    #[serde(default = "default_method_channel")]
    pub method: String,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            event: default_event_channel(),
            method: default_method_channel(),
        }
    }
}

/// Host-side stand-ins for the system settings the permission gateway reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Colon-delimited authorized listener list. Absent means the host has
    /// never written the setting.
    #[serde(default)]
    pub enabled_listeners: Option<String>,
    /// Program and arguments that open the authorization screen.
    #[serde(default = "default_open_command")]
    pub open_command: Vec<String>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            enabled_listeners: None,
            open_command: default_open_command(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_package() -> String {
    "dev.gab.tcc.tcc_3".to_string()
}

fn default_service_class() -> String {
    "dev.gab.tcc.tcc_3.NotificationListener".to_string()
}

fn default_event_channel() -> String {
    "jove_notification_event_channel".to_string()
}

fn default_method_channel() -> String {
    "dev.gab.tcc/notifications_utils".to_string()
}

fn default_open_command() -> Vec<String> {
    vec![
        "am".to_string(),
        "start".to_string(),
        "-a".to_string(),
        "android.settings.ACTION_NOTIFICATION_LISTENER_SETTINGS".to_string(),
    ]
}
