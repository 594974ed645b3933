//! Config loading and wiring of the shared registry.

use std::path::PathBuf;
use std::sync::Arc;

use notify_relay_channel::{EventChannel, SubscriberRegistry};
use tracing::info;

use crate::config::Config;
use crate::error::ListenerError;
use crate::service::ListenerService;

/// Load configuration from the given path, or the default location.
pub fn load_config(path: Option<&str>) -> Result<Config, ListenerError> {
    let config_path = resolve_config_path(path);

    let config = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| ListenerError::Config(format!("failed to read config: {e}")))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ListenerError::Config(format!("failed to parse config: {e}")))?;
        info!(path = %config_path.display(), "loaded config");
        config
    } else if path.is_some() {
        return Err(ListenerError::Config(format!(
            "config file not found: {}",
            config_path.display()
        )));
    } else {
        info!("no config file found, using defaults");
        Config::default()
    };

    config.listener.component()?;
    Ok(config)
}

/// The file `load_config` reads for the given path argument.
pub fn resolve_config_path(path: Option<&str>) -> PathBuf {
    path.map_or_else(default_config_path, PathBuf::from)
}

/// Get the default config directory path.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("notify-relay")
}

/// Get the default config file path.
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// The listener side and the consumer side, sharing one registry.
pub struct Bridge {
    pub registry: Arc<SubscriberRegistry>,
    pub channel: EventChannel,
    pub service: ListenerService,
}

/// Build a service and an event channel over a fresh shared registry.
pub fn build_bridge(config: &Config) -> Bridge {
    let registry = Arc::new(SubscriberRegistry::new());
    let channel = EventChannel::new(config.channels.event.clone(), Arc::clone(&registry));
    let service = ListenerService::new(Arc::clone(&registry));
    Bridge {
        registry,
        channel,
        service,
    }
}
