//! Mock launcher for testing.

use std::sync::{Arc, Mutex};

use crate::error::PermissionError;
use crate::SettingsLauncher;

/// Launcher whose resolve/launch results are fixed up front.
///
/// Every successful or failed `launch` call is recorded by action name.
pub struct ScriptedLauncher {
    resolvable: bool,
    failure: Option<String>,
    launches: Arc<Mutex<Vec<String>>>,
}

impl ScriptedLauncher {
    /// Resolves and opens every action.
    pub fn opening() -> Self {
        Self {
            resolvable: true,
            failure: None,
            launches: Arc::default(),
        }
    }

    /// Resolves nothing.
    pub fn unresolvable() -> Self {
        Self {
            resolvable: false,
            ..Self::opening()
        }
    }

    /// Resolves every action but fails to launch with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::opening()
        }
    }

    /// Shared log of attempted launches.
    pub fn launches(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.launches)
    }
}

impl SettingsLauncher for ScriptedLauncher {
    fn resolve(&self, _action: &str) -> bool {
        self.resolvable
    }

    fn launch(&self, action: &str) -> Result<(), PermissionError> {
        self.launches.lock().unwrap().push(action.to_string());
        match &self.failure {
            Some(message) => Err(PermissionError::LaunchFailed(message.clone())),
            None => Ok(()),
        }
    }
}
