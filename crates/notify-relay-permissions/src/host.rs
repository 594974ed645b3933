//! Host-side stand-ins for the system settings store and screen launcher.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::PermissionError;
use crate::{SecureSettings, SettingsLauncher};

/// Settings store backed by a fixed map.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    values: HashMap<String, String>,
}

impl StaticSettings {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl SecureSettings for StaticSettings {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Placeholder replaced by the action name in command arguments.
pub const ACTION_PLACEHOLDER: &str = "{action}";

/// How long `launch` waits for the opener to report failure.
pub const DEFAULT_LAUNCH_GRACE: Duration = Duration::from_millis(500);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Opens settings screens by running an external command.
///
/// Arguments equal to `{action}` are replaced with the requested action.
/// The opener is never waited on past the grace period: one still running
/// by then counts as opened and is left to run detached.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    program: String,
    args: Vec<String>,
    grace: Duration,
}

impl CommandLauncher {
    pub fn new(command: Vec<String>) -> Result<Self, PermissionError> {
        let mut parts = command.into_iter();
        let program = parts.next().ok_or(PermissionError::EmptyCommand)?;
        if program.trim().is_empty() {
            return Err(PermissionError::EmptyCommand);
        }
        Ok(Self {
            program,
            args: parts.collect(),
            grace: DEFAULT_LAUNCH_GRACE,
        })
    }

    #[must_use]
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn args_for(&self, action: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(ACTION_PLACEHOLDER, action))
            .collect()
    }

    fn locate(&self) -> Option<PathBuf> {
        let program = Path::new(&self.program);
        if program.components().count() > 1 {
            return program.is_file().then(|| program.to_path_buf());
        }
        let path = std::env::var_os("PATH")?;
        std::env::split_paths(&path)
            .map(|dir| dir.join(program))
            .find(|candidate| candidate.is_file())
    }
}

impl SettingsLauncher for CommandLauncher {
    fn resolve(&self, action: &str) -> bool {
        let found = self.locate();
        debug!(program = %self.program, action, found = ?found, "resolved settings launcher");
        found.is_some()
    }

    fn launch(&self, action: &str) -> Result<(), PermissionError> {
        let mut child = Command::new(&self.program)
            .args(self.args_for(action))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()?;

        let deadline = Instant::now() + self.grace;
        loop {
            if let Some(status) = child.try_wait()? {
                return if status.success() {
                    Ok(())
                } else {
                    Err(PermissionError::LaunchFailed(format!(
                        "{} exited with {status}",
                        self.program
                    )))
                };
            }
            if Instant::now() >= deadline {
                debug!(
                    program = %self.program,
                    pid = child.id(),
                    "opener still running, detaching"
                );
                return Ok(());
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}
