//! Authorization state of the listener and the way to request it.

use std::sync::Arc;

use notify_relay_types::ComponentName;
use tracing::{debug, error, info, warn};

use crate::{
    SecureSettings, SettingsLauncher, ACTION_NOTIFICATION_LISTENER_SETTINGS,
    ENABLED_NOTIFICATION_LISTENERS,
};

/// Result of asking the host to show the authorization screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    /// A screen was found and opened.
    Opened,
    /// Nothing on the host can show the screen.
    NoTarget,
    /// Opening the screen failed.
    Error { message: String },
}

/// Answers whether the listener is authorized and asks the host to
/// authorize it.
///
/// Nothing is cached: every query reads the settings store again.
pub struct PermissionGateway {
    component: ComponentName,
    settings: Arc<dyn SecureSettings>,
    launcher: Arc<dyn SettingsLauncher>,
}

impl PermissionGateway {
    pub fn new(
        component: ComponentName,
        settings: Arc<dyn SecureSettings>,
        launcher: Arc<dyn SettingsLauncher>,
    ) -> Self {
        Self {
            component,
            settings,
            launcher,
        }
    }

    /// The component this gateway checks for.
    pub fn component(&self) -> &ComponentName {
        &self.component
    }

    /// Whether the listener appears in the host's authorized list.
    pub fn is_authorized(&self) -> bool {
        let Some(list) = self.settings.get_string(ENABLED_NOTIFICATION_LISTENERS) else {
            debug!("authorized listener list not set");
            return false;
        };
        let authorized = is_listed(&list, &self.component);
        debug!(component = %self.component, authorized, "checked listener authorization");
        authorized
    }

    /// Ask the host to open the listener authorization screen.
    pub fn request_authorization(&self) -> AuthorizationOutcome {
        let action = ACTION_NOTIFICATION_LISTENER_SETTINGS;
        if !self.launcher.resolve(action) {
            warn!(action, "no screen can handle the authorization request");
            return AuthorizationOutcome::NoTarget;
        }
        match self.launcher.launch(action) {
            Ok(()) => {
                info!(action, "authorization screen opened");
                AuthorizationOutcome::Opened
            }
            Err(e) => {
                error!(action, error = %e, "failed to open authorization screen");
                AuthorizationOutcome::Error {
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Whether `component` is an element of the colon-delimited `list`.
///
/// Elements that are not valid component names, including the empty
/// element left by a trailing `:`, never match.
pub fn is_listed(list: &str, component: &ComponentName) -> bool {
    list.split(':')
        .filter_map(ComponentName::unflatten)
        .any(|name| &name == component)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StaticSettings;
    use crate::mock::ScriptedLauncher;

    fn target() -> ComponentName {
        "pkg/ServiceB".parse().unwrap()
    }

    fn gateway(list: Option<&str>, launcher: ScriptedLauncher) -> PermissionGateway {
        let mut settings = StaticSettings::new();
        if let Some(list) = list {
            settings = settings.with(ENABLED_NOTIFICATION_LISTENERS, list);
        }
        PermissionGateway::new(target(), Arc::new(settings), Arc::new(launcher))
    }

    #[test]
    fn listed_component_is_authorized() {
        assert!(is_listed("pkg/ServiceA:pkg/ServiceB", &target()));
        assert!(is_listed("pkg/ServiceB", &target()));
    }

    #[test]
    fn empty_list_is_not_authorized() {
        assert!(!is_listed("", &target()));
    }

    #[test]
    fn trailing_empty_element_is_harmless() {
        assert!(is_listed("pkg/ServiceB:", &target()));
        assert!(!is_listed(":", &target()));
    }

    #[test]
    fn relative_class_in_list_is_normalized() {
        let component: ComponentName = "pkg/pkg.Listener".parse().unwrap();
        assert!(is_listed("other/.X:pkg/.Listener", &component));
    }

    #[test]
    fn match_is_exact() {
        assert!(!is_listed("pkg/serviceb", &target()));
        assert!(!is_listed("pkg/ServiceB :pkg/ServiceBB", &target()));
        assert!(!is_listed("xpkg/ServiceB", &target()));
    }

    #[test]
    fn gateway_reads_settings() {
        assert!(gateway(Some("pkg/ServiceB"), ScriptedLauncher::opening()).is_authorized());
        assert!(!gateway(Some(""), ScriptedLauncher::opening()).is_authorized());
        assert!(!gateway(None, ScriptedLauncher::opening()).is_authorized());
    }

    #[test]
    fn request_opens_screen() {
        let launcher = ScriptedLauncher::opening();
        let launches = launcher.launches();
        let gateway = gateway(None, launcher);
        assert_eq!(gateway.request_authorization(), AuthorizationOutcome::Opened);
        assert_eq!(
            launches.lock().unwrap().as_slice(),
            [ACTION_NOTIFICATION_LISTENER_SETTINGS.to_string()]
        );
    }

    #[test]
    fn request_without_target() {
        let launcher = ScriptedLauncher::unresolvable();
        let launches = launcher.launches();
        let gateway = gateway(None, launcher);
        assert_eq!(gateway.request_authorization(), AuthorizationOutcome::NoTarget);
        assert!(launches.lock().unwrap().is_empty());
    }

    #[test]
    fn request_launch_failure_carries_message() {
        let gateway = gateway(None, ScriptedLauncher::failing("activity crashed"));
        match gateway.request_authorization() {
            AuthorizationOutcome::Error { message } => {
                assert!(message.contains("activity crashed"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
