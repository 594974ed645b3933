//! Named method calls over the permission gateway.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::gateway::{AuthorizationOutcome, PermissionGateway};

pub const METHOD_IS_ENABLED: &str = "isNotificationServiceEnabled";
pub const METHOD_REQUEST_SCREEN: &str = "requestNotificationPermissionScreen";

/// No screen on the host can handle the authorization request.
pub const CODE_NO_ACTIVITY: &str = "NO_ACTIVITY_FOUND";
/// The authorization screen was found but could not be opened.
pub const CODE_ERROR_OPENING: &str = "ERROR_OPENING_SETTINGS";

/// An incoming call on the method channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: None,
        }
    }
}

/// Reply to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MethodResponse {
    Success {
        value: Value,
    },
    Error {
        code: String,
        message: String,
        details: Option<String>,
    },
    /// The method name is unknown. Not a failure.
    NotImplemented,
}

impl MethodResponse {
    fn error(code: &str, message: &str, details: Option<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.to_string(),
            details,
        }
    }
}

/// Dispatches method calls by name to the [`PermissionGateway`].
pub struct ControlSurface {
    name: String,
    gateway: PermissionGateway,
}

impl ControlSurface {
    pub fn new(name: impl Into<String>, gateway: PermissionGateway) -> Self {
        Self {
            name: name.into(),
            gateway,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gateway(&self) -> &PermissionGateway {
        &self.gateway
    }

    pub fn handle(&self, call: &MethodCall) -> MethodResponse {
        match call.method.as_str() {
            METHOD_IS_ENABLED => {
                let enabled = self.gateway.is_authorized();
                info!(channel = %self.name, enabled, "notification service check");
                MethodResponse::Success {
                    value: Value::Bool(enabled),
                }
            }
            METHOD_REQUEST_SCREEN => match self.gateway.request_authorization() {
                AuthorizationOutcome::Opened => MethodResponse::Success {
                    value: Value::Bool(true),
                },
                AuthorizationOutcome::NoTarget => MethodResponse::error(
                    CODE_NO_ACTIVITY,
                    "No activity can open the notification listener settings.",
                    None,
                ),
                AuthorizationOutcome::Error { message } => MethodResponse::error(
                    CODE_ERROR_OPENING,
                    "Failed to open settings.",
                    Some(message),
                ),
            },
            other => {
                warn!(channel = %self.name, method = other, "method not implemented");
                MethodResponse::NotImplemented
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::host::StaticSettings;
    use crate::mock::ScriptedLauncher;
    use crate::ENABLED_NOTIFICATION_LISTENERS;

    fn surface(list: &str, launcher: ScriptedLauncher) -> ControlSurface {
        let settings = StaticSettings::new().with(ENABLED_NOTIFICATION_LISTENERS, list);
        let gateway = PermissionGateway::new(
            "pkg/pkg.Listener".parse().unwrap(),
            Arc::new(settings),
            Arc::new(launcher),
        );
        ControlSurface::new("test/methods", gateway)
    }

    #[test]
    fn is_enabled_reports_authorization() {
        let yes = surface("pkg/.Listener", ScriptedLauncher::opening());
        assert_eq!(
            yes.handle(&MethodCall::new(METHOD_IS_ENABLED)),
            MethodResponse::Success { value: json!(true) }
        );

        let no = surface("other/.Listener", ScriptedLauncher::opening());
        assert_eq!(
            no.handle(&MethodCall::new(METHOD_IS_ENABLED)),
            MethodResponse::Success { value: json!(false) }
        );
    }

    #[test]
    fn request_screen_success() {
        let surface = surface("", ScriptedLauncher::opening());
        assert_eq!(
            surface.handle(&MethodCall::new(METHOD_REQUEST_SCREEN)),
            MethodResponse::Success { value: json!(true) }
        );
    }

    #[test]
    fn request_screen_without_activity() {
        let surface = surface("", ScriptedLauncher::unresolvable());
        match surface.handle(&MethodCall::new(METHOD_REQUEST_SCREEN)) {
            MethodResponse::Error { code, details, .. } => {
                assert_eq!(code, CODE_NO_ACTIVITY);
                assert_eq!(details, None);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn request_screen_launch_error() {
        let surface = surface("", ScriptedLauncher::failing("boom"));
        match surface.handle(&MethodCall::new(METHOD_REQUEST_SCREEN)) {
            MethodResponse::Error {
                code,
                message,
                details,
            } => {
                assert_eq!(code, CODE_ERROR_OPENING);
                assert_eq!(message, "Failed to open settings.");
                assert!(details.unwrap().contains("boom"));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn unknown_method_is_not_implemented() {
        let surface = surface("", ScriptedLauncher::opening());
        assert_eq!(
            surface.handle(&MethodCall::new("getPlatformVersion")),
            MethodResponse::NotImplemented
        );
    }

    #[test]
    fn call_parses_without_arguments() {
        let call: MethodCall =
            serde_json::from_str(r#"{"method":"isNotificationServiceEnabled"}"#).unwrap();
        assert_eq!(call, MethodCall::new(METHOD_IS_ENABLED));
    }

    #[test]
    fn response_wire_shape() {
        let ok = serde_json::to_value(MethodResponse::Success { value: json!(true) }).unwrap();
        assert_eq!(ok, json!({"result": "success", "value": true}));

        let err = serde_json::to_value(MethodResponse::error(CODE_NO_ACTIVITY, "m", None)).unwrap();
        assert_eq!(
            err,
            json!({"result": "error", "code": "NO_ACTIVITY_FOUND", "message": "m", "details": null})
        );

        let missing = serde_json::to_value(MethodResponse::NotImplemented).unwrap();
        assert_eq!(missing, json!({"result": "not_implemented"}));
    }
}
