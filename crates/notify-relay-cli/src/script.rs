//! JSON-lines scripts of host events.

use anyhow::Context;
use notify_relay_listener::LifecycleEvent;
use notify_relay_types::RawNotification;
use serde::Deserialize;

/// One line of a replay script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    ListenerConnected,
    NotificationPosted {
        #[serde(default)]
        notification: Option<RawNotification>,
    },
    NotificationRemoved {
        #[serde(default)]
        notification: Option<RawNotification>,
    },
    ListenerDisconnected,
    /// The consumer subscribes to the event channel.
    StartListening,
    /// The consumer cancels its subscription.
    StopListening,
}

impl HostEvent {
    /// The listener callback this event stands for, if it is one.
    pub fn into_lifecycle(self) -> Option<LifecycleEvent> {
        match self {
            Self::ListenerConnected => Some(LifecycleEvent::ListenerConnected),
            Self::NotificationPosted { notification } => {
                Some(LifecycleEvent::NotificationPosted(notification))
            }
            Self::NotificationRemoved { notification } => {
                Some(LifecycleEvent::NotificationRemoved(notification))
            }
            Self::ListenerDisconnected => Some(LifecycleEvent::ListenerDisconnected),
            Self::StartListening | Self::StopListening => None,
        }
    }
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> anyhow::Result<Option<HostEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let event = serde_json::from_str(line).with_context(|| format!("invalid host event: {line}"))?;
    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use notify_relay_types::{ExtraValue, EXTRA_TITLE};

    use super::*;

    #[test]
    fn parses_posted_notification() {
        let line = r#"{"event":"notification_posted","notification":"#.to_string()
            + r#"{"packageName":"com.a","postTime":5,"extras":{"android.title":"T"}}}"#;
        let event = parse_line(&line).unwrap().unwrap();
        assert_eq!(
            event,
            HostEvent::NotificationPosted {
                notification: Some(
                    RawNotification::new("com.a", 5)
                        .with_extra(EXTRA_TITLE, ExtraValue::String("T".into()))
                ),
            }
        );
    }

    #[test]
    fn missing_notification_is_none() {
        let event = parse_line(r#"{"event":"notification_removed"}"#).unwrap().unwrap();
        assert_eq!(event, HostEvent::NotificationRemoved { notification: None });
        assert_eq!(
            event.into_lifecycle(),
            Some(LifecycleEvent::NotificationRemoved(None))
        );
    }

    #[test]
    fn consumer_events_are_not_lifecycle() {
        let start = parse_line(r#"{"event":"start_listening"}"#).unwrap().unwrap();
        assert_eq!(start, HostEvent::StartListening);
        assert_eq!(start.into_lifecycle(), None);
        assert_eq!(HostEvent::StopListening.into_lifecycle(), None);
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# connect first").unwrap(), None);
    }

    #[test]
    fn unknown_event_is_an_error() {
        assert!(parse_line(r#"{"event":"reboot"}"#).is_err());
        assert!(parse_line("not json").is_err());
    }
}
