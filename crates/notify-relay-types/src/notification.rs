//! Raw platform notifications and the codec that reduces them to records.
//!
//! The host hands the listener a notification with a package name, a post
//! time and an optional extras bundle of loosely typed values. Only the title
//! and body are read out of the bundle, and both degrade to `None` instead of
//! failing when they are missing or hold an unexpected type.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::record::EventRecord;

/// Extras key holding the notification title.
pub const EXTRA_TITLE: &str = "android.title";

/// Extras key holding the notification body.
pub const EXTRA_TEXT: &str = "android.text";

/// A single value stored in the extras bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraValue {
    Bool(bool),
    Long(i64),
    Double(f64),
    String(String),
    /// Styled text; only its plain-text content is kept.
    CharSequence { text: String },
    StringArray(Vec<String>),
    Null,
    /// Any shape the codec does not read.
    Other(Value),
}

impl ExtraValue {
    /// The value as a plain string, with no coercion.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a char sequence: plain strings and styled text both
    /// qualify.
    #[must_use]
    pub fn as_char_sequence(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::CharSequence { text: s } => Some(s),
            _ => None,
        }
    }
}

/// Loosely typed key/value bundle attached to a notification.
pub type Extras = BTreeMap<String, ExtraValue>;

/// A notification as posted by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNotification {
    pub package_name: String,
    /// Milliseconds since the epoch.
    pub post_time: i64,
    /// A bundle that is not a key/value map is treated as absent.
    #[serde(default, deserialize_with = "lenient_extras")]
    pub extras: Option<Extras>,
}

impl RawNotification {
    #[must_use]
    pub fn new(package_name: impl Into<String>, post_time: i64) -> Self {
        Self {
            package_name: package_name.into(),
            post_time,
            extras: None,
        }
    }

    /// Add an extras entry, creating the bundle if needed.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: ExtraValue) -> Self {
        self.extras
            .get_or_insert_with(Extras::new)
            .insert(key.into(), value);
        self
    }

    /// Title from the extras bundle. Only a plain string counts.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.extra(EXTRA_TITLE).and_then(ExtraValue::as_string)
    }

    /// Body text from the extras bundle. Styled text is flattened.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.extra(EXTRA_TEXT).and_then(ExtraValue::as_char_sequence)
    }

    fn extra(&self, key: &str) -> Option<&ExtraValue> {
        self.extras.as_ref()?.get(key)
    }
}

fn lenient_extras<'de, D>(deserializer: D) -> Result<Option<Extras>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

impl From<&RawNotification> for EventRecord {
    fn from(raw: &RawNotification) -> Self {
        EventRecord::new(
            raw.package_name.clone(),
            raw.title().map(str::to_owned),
            raw.text().map(str::to_owned),
            raw.post_time,
        )
    }
}
