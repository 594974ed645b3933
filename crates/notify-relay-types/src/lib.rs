//! Shared types for notify-relay.
//!
//! This crate contains the types shared across the notify-relay workspace:
//! the records delivered to subscribers, the raw notification model handed
//! over by the platform, the codec between the two, component identifiers,
//! and binding identity.

pub mod binding;
pub mod component;
pub mod notification;
pub mod record;

pub use binding::BindingId;
pub use component::{ComponentName, ComponentNameError};
pub use notification::{ExtraValue, Extras, RawNotification, EXTRA_TEXT, EXTRA_TITLE};
pub use record::{EventRecord, Record, TerminalRecord, TerminalStatus};
