//! Component identifiers in `package/class` form.
//!
//! The host stores the authorized listeners as flattened component names.
//! Parsing follows the host's rules: the package and class are split on the
//! first `/`, the class must be non-empty, and a class starting with `.` is
//! shorthand for a class inside the package.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a string is not a component name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentNameError {
    #[error("missing '/' separator in component name {0:?}")]
    MissingSeparator(String),

    #[error("empty class in component name {0:?}")]
    EmptyClass(String),
}

/// A fully-qualified component identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentName {
    package: String,
    class: String,
}

impl ComponentName {
    /// Build a component name, expanding a leading-dot class.
    #[must_use]
    pub fn new(package: impl Into<String>, class: impl Into<String>) -> Self {
        let package = package.into();
        let class = class.into();
        let class = if class.starts_with('.') {
            format!("{package}{class}")
        } else {
            class
        };
        Self { package, class }
    }

    /// Parse a flattened `package/class` string, returning `None` when it is
    /// not a valid component name.
    #[must_use]
    pub fn unflatten(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// The canonical `package/class` form.
    #[must_use]
    pub fn flatten(&self) -> String {
        format!("{}/{}", self.package, self.class)
    }
}

impl FromStr for ComponentName {
    type Err = ComponentNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (package, class) = s
            .split_once('/')
            .ok_or_else(|| ComponentNameError::MissingSeparator(s.to_string()))?;
        if class.is_empty() {
            return Err(ComponentNameError::EmptyClass(s.to_string()));
        }
        Ok(Self::new(package, class))
    }
}

impl TryFrom<String> for ComponentName {
    type Error = ComponentNameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ComponentName> for String {
    fn from(name: ComponentName) -> Self {
        name.flatten()
    }
}

impl std::fmt::Display for ComponentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.package, self.class)
    }
}
