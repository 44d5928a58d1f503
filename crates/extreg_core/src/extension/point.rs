//! Extension point markers.
//!
//! An extension point names the host element kind in the base document model
//! that a package attaches its content to (e.g. `model`, `layout`).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Host element kind an extension attaches to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExtensionPoint(String);

impl ExtensionPoint {
    /// Builds an extension point from a trimmed, non-empty element kind.
    pub fn new(element_kind: &str) -> Result<Self, ExtensionPointError> {
        let normalized = element_kind.trim();
        if normalized.is_empty() {
            return Err(ExtensionPointError::EmptyElementKind);
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(ExtensionPointError::InvalidElementKind(
                normalized.to_string(),
            ));
        }
        Ok(Self(normalized.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ExtensionPoint {
    type Error = ExtensionPointError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ExtensionPoint> for String {
    fn from(value: ExtensionPoint) -> Self {
        value.0
    }
}

impl Display for ExtensionPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Element kind of the document root container.
pub const POINT_DOCUMENT: &str = "document";
/// Element kind of the model element.
pub const POINT_MODEL: &str = "model";
/// Element kind contributed by the layout package.
pub const POINT_LAYOUT: &str = "layout";

/// Extension point parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionPointError {
    EmptyElementKind,
    InvalidElementKind(String),
}

impl Display for ExtensionPointError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyElementKind => write!(f, "extension point element kind must not be empty"),
            Self::InvalidElementKind(value) => {
                write!(f, "extension point element kind is invalid: {value}")
            }
        }
    }
}

impl Error for ExtensionPointError {}
