//! Package extension descriptor declaration and validation.

use crate::extension::point::ExtensionPoint;
use crate::extension::uri::{is_valid_uri_key, PackageUri};
use crate::namespace::NamespaceDeclaration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Declarative description of one registrable package.
///
/// Descriptors are immutable once registered; the registry only hands out
/// clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDescriptor {
    /// Package short name (e.g. `layout`) or package URI. Primary identity.
    pub name: String,
    /// Package URIs that resolve to this descriptor, in preference order.
    #[serde(default)]
    pub uris: Vec<String>,
    /// Host element kinds this package attaches to.
    pub extension_points: Vec<ExtensionPoint>,
    /// Namespaces contributed under the legacy annotation encoding.
    #[serde(default)]
    pub l2_namespaces: Vec<NamespaceDeclaration>,
}

impl ExtensionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uris: vec![],
            extension_points: vec![],
            l2_namespaces: vec![],
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uris.push(uri.into());
        self
    }

    pub fn with_extension_point(mut self, point: ExtensionPoint) -> Self {
        self.extension_points.push(point);
        self
    }

    pub fn with_l2_namespace(mut self, declaration: NamespaceDeclaration) -> Self {
        self.l2_namespaces.push(declaration);
        self
    }

    /// Whether the package can round-trip through legacy annotations.
    pub fn supports_l2(&self) -> bool {
        !self.l2_namespaces.is_empty()
    }

    pub fn has_extension_point(&self, point: &ExtensionPoint) -> bool {
        self.extension_points.contains(point)
    }

    /// Every string this descriptor can be looked up by: name, then URIs.
    pub fn lookup_keys(&self) -> impl Iterator<Item = &str> + Clone {
        std::iter::once(self.name.as_str()).chain(self.uris.iter().map(String::as_str))
    }

    /// Validates declaration-level invariants.
    pub fn validate(&self) -> Result<(), DescriptorValidationError> {
        if self.name.trim().is_empty() {
            return Err(DescriptorValidationError::EmptyName);
        }

        if self.extension_points.is_empty() {
            return Err(DescriptorValidationError::MissingExtensionPoints);
        }
        let mut points = BTreeSet::new();
        for point in &self.extension_points {
            if !points.insert(point) {
                return Err(DescriptorValidationError::DuplicateExtensionPoint(
                    point.to_string(),
                ));
            }
        }

        let package = self.package_name();
        let mut uris = BTreeSet::new();
        for uri in &self.uris {
            if !is_valid_uri_key(uri) {
                return Err(DescriptorValidationError::InvalidUri(uri.clone()));
            }
            if let Some(parsed) = PackageUri::parse(uri) {
                if parsed.package != package {
                    return Err(DescriptorValidationError::MismatchedPackageUri {
                        name: self.name.clone(),
                        uri: uri.clone(),
                    });
                }
            }
            if !uris.insert(uri.as_str()) {
                return Err(DescriptorValidationError::DuplicateUri(uri.clone()));
            }
        }

        let mut l2_uris = BTreeSet::new();
        for declaration in &self.l2_namespaces {
            if !is_valid_uri_key(&declaration.uri) {
                return Err(DescriptorValidationError::InvalidNamespace(
                    declaration.uri.clone(),
                ));
            }
            if !l2_uris.insert(declaration.uri.as_str()) {
                return Err(DescriptorValidationError::DuplicateNamespace(
                    declaration.uri.clone(),
                ));
            }
        }
        Ok(())
    }

    /// Short package name; for URI-form identities this is the URI's
    /// package segment.
    pub fn package_name(&self) -> String {
        match PackageUri::parse(&self.name) {
            Some(parsed) => parsed.package,
            None => self.name.clone(),
        }
    }

    /// Content equality used for duplicate registration checks.
    pub(crate) fn same_content(&self, other: &Self) -> bool {
        self.name == other.name
            && self.uris == other.uris
            && self.extension_points == other.extension_points
            && self.l2_namespaces == other.l2_namespaces
    }
}

/// Descriptor validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorValidationError {
    EmptyName,
    MissingExtensionPoints,
    DuplicateExtensionPoint(String),
    InvalidUri(String),
    DuplicateUri(String),
    MismatchedPackageUri { name: String, uri: String },
    InvalidNamespace(String),
    DuplicateNamespace(String),
}

impl Display for DescriptorValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "package name must not be empty"),
            Self::MissingExtensionPoints => {
                write!(f, "package must declare at least one extension point")
            }
            Self::DuplicateExtensionPoint(value) => {
                write!(f, "package extension point is duplicated: {value}")
            }
            Self::InvalidUri(value) => write!(f, "package uri is invalid: `{value}`"),
            Self::DuplicateUri(value) => write!(f, "package uri is duplicated: {value}"),
            Self::MismatchedPackageUri { name, uri } => {
                write!(f, "package uri {uri} does not belong to package {name}")
            }
            Self::InvalidNamespace(value) => {
                write!(f, "legacy namespace uri is invalid: `{value}`")
            }
            Self::DuplicateNamespace(value) => {
                write!(f, "legacy namespace uri is duplicated: {value}")
            }
        }
    }
}

impl Error for DescriptorValidationError {}
