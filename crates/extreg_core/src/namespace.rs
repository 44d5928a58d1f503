//! XML namespace declarations attached to a document.
//!
//! # Responsibility
//! - Hold the ordered prefix -> (URI, version) declarations of one document.
//! - Offer the insert/remove primitives the registry merges legacy package
//!   namespaces with.
//!
//! # Invariants
//! - Prefixes are unique; `add` replaces an existing prefix in place.
//! - Declaration order is preserved for serialization.

use serde::{Deserialize, Serialize};

/// One namespace declaration triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespaceDeclaration {
    /// Element/attribute prefix; empty for the default namespace.
    pub prefix: String,
    pub uri: String,
    /// Format version the declaration belongs to (e.g. `2` for level 2
    /// annotation encodings).
    pub format_version: u32,
}

impl NamespaceDeclaration {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>, format_version: u32) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
            format_version,
        }
    }
}

/// Ordered namespace container for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceContainer {
    declarations: Vec<NamespaceDeclaration>,
}

impl NamespaceContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a declaration, replacing any declaration bound to the same prefix.
    pub fn add(&mut self, declaration: NamespaceDeclaration) {
        match self
            .declarations
            .iter_mut()
            .find(|existing| existing.prefix == declaration.prefix)
        {
            Some(existing) => *existing = declaration,
            None => self.declarations.push(declaration),
        }
    }

    /// Inserts a declaration unless its URI is already declared.
    ///
    /// Returns `true` when the container changed.
    pub fn add_if_absent(&mut self, declaration: &NamespaceDeclaration) -> bool {
        if self.contains_uri(&declaration.uri) {
            return false;
        }
        self.add(declaration.clone());
        true
    }

    /// Removes every declaration bound to `uri`; returns how many were removed.
    pub fn remove_uri(&mut self, uri: &str) -> usize {
        let before = self.declarations.len();
        self.declarations.retain(|declaration| declaration.uri != uri);
        before - self.declarations.len()
    }

    /// Removes the declaration bound to `prefix`.
    pub fn remove_prefix(&mut self, prefix: &str) -> Option<NamespaceDeclaration> {
        let index = self
            .declarations
            .iter()
            .position(|declaration| declaration.prefix == prefix)?;
        Some(self.declarations.remove(index))
    }

    pub fn contains_uri(&self, uri: &str) -> bool {
        self.declarations
            .iter()
            .any(|declaration| declaration.uri == uri)
    }

    pub fn uri_for_prefix(&self, prefix: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|declaration| declaration.prefix == prefix)
            .map(|declaration| declaration.uri.as_str())
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamespaceDeclaration> {
        self.declarations.iter()
    }
}
