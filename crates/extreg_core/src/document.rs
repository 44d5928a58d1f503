//! Document-side plugin contracts consumed by the registry.
//!
//! # Responsibility
//! - Describe what the registry needs from a document: its active packages,
//!   their plugin payloads, and its namespace container.
//! - Provide `MemoryDocument`, a minimal in-memory implementation.
//!
//! # Invariants
//! - Per-document activation state is owned by the document, never by the
//!   registry.
//! - Activation only applies to packages that have a plugin on the document.

use crate::namespace::NamespaceContainer;
use std::collections::BTreeMap;

/// Package-specific payload attached to one document.
pub trait DocumentPlugin {
    fn package_name(&self) -> &str;
    /// Whether the plugin carries any content the writer would emit.
    fn has_content(&self) -> bool;
}

/// Document surface used by the registry's document-scoped operations.
pub trait PluginDocument {
    /// Names of packages currently active on this document.
    fn active_packages(&self) -> Vec<String>;
    fn plugin(&self, package: &str) -> Option<&dyn DocumentPlugin>;
    /// Returns `false` when the document has no plugin for `package`.
    fn activate_package(&mut self, package: &str) -> bool;
    /// Returns `false` when the document has no plugin for `package`.
    fn deactivate_package(&mut self, package: &str) -> bool;
    fn namespaces(&self) -> &NamespaceContainer;
    fn namespaces_mut(&mut self) -> &mut NamespaceContainer;
}

/// Plugin payload that only tracks how many package elements it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementCountPlugin {
    package: String,
    element_count: usize,
}

impl ElementCountPlugin {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            element_count: 0,
        }
    }

    pub fn add_element(&mut self) {
        self.element_count += 1;
    }

    pub fn clear(&mut self) {
        self.element_count = 0;
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }
}

impl DocumentPlugin for ElementCountPlugin {
    fn package_name(&self) -> &str {
        &self.package
    }

    fn has_content(&self) -> bool {
        self.element_count > 0
    }
}

#[derive(Debug, Clone)]
struct PluginSlot {
    plugin: ElementCountPlugin,
    active: bool,
}

/// In-memory document with per-package plugins.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    plugins: BTreeMap<String, PluginSlot>,
    namespaces: NamespaceContainer,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches an active, empty plugin for `package` (no-op if present).
    pub fn enable_plugin(&mut self, package: &str) -> &mut ElementCountPlugin {
        let slot = self
            .plugins
            .entry(package.to_string())
            .or_insert_with(|| PluginSlot {
                plugin: ElementCountPlugin::new(package),
                active: true,
            });
        &mut slot.plugin
    }

    pub fn plugin_mut(&mut self, package: &str) -> Option<&mut ElementCountPlugin> {
        self.plugins.get_mut(package).map(|slot| &mut slot.plugin)
    }

    pub fn is_package_active(&self, package: &str) -> bool {
        self.plugins
            .get(package)
            .map(|slot| slot.active)
            .unwrap_or(false)
    }

    fn set_active(&mut self, package: &str, active: bool) -> bool {
        match self.plugins.get_mut(package) {
            Some(slot) => {
                slot.active = active;
                true
            }
            None => false,
        }
    }
}

impl PluginDocument for MemoryDocument {
    fn active_packages(&self) -> Vec<String> {
        self.plugins
            .iter()
            .filter(|(_, slot)| slot.active)
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn plugin(&self, package: &str) -> Option<&dyn DocumentPlugin> {
        self.plugins
            .get(package)
            .map(|slot| &slot.plugin as &dyn DocumentPlugin)
    }

    fn activate_package(&mut self, package: &str) -> bool {
        self.set_active(package, true)
    }

    fn deactivate_package(&mut self, package: &str) -> bool {
        self.set_active(package, false)
    }

    fn namespaces(&self) -> &NamespaceContainer {
        &self.namespaces
    }

    fn namespaces_mut(&mut self) -> &mut NamespaceContainer {
        &mut self.namespaces
    }
}
