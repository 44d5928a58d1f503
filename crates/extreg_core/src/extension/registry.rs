//! Process-wide package extension registry.
//!
//! # Responsibility
//! - Own the catalog of registered package descriptors and their enabled flags.
//! - Merge/strip legacy package namespaces and toggle per-document plugins.
//!
//! # Invariants
//! - Every lookup key (name or URI) resolves to exactly one registered entry.
//! - Each entry carries its own enabled flag, so flags never outlive or
//!   precede their descriptor.
//! - Registration is all-or-nothing: checks run before any table mutation.
//! - Unknown keys are soft failures (`false`/`None`), never errors.

use crate::config::RegistryConfig;
use crate::document::PluginDocument;
use crate::extension::descriptor::{DescriptorValidationError, ExtensionDescriptor};
use crate::extension::point::ExtensionPoint;
use crate::namespace::{NamespaceContainer, NamespaceDeclaration};
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

static INSTANCE: OnceCell<ExtensionRegistry> = OnceCell::new();

/// Contract implemented by package modules that register via the registry.
pub trait PackageExtension {
    fn descriptor(&self) -> ExtensionDescriptor;
}

/// Registered descriptor snapshot with its process-wide enabled flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredExtension {
    pub descriptor: ExtensionDescriptor,
    pub enabled: bool,
}

#[derive(Debug, Default)]
struct RegistryTable {
    entries: Vec<RegisteredExtension>,
    keys: BTreeMap<String, usize>,
    point_index: BTreeMap<ExtensionPoint, BTreeSet<usize>>,
}

impl RegistryTable {
    fn resolve(&self, key: &str) -> Option<usize> {
        self.keys
            .get(key)
            .or_else(|| self.keys.get(key.trim()))
            .copied()
    }

    fn entry(&self, key: &str) -> Option<&RegisteredExtension> {
        self.resolve(key).and_then(|index| self.entries.get(index))
    }
}

/// Catalog of package extensions shared by document readers and writers.
#[derive(Debug)]
pub struct ExtensionRegistry {
    table: RwLock<RegistryTable>,
    config: RegistryConfig,
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtensionRegistry {
    /// Creates a standalone registry with the default policy.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            table: RwLock::new(RegistryTable::default()),
            config,
        }
    }

    /// Returns the process-wide registry, creating it on first use.
    pub fn instance() -> &'static ExtensionRegistry {
        INSTANCE.get_or_init(|| {
            info!("event=registry_init module=registry status=ok source=lazy");
            Self::new()
        })
    }

    /// Installs the process-wide registry with an explicit policy.
    ///
    /// # Errors
    /// - `AlreadyInitialized` when `instance()` or `install()` already ran.
    pub fn install(config: RegistryConfig) -> Result<&'static ExtensionRegistry, RegistryError> {
        let mut installed = false;
        let registry = INSTANCE.get_or_init(|| {
            installed = true;
            info!(
                "event=registry_init module=registry status=ok source=install mandatory={}",
                config.mandatory_packages.len()
            );
            Self::with_config(config)
        });
        if installed {
            Ok(registry)
        } else {
            warn!("event=registry_init module=registry status=error reason=already_initialized");
            Err(RegistryError::AlreadyInitialized)
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Registers one package descriptor.
    ///
    /// Re-registering a content-identical descriptor is a no-op.
    ///
    /// # Errors
    /// - `InvalidValue` when the descriptor fails validation.
    /// - `Conflict` when any of its lookup keys is owned by a different
    ///   registration or the same identity carries different content.
    pub fn add_extension(&self, descriptor: ExtensionDescriptor) -> Result<(), RegistryError> {
        if let Err(err) = descriptor.validate() {
            warn!(
                "event=package_register module=registry status=error code=invalid_attribute_value package={:?} reason={}",
                descriptor.name, err
            );
            return Err(RegistryError::InvalidValue(err));
        }

        let mut guard = self.table.write();
        let table = &mut *guard;

        let mut owner: Option<usize> = None;
        for key in descriptor.lookup_keys() {
            let Some(&index) = table.keys.get(key) else {
                continue;
            };
            match owner {
                None => owner = Some(index),
                Some(previous) if previous == index => {}
                Some(previous) => {
                    let err = RegistryError::Conflict {
                        identity: descriptor.name.clone(),
                        reason: format!(
                            "lookup keys are owned by packages {} and {}",
                            table.entries[previous].descriptor.name,
                            table.entries[index].descriptor.name
                        ),
                    };
                    warn!(
                        "event=package_register module=registry status=error code={} package={}",
                        err.code(),
                        descriptor.name
                    );
                    return Err(err);
                }
            }
        }

        if let Some(index) = owner {
            let registered = &table.entries[index].descriptor;
            if registered.same_content(&descriptor) {
                debug!(
                    "event=package_register module=registry status=ok package={} duplicate=true",
                    descriptor.name
                );
                return Ok(());
            }
            let err = RegistryError::Conflict {
                identity: descriptor.name.clone(),
                reason: format!(
                    "already registered with different content as package {}",
                    registered.name
                ),
            };
            warn!(
                "event=package_register module=registry status=error code={} package={}",
                err.code(),
                descriptor.name
            );
            return Err(err);
        }

        let index = table.entries.len();
        for key in descriptor.lookup_keys() {
            table.keys.insert(key.to_string(), index);
        }
        for point in &descriptor.extension_points {
            table
                .point_index
                .entry(point.clone())
                .or_default()
                .insert(index);
        }

        let enabled = self.config.starts_enabled(descriptor.lookup_keys());
        info!(
            "event=package_register module=registry status=ok package={} uris={} points={} enabled={}",
            descriptor.name,
            descriptor.uris.len(),
            descriptor.extension_points.len(),
            enabled
        );
        table.entries.push(RegisteredExtension {
            descriptor,
            enabled,
        });
        Ok(())
    }

    /// Registers the descriptor supplied by a package module.
    pub fn register_module(&self, module: &impl PackageExtension) -> Result<(), RegistryError> {
        self.add_extension(module.descriptor())
    }

    /// Returns a detached copy of the descriptor for a name or URI.
    pub fn get_extension(&self, key: &str) -> Option<ExtensionDescriptor> {
        self.table
            .read()
            .entry(key)
            .map(|entry| entry.descriptor.clone())
    }

    /// Strips the legacy namespaces of every enabled package from `namespaces`.
    pub fn remove_l2_namespaces(&self, namespaces: &mut NamespaceContainer) {
        let table = self.table.read();
        for entry in table.entries.iter().filter(|entry| entry.enabled) {
            for declaration in &entry.descriptor.l2_namespaces {
                if namespaces.remove_uri(&declaration.uri) > 0 {
                    debug!(
                        "event=l2_namespace_remove module=registry status=ok package={} uri={}",
                        entry.descriptor.name, declaration.uri
                    );
                }
            }
        }
    }

    /// Declares the legacy namespaces of every enabled package in `namespaces`.
    pub fn add_l2_namespaces(&self, namespaces: &mut NamespaceContainer) {
        let table = self.table.read();
        for entry in table.entries.iter().filter(|entry| entry.enabled) {
            for declaration in &entry.descriptor.l2_namespaces {
                if namespaces.add_if_absent(declaration) {
                    debug!(
                        "event=l2_namespace_add module=registry status=ok package={} uri={}",
                        entry.descriptor.name, declaration.uri
                    );
                }
            }
        }
    }

    /// Declares legacy namespaces for the enabled packages active on `document`.
    pub fn enable_l2_namespace_for_document<D>(&self, document: &mut D)
    where
        D: PluginDocument + ?Sized,
    {
        let active = document.active_packages();
        let pending: Vec<(String, Vec<NamespaceDeclaration>)> = {
            let table = self.table.read();
            active
                .iter()
                .filter_map(|package| table.entry(package))
                .filter(|entry| entry.enabled && entry.descriptor.supports_l2())
                .map(|entry| {
                    (
                        entry.descriptor.name.clone(),
                        entry.descriptor.l2_namespaces.clone(),
                    )
                })
                .collect()
        };

        // The table lock is released before calling into the document.
        for (package, declarations) in pending {
            let namespaces = document.namespaces_mut();
            for declaration in &declarations {
                namespaces.add_if_absent(declaration);
            }
            debug!(
                "event=l2_namespace_enable module=registry status=ok package={}",
                package
            );
        }
    }

    /// Deactivates active packages whose plugin holds no content.
    ///
    /// Returns the deactivated package names. Only the document's activation
    /// state changes; process-wide flags are untouched.
    pub fn disable_unused_packages<D>(&self, document: &mut D) -> Vec<String>
    where
        D: PluginDocument + ?Sized,
    {
        let unused: Vec<String> = document
            .active_packages()
            .into_iter()
            .filter(|package| {
                document
                    .plugin(package)
                    .is_some_and(|plugin| !plugin.has_content())
            })
            .collect();

        for package in &unused {
            if document.deactivate_package(package) {
                debug!(
                    "event=package_deactivate module=registry status=ok package={} registered={}",
                    package,
                    self.is_registered(package)
                );
            }
        }
        unused
    }

    /// Sets the process-wide enabled flag.
    ///
    /// Returns `false` for unknown keys and for attempts to disable a
    /// mandatory package.
    pub fn set_enabled(&self, key: &str, enabled: bool) -> bool {
        let mut table = self.table.write();
        let Some(index) = table.resolve(key) else {
            debug!(
                "event=package_toggle module=registry status=error reason=unknown_package package={:?}",
                key
            );
            return false;
        };

        let entry = &mut table.entries[index];
        if !enabled && self.config.is_mandatory_any(entry.descriptor.lookup_keys()) {
            warn!(
                "event=package_toggle module=registry status=error reason=mandatory_package package={}",
                entry.descriptor.name
            );
            return false;
        }
        if entry.enabled != enabled {
            info!(
                "event=package_toggle module=registry status=ok package={} enabled={}",
                entry.descriptor.name, enabled
            );
        }
        entry.enabled = enabled;
        true
    }

    pub fn is_enabled(&self, key: &str) -> bool {
        self.table
            .read()
            .entry(key)
            .map(|entry| entry.enabled)
            .unwrap_or(false)
    }

    pub fn enable_package(&self, key: &str) -> bool {
        self.set_enabled(key, true)
    }

    pub fn disable_package(&self, key: &str) -> bool {
        self.set_enabled(key, false)
    }

    pub fn is_package_enabled(&self, key: &str) -> bool {
        self.is_enabled(key)
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.table.read().resolve(key).is_some()
    }

    /// Counts registered packages attached to `point`, enabled or not.
    pub fn num_extension(&self, point: &ExtensionPoint) -> usize {
        self.table
            .read()
            .point_index
            .get(point)
            .map(BTreeSet::len)
            .unwrap_or(0)
    }

    /// Returns descriptors attached to `point` in registration order.
    pub fn extensions_for_point(&self, point: &ExtensionPoint) -> Vec<ExtensionDescriptor> {
        let table = self.table.read();
        let Some(indices) = table.point_index.get(point) else {
            return vec![];
        };
        indices
            .iter()
            .filter_map(|index| table.entries.get(*index))
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    pub fn num_registered_packages(&self) -> usize {
        self.table.read().entries.len()
    }

    /// Returns the package name registered at `index` (registration order).
    pub fn registered_package_name(&self, index: usize) -> Option<String> {
        self.table
            .read()
            .entries
            .get(index)
            .map(|entry| entry.descriptor.name.clone())
    }

    pub fn registered_package_names(&self) -> Vec<String> {
        self.table
            .read()
            .entries
            .iter()
            .map(|entry| entry.descriptor.name.clone())
            .collect()
    }

    pub fn enabled_package_names(&self) -> Vec<String> {
        self.table
            .read()
            .entries
            .iter()
            .filter(|entry| entry.enabled)
            .map(|entry| entry.descriptor.name.clone())
            .collect()
    }

    /// Returns a snapshot of one registration with its enabled flag.
    pub fn registration(&self, key: &str) -> Option<RegisteredExtension> {
        self.table.read().entry(key).cloned()
    }
}

/// Enables `key` on the process-wide registry.
pub fn enable_package(key: &str) -> bool {
    ExtensionRegistry::instance().enable_package(key)
}

/// Disables `key` on the process-wide registry.
pub fn disable_package(key: &str) -> bool {
    ExtensionRegistry::instance().disable_package(key)
}

pub fn is_package_enabled(key: &str) -> bool {
    ExtensionRegistry::instance().is_package_enabled(key)
}

pub fn num_registered_packages() -> usize {
    ExtensionRegistry::instance().num_registered_packages()
}

pub fn registered_package_name(index: usize) -> Option<String> {
    ExtensionRegistry::instance().registered_package_name(index)
}

/// Registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    InvalidValue(DescriptorValidationError),
    Conflict { identity: String, reason: String },
    AlreadyInitialized,
}

impl RegistryError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidValue(_) => "invalid_attribute_value",
            Self::Conflict { .. } => "pkg_conflict",
            Self::AlreadyInitialized => "already_initialized",
        }
    }
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue(err) => write!(f, "invalid package descriptor: {err}"),
            Self::Conflict { identity, reason } => {
                write!(f, "package {identity} conflicts with registry: {reason}")
            }
            Self::AlreadyInitialized => write!(f, "extension registry is already initialized"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidValue(err) => Some(err),
            Self::Conflict { .. } | Self::AlreadyInitialized => None,
        }
    }
}
