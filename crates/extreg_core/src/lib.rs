//! Core package extension registry for extensible document formats.
//! This crate owns package registration, enablement, and legacy namespace
//! merging; documents are consumed through the `document` traits.

pub mod config;
pub mod document;
pub mod extension;
pub mod logging;
pub mod namespace;

pub use config::{load_config, ConfigError, RegistryConfig};
pub use document::{DocumentPlugin, ElementCountPlugin, MemoryDocument, PluginDocument};
pub use extension::builtin::{register_builtin_extensions, LayoutExtension, RenderExtension};
pub use extension::descriptor::{DescriptorValidationError, ExtensionDescriptor};
pub use extension::point::{ExtensionPoint, ExtensionPointError};
pub use extension::registry::{
    ExtensionRegistry, PackageExtension, RegisteredExtension, RegistryError,
};
pub use extension::uri::PackageUri;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use namespace::{NamespaceContainer, NamespaceDeclaration};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
