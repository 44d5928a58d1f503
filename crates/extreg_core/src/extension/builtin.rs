//! Built-in package modules shipped with the registry.

use crate::extension::descriptor::ExtensionDescriptor;
use crate::extension::point::{ExtensionPoint, POINT_LAYOUT, POINT_MODEL};
use crate::extension::registry::{ExtensionRegistry, PackageExtension, RegistryError};
use crate::extension::uri::PackageUri;
use crate::namespace::NamespaceDeclaration;

/// Annotation namespace used by layout data embedded in level 2 documents.
pub const LAYOUT_L2_NAMESPACE: &str = "http://projects.eml.ac.uk/sbml/level2";
/// Annotation namespace used by render data embedded in level 2 documents.
pub const RENDER_L2_NAMESPACE: &str = "http://projects.eml.ac.uk/sbml/render/level2";

const LEGACY_FORMAT_LEVEL: u32 = 2;

/// Diagram layout package.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutExtension;

impl LayoutExtension {
    pub const NAME: &'static str = "layout";
}

impl PackageExtension for LayoutExtension {
    fn descriptor(&self) -> ExtensionDescriptor {
        package_descriptor(Self::NAME, &[POINT_MODEL])
            .with_l2_namespace(NamespaceDeclaration::new(
                Self::NAME,
                LAYOUT_L2_NAMESPACE,
                LEGACY_FORMAT_LEVEL,
            ))
    }
}

/// Rendering/style package; attaches to layouts as well as the model.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderExtension;

impl RenderExtension {
    pub const NAME: &'static str = "render";
}

impl PackageExtension for RenderExtension {
    fn descriptor(&self) -> ExtensionDescriptor {
        package_descriptor(Self::NAME, &[POINT_MODEL, POINT_LAYOUT])
            .with_l2_namespace(NamespaceDeclaration::new(
                Self::NAME,
                RENDER_L2_NAMESPACE,
                LEGACY_FORMAT_LEVEL,
            ))
    }
}

fn package_descriptor(name: &str, points: &[&str]) -> ExtensionDescriptor {
    let mut descriptor =
        ExtensionDescriptor::new(name).with_uri(PackageUri::new(name, 3, 1, 1).to_string());
    for kind in points {
        if let Ok(point) = ExtensionPoint::new(kind) {
            descriptor = descriptor.with_extension_point(point);
        }
    }
    descriptor
}

/// Registers every built-in package module.
pub fn register_builtin_extensions(registry: &ExtensionRegistry) -> Result<(), RegistryError> {
    registry.register_module(&LayoutExtension)?;
    registry.register_module(&RenderExtension)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{register_builtin_extensions, LayoutExtension, RenderExtension, LAYOUT_L2_NAMESPACE};
    use crate::extension::point::ExtensionPoint;
    use crate::extension::registry::{ExtensionRegistry, PackageExtension};

    #[test]
    fn builtin_descriptors_are_valid() {
        LayoutExtension.descriptor().validate().expect("layout valid");
        RenderExtension.descriptor().validate().expect("render valid");
    }

    #[test]
    fn registers_builtins_idempotently() {
        let registry = ExtensionRegistry::new();
        register_builtin_extensions(&registry).expect("builtins register");
        register_builtin_extensions(&registry).expect("builtins re-register");

        assert_eq!(
            registry.registered_package_names(),
            vec!["layout".to_string(), "render".to_string()]
        );
        let layout = registry
            .get_extension("http://www.sbml.org/sbml/level3/version1/layout/version1")
            .expect("layout by uri");
        assert_eq!(layout.l2_namespaces[0].uri, LAYOUT_L2_NAMESPACE);

        let layout_point = ExtensionPoint::new("layout").expect("layout point");
        assert_eq!(registry.num_extension(&layout_point), 1);
        let model_point = ExtensionPoint::new("model").expect("model point");
        assert_eq!(registry.num_extension(&model_point), 2);
    }
}
