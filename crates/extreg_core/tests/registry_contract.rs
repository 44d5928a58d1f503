use extreg_core::{
    register_builtin_extensions, ExtensionDescriptor, ExtensionPoint, ExtensionRegistry,
    NamespaceContainer, NamespaceDeclaration, RegistryError,
};

fn point(kind: &str) -> ExtensionPoint {
    ExtensionPoint::new(kind).expect("valid point")
}

fn package(name: &str, kind: &str, l2_uri: &str) -> ExtensionDescriptor {
    ExtensionDescriptor::new(name)
        .with_uri(format!("urn:test:{name}"))
        .with_extension_point(point(kind))
        .with_l2_namespace(NamespaceDeclaration::new(name, l2_uri, 2))
}

#[test]
fn added_descriptor_is_registered_and_content_equal() {
    let registry = ExtensionRegistry::new();
    let descriptor = package("spatial", "model", "urn:spatial:l2");
    registry
        .add_extension(descriptor.clone())
        .expect("registration");

    assert!(registry.is_registered("spatial"));
    assert!(registry.is_registered("urn:test:spatial"));
    assert_eq!(registry.get_extension("spatial"), Some(descriptor.clone()));
    assert_eq!(registry.get_extension("urn:test:spatial"), Some(descriptor));
    assert_eq!(registry.get_extension("urn:test:unknown"), None);
}

#[test]
fn duplicate_and_conflicting_registrations() {
    let registry = ExtensionRegistry::new();
    let descriptor = package("distrib", "model", "urn:distrib:l2");
    registry
        .add_extension(descriptor.clone())
        .expect("registration");
    registry
        .add_extension(descriptor.clone())
        .expect("identical re-registration");
    assert_eq!(registry.num_registered_packages(), 1);

    let mut divergent = descriptor;
    divergent.l2_namespaces[0].format_version = 3;
    let err = registry
        .add_extension(divergent)
        .expect_err("divergent content must conflict");
    assert!(matches!(err, RegistryError::Conflict { .. }));
    assert_eq!(registry.num_registered_packages(), 1);
    assert_eq!(
        registry
            .get_extension("distrib")
            .expect("distrib")
            .l2_namespaces[0]
            .format_version,
        2
    );
}

#[test]
fn enable_and_disable_round_trip() {
    let registry = ExtensionRegistry::new();
    registry
        .add_extension(package("multi", "model", "urn:multi:l2"))
        .expect("registration");

    assert!(registry.is_package_enabled("multi"));
    assert!(registry.disable_package("multi"));
    assert!(!registry.is_package_enabled("multi"));
    assert!(registry.is_registered("multi"));
    assert!(registry.enable_package("urn:test:multi"));
    assert!(registry.is_package_enabled("multi"));
}

#[test]
fn unknown_identities_answer_false() {
    let registry = ExtensionRegistry::new();
    register_builtin_extensions(&registry).expect("builtins");

    for key in ["not-a-real-package", "", "   "] {
        assert!(!registry.is_package_enabled(key));
        assert!(!registry.is_enabled(key));
        assert!(!registry.is_registered(key));
        assert!(!registry.disable_package(key));
        assert!(registry.get_extension(key).is_none());
    }
}

#[test]
fn enumeration_counts_distinct_successful_registrations() {
    let registry = ExtensionRegistry::new();
    registry
        .add_extension(package("b", "model", "urn:b:l2"))
        .expect("b");
    registry
        .add_extension(package("a", "model", "urn:a:l2"))
        .expect("a");
    registry
        .add_extension(package("a", "model", "urn:a:l2"))
        .expect("a again");
    let _ = registry.add_extension(package("a", "document", "urn:a:l2"));
    let _ = registry.add_extension(ExtensionDescriptor::new("c"));

    assert_eq!(registry.num_registered_packages(), 2);
    assert_eq!(registry.registered_package_name(0).as_deref(), Some("b"));
    assert_eq!(registry.registered_package_name(1).as_deref(), Some("a"));
    assert_eq!(registry.registered_package_name(2), None);
}

#[test]
fn render_extensions_share_layout_point() {
    let registry = ExtensionRegistry::new();
    registry
        .add_extension(ExtensionDescriptor::new("render").with_extension_point(point("layout")))
        .expect("render");
    assert_eq!(registry.num_extension(&point("layout")), 1);

    registry
        .add_extension(ExtensionDescriptor::new("render2").with_extension_point(point("layout")))
        .expect("render2");
    assert_eq!(registry.num_extension(&point("layout")), 2);
}

#[test]
fn l2_namespaces_round_trip_restores_container() {
    let registry = ExtensionRegistry::new();
    register_builtin_extensions(&registry).expect("builtins");
    registry
        .add_extension(package("arrays", "model", "urn:arrays:l2"))
        .expect("arrays");

    let mut namespaces = NamespaceContainer::new();
    namespaces.add(NamespaceDeclaration::new(
        "",
        "http://www.sbml.org/sbml/level2/version4",
        2,
    ));
    namespaces.add(NamespaceDeclaration::new("html", "http://www.w3.org/1999/xhtml", 2));
    let before = namespaces.clone();

    registry.add_l2_namespaces(&mut namespaces);
    assert_eq!(namespaces.len(), before.len() + 3);
    assert_eq!(
        namespaces.uri_for_prefix("layout"),
        Some("http://projects.eml.ac.uk/sbml/level2")
    );
    assert_eq!(
        namespaces.uri_for_prefix("render"),
        Some("http://projects.eml.ac.uk/sbml/render/level2")
    );

    registry.add_l2_namespaces(&mut namespaces);
    assert_eq!(namespaces.len(), before.len() + 3);

    registry.remove_l2_namespaces(&mut namespaces);
    assert_eq!(namespaces, before);
}

#[test]
fn remove_l2_namespaces_leaves_unowned_declarations() {
    let registry = ExtensionRegistry::new();
    register_builtin_extensions(&registry).expect("builtins");

    let mut namespaces = NamespaceContainer::new();
    namespaces.add(NamespaceDeclaration::new("foreign", "urn:foreign", 2));
    registry.remove_l2_namespaces(&mut namespaces);
    assert_eq!(namespaces.len(), 1);
    assert!(namespaces.contains_uri("urn:foreign"));
}
