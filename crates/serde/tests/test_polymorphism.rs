mod common;

use common::*;
use dfe_serde::{
    Cause, DfeInterface, DfeObject, DfeSerializer, DfeType, Element, ErrorKind, Result,
    SerializerOptions, TypeDescriptor, TypeRegistry, TypeResolver,
};

#[derive(Debug, DfeObject)]
#[dfe(root = "obrigatorio", factory = "obrigatorio_vazio")]
struct Obrigatorio {
    #[dfe(id = "Q01")]
    pis: Box<dyn CfePis>,
}

fn obrigatorio_vazio() -> Obrigatorio {
    Obrigatorio {
        pis: Box::new(ImpostoPisNt::default()),
    }
}

/// Resolves everything under any interface to `PISNT`.
struct OnlyNt;

impl TypeResolver for OnlyNt {
    fn resolve(&self, _interface: &str, tag: &str) -> Option<&'static TypeDescriptor> {
        let descriptor = ImpostoPisNt::type_descriptor();
        descriptor.accepts(tag).then_some(descriptor)
    }
}

#[test]
fn test_interface_written_under_runtime_root() -> Result<()> {
    let element = serializer().serialize(&item(1, "A1", pis_nt()))?;
    let pis = element.find(&["imposto", "PIS"]).expect("PIS");
    assert_eq!(pis.children.len(), 1);
    assert_eq!(pis.children[0].name, "PISNT");
    assert_eq!(pis.children[0].child("CST").map(Element::text), Some("04"));
    Ok(())
}

#[test]
fn test_interface_resolved_by_element_name() -> Result<()> {
    let serializer = serializer();
    for (group, expected) in [(pis_aliq(), "ImpostoPisAliq"), (pis_nt(), "ImpostoPisNt")] {
        let element = serializer.serialize(&item(1, "A1", group))?;
        let back: Det = serializer.deserialize(&element)?;
        let group = back.imposto.pis.group.expect("resolved group");
        assert_eq!(group.descriptor().name, expected);
    }
    Ok(())
}

#[test]
fn test_unregistered_interface_leaves_optional_slot_empty() -> Result<()> {
    let element = serializer().serialize(&item(1, "A1", pis_aliq()))?;
    let back: Det = DfeSerializer::default().deserialize(&element)?;
    assert!(back.imposto.pis.group.is_none());
    Ok(())
}

#[test]
fn test_required_interface_slot_must_resolve() {
    let element = Element::new("obrigatorio", None).with_child(Element::new("PISOutr", None));
    let err = serializer().deserialize::<Obrigatorio>(&element).unwrap_err();

    assert!(matches!(err.cause(), Cause::Unresolved { interface: "CfePis" }));
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    assert_eq!(err.path(), "Obrigatorio.pis");
}

#[test]
fn test_required_interface_slot_round_trip() -> Result<()> {
    let serializer = serializer();
    let value = Obrigatorio { pis: pis_aliq() };
    let element = serializer.serialize(&value)?;
    assert_eq!(element.children[0].name, "PISAliq");

    let back: Obrigatorio = serializer.deserialize(&element)?;
    assert!(back.pis.as_any().is::<ImpostoPisAliq>());
    Ok(())
}

#[test]
fn test_custom_resolver() -> Result<()> {
    let custom = DfeSerializer::new(SerializerOptions::default()).with_resolver(OnlyNt);
    let element = serializer().serialize(&item(1, "A1", pis_nt()))?;
    let back: Det = custom.deserialize(&element)?;
    assert!(back.imposto.pis.group.is_some());

    let element = serializer().serialize(&item(1, "A1", pis_aliq()))?;
    let back: Det = custom.deserialize(&element)?;
    assert!(back.imposto.pis.group.is_none());
    Ok(())
}

#[test]
fn test_registry_lookup() {
    let registry = TypeRegistry::new().with_interface::<dyn CfePis>();
    assert_eq!(<dyn CfePis as DfeInterface>::NAME, "CfePis");
    assert_eq!(registry.implementors("CfePis").len(), 2);
    assert!(registry.implementors("Other").is_empty());

    let resolved = registry.resolve("CfePis", "PISAliq").map(|d| d.name);
    assert_eq!(resolved, Some("ImpostoPisAliq"));
    assert!(registry.resolve("CfePis", "PISST").is_none());
    assert!(registry.resolve("Other", "PISAliq").is_none());
}

#[test]
fn test_registry_ignores_duplicates() {
    let mut registry = TypeRegistry::new();
    registry
        .register_type::<ImpostoPisNt>("CfePis")
        .register_type::<ImpostoPisNt>("CfePis")
        .register_interface::<dyn CfePis>();
    assert_eq!(registry.implementors("CfePis").len(), 2);
}
