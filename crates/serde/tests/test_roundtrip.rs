mod common;

use common::*;
use dfe_serde::{DfeObject, Element, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_round_trip_preserves_tree() -> Result<()> {
    let serializer = serializer();
    let (element, alerts) = serializer.serialize_with_alerts(&sample_cfe())?;
    assert!(alerts.is_empty(), "unexpected alerts: {:?}", alerts);

    let back: Cfe = serializer.deserialize(&element)?;
    let again = serializer.serialize(&back)?;
    assert_eq!(element, again);

    Ok(())
}

#[test]
fn test_serialized_shape() -> Result<()> {
    let element = serializer().serialize(&sample_cfe())?;

    assert_eq!(element.name, "CFe");
    assert_eq!(element.namespace.as_deref(), Some(CFE_NAMESPACE));

    let inf = element.child("infCFe").expect("infCFe");
    assert_eq!(inf.attribute("versaoDadosEnt"), Some("0.08"));
    assert_eq!(inf.attribute("Id"), None);
    assert_eq!(inf.find(&["ide", "cUF"]).map(Element::text), Some("35"));
    assert_eq!(inf.find(&["ide", "dEmi"]).map(Element::text), Some("20240301"));
    assert_eq!(inf.find(&["ide", "hEmi"]).map(Element::text), Some("140500"));
    assert_eq!(inf.find(&["ide", "tpAmb"]).map(Element::text), Some("2"));
    assert_eq!(inf.find(&["emit", "CNPJ"]).map(Element::text), Some("11111111000111"));
    assert_eq!(
        inf.find(&["emit", "xNome"]).map(Element::text),
        Some("Padaria São João")
    );
    assert!(inf.child("obsFisco").is_none());

    let det = inf.child("det").expect("det");
    assert_eq!(det.attribute("nItem"), Some("1"));
    assert!(det.child("infAdProd").is_none());
    assert_eq!(det.find(&["prod", "qCom"]).map(Element::text), Some("1.5000"));
    assert_eq!(det.find(&["prod", "vUnCom"]).map(Element::text), Some("10.00"));
    assert!(det.find(&["imposto", "vItem12741"]).is_none());

    let aliq = det.find(&["imposto", "PIS", "PISAliq"]).expect("PISAliq");
    assert_eq!(aliq.child("CST").map(Element::text), Some("01"));
    assert_eq!(aliq.child("vBC").map(Element::text), Some("15.00"));
    assert_eq!(aliq.child("pPIS").map(Element::text), Some("0.0165"));
    assert_eq!(aliq.child("vPIS").map(Element::text), Some("0.25"));

    Ok(())
}

#[test]
fn test_deserialized_values() -> Result<()> {
    let serializer = serializer();
    let element = serializer.serialize(&sample_cfe())?;
    let back: Cfe = serializer.deserialize(&element)?;
    let inf = &back.inf_cfe;

    assert_eq!(inf.versao, "0.08");
    assert_eq!(inf.id, None);
    assert_eq!(inf.ide.c_uf, 35);
    assert_eq!(inf.ide.d_emi.to_string(), "2024-03-01");
    assert_eq!(inf.ide.tp_amb, TipoAmbiente::Homologacao);
    assert_eq!(inf.emit.cnpj, "11111111000111");
    assert_eq!(inf.emit.x_nome.as_deref(), Some("Padaria São João"));
    assert!(inf.obs_fisco.is_empty());

    assert_eq!(inf.det.len(), 3);
    let first = &inf.det[0];
    assert_eq!(first.n_item, 1);
    assert_eq!(first.prod.c_prod, "A1");
    assert_eq!(first.prod.q_com, dec!(1.5));
    assert_eq!(first.prod.v_un_com, dec!(10));
    assert_eq!(first.imposto.v_item12741, Decimal::ZERO);
    assert_eq!(first.inf_ad_prod, None);

    let group = first.imposto.pis.group.as_ref().expect("PIS group");
    let aliq = group
        .as_any()
        .downcast_ref::<ImpostoPisAliq>()
        .expect("PISAliq");
    assert_eq!(aliq.cst, "01");
    assert_eq!(aliq.v_bc, dec!(15));
    assert_eq!(aliq.p_pis, dec!(0.0165));
    assert_eq!(aliq.v_pis, dec!(0.25));

    let group = inf.det[1].imposto.pis.group.as_ref().expect("PIS group");
    assert!(group.as_any().is::<ImpostoPisNt>());

    Ok(())
}

#[test]
fn test_deserialize_as_builds_boxed_object() -> Result<()> {
    use dfe_serde::DfeType;

    let serializer = serializer();
    let element = serializer.serialize(&sample_cfe())?;
    let object = serializer.deserialize_as(Cfe::type_descriptor(), Some(&element))?;
    assert_eq!(object.descriptor().name, "Cfe");

    let bare = serializer.deserialize_as(Prod::type_descriptor(), None)?;
    let prod = bare.as_any().downcast_ref::<Prod>().expect("Prod");
    assert!(prod.c_prod.is_empty());

    Ok(())
}

#[test]
fn test_serialize_as_uses_given_name() -> Result<()> {
    let prod = Prod {
        c_prod: "X".to_string(),
        ..Default::default()
    };
    let element = serializer().serialize_as(&prod, "produto", Some("urn:test"))?;
    assert_eq!(element.name, "produto");
    assert_eq!(element.namespace.as_deref(), Some("urn:test"));
    assert_eq!(element.child("cProd").map(Element::text), Some("X"));

    Ok(())
}
