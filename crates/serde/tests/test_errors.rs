mod common;

use common::*;
use dfe_serde::{
    Cause, DfeError, DfeObject, DfeSerializer, Direction, Element, ErrorKind, Frame,
    SerializerOptions,
};

#[derive(Debug, Default, DfeObject)]
#[dfe(root = "outer")]
struct Outer {
    #[dfe(element = "middle")]
    middle: Middle,
}

#[derive(Debug, Default, DfeObject)]
struct Middle {
    #[dfe(element = "inner")]
    inner: Vec<Inner>,
}

#[derive(Debug, Default, DfeObject)]
struct Inner {
    #[dfe(element = "dEmi", kind = Dat)]
    d_emi: String,
}

#[derive(Debug, Default, DfeObject)]
#[dfe(root = "untagged")]
struct Untagged {
    value: String,
}

fn outer_with(date: &str) -> Outer {
    Outer {
        middle: Middle {
            inner: vec![Inner {
                d_emi: date.to_string(),
            }],
        },
    }
}

#[test]
fn test_serialize_failure_names_innermost_field() {
    let err = DfeSerializer::default()
        .serialize(&outer_with("not a date"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FieldMapping);
    assert_eq!(err.direction(), Some(Direction::Serialize));
    assert_eq!(err.innermost_field(), Some(("Inner", "d_emi")));
    assert_eq!(err.path(), "Outer.middle.inner[0].d_emi");
    assert!(matches!(err.cause(), Cause::Format(_)));
    assert!(err.instance().is_some_and(|text| text.contains("not a date")));

    let message = err.to_string();
    assert!(message.contains("field `d_emi` of `Inner`"));
    assert!(message.contains("Outer.middle.inner[0].d_emi"));
}

#[test]
fn test_frames_run_from_innermost() {
    let err = DfeSerializer::default()
        .serialize(&outer_with("x"))
        .unwrap_err();

    assert_eq!(
        err.frames().first(),
        Some(&Frame::Field {
            type_name: "Inner",
            field: "d_emi"
        })
    );
    assert_eq!(err.frames().last(), Some(&Frame::Object { type_name: "Outer" }));
    assert!(err.frames().contains(&Frame::Index(0)));
}

#[test]
fn test_deserialize_failure_names_innermost_field() {
    let element = Element::new("outer", None).with_child(
        Element::new("middle", None)
            .with_child(Element::new("inner", None).with_child(Element::leaf("dEmi", None, "2024-03-01")))
            .with_child(Element::new("inner", None).with_child(Element::leaf("dEmi", None, "01/03/2024"))),
    );
    let err = DfeSerializer::default()
        .deserialize::<Outer>(&element)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FieldMapping);
    assert_eq!(err.direction(), Some(Direction::Deserialize));
    assert_eq!(err.path(), "Outer.middle.inner[1].d_emi");
    assert_eq!(err.instance(), Some("<inner>"));
}

#[test]
fn test_missing_tag() {
    let err = DfeSerializer::default()
        .serialize(&Untagged::default())
        .unwrap_err();
    assert!(matches!(err.cause(), Cause::MissingTag));
    assert_eq!(err.kind(), ErrorKind::FieldMapping);
    assert_eq!(err.path(), "Untagged.value");
}

#[test]
fn test_root_mismatch() {
    let element = Element::new("envelope", None).with_child(Element::new("other", None));
    let err = serializer().deserialize::<Cfe>(&element).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    assert_eq!(err.innermost_field(), None);
    match err.cause() {
        Cause::RootMismatch {
            type_name,
            found,
            expected,
        } => {
            assert_eq!(*type_name, "Cfe");
            assert_eq!(found, "envelope");
            assert_eq!(expected, "CFe, CFeCanc, Cfe");
        }
        other => panic!("unexpected cause: {other:?}"),
    }
    assert!(err.to_string().starts_with("failed to deserialize object `Cfe`"));
}

#[test]
fn test_invalid_options_rejected() {
    let options = SerializerOptions {
        encoding: "ISO-8859-1".to_string(),
        ..Default::default()
    };
    let err = DfeSerializer::try_new(options).unwrap_err();
    assert!(matches!(err, DfeError::Options(ref errors) if errors.len() == 1));
}

#[test]
fn test_mapping_error_converts_to_crate_error() {
    fn run() -> dfe_serde::Result<()> {
        DfeSerializer::default().serialize(&Untagged::default())?;
        Ok(())
    }
    let err = run().unwrap_err();
    assert!(matches!(err, DfeError::Mapping(_)));
}
