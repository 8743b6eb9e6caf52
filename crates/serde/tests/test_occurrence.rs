use dfe_serde::{
    AlertKind, Cause, DfeObject, DfeSerializer, Element, ErrorKind, Result, SerializerOptions,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Default, DfeObject)]
#[dfe(root = "ordered")]
struct Ordered {
    #[dfe(element = "c", order = 20)]
    c: String,
    #[dfe(element = "a", order = 10)]
    a: String,
    #[dfe(element = "b", order = 5)]
    b: String,
}

#[derive(Debug, Default, DfeObject)]
#[dfe(root = "ties")]
struct Ties {
    #[dfe(element = "late", order = 2)]
    late: String,
    #[dfe(element = "first")]
    first: String,
    #[dfe(element = "second")]
    second: String,
}

#[derive(Debug, Default, DfeObject)]
#[dfe(root = "leaves")]
struct Leaves {
    #[dfe(element = "opt", occurrence = OptionalIfNull)]
    opt: Option<String>,
    #[dfe(element = "optText", occurrence = OptionalIfNull)]
    opt_text: String,
    #[dfe(element = "req", id = "X01")]
    req: Option<String>,
    #[dfe(element = "nonZero", kind = De2, occurrence = RequiredIfNonZero)]
    non_zero: Decimal,
    #[dfe(element = "count", kind = Int)]
    count: i32,
    #[dfe(ignore)]
    scratch: String,
}

#[derive(Debug, Default, DfeObject)]
#[dfe(root = "child")]
struct Child {
    #[dfe(element = "value")]
    value: String,
}

#[derive(Debug, Default, DfeObject)]
#[dfe(root = "parent")]
struct Parent {
    #[dfe(element = "maybe", occurrence = OptionalIfNull)]
    maybe: Option<Child>,
    #[dfe(element = "always")]
    always: Child,
}

#[derive(Debug, Default, DfeObject)]
#[dfe(root = "gated")]
struct Gated {
    #[dfe(element = "shown")]
    shown: String,
    #[dfe(element = "hidden", should_serialize = "Self::has_hidden")]
    hidden: String,
}

impl Gated {
    fn has_hidden(&self) -> bool {
        self.hidden != "skip"
    }
}

#[derive(Debug, Default, DfeObject)]
#[dfe(root = "bounded")]
struct Bounded {
    #[dfe(element = "code", id = "B01", min = 3, max = 5)]
    code: String,
}

fn names(element: &Element) -> Vec<&str> {
    element.children.iter().map(|child| child.name.as_str()).collect()
}

#[test]
fn test_fields_follow_order() -> Result<()> {
    let ordered = Ordered {
        c: "3".to_string(),
        a: "1".to_string(),
        b: "2".to_string(),
    };
    let element = DfeSerializer::default().serialize(&ordered)?;
    assert_eq!(names(&element), vec!["b", "a", "c"]);
    Ok(())
}

#[test]
fn test_order_ties_keep_declaration_order() -> Result<()> {
    let element = DfeSerializer::default().serialize(&Ties::default())?;
    assert_eq!(names(&element), vec!["first", "second", "late"]);
    Ok(())
}

#[test]
fn test_occurrence_rules() -> Result<()> {
    let serializer = DfeSerializer::default();
    let (element, alerts) = serializer.serialize_with_alerts(&Leaves::default())?;

    assert_eq!(names(&element), vec!["req", "count"]);
    assert_eq!(element.child("req").map(Element::text), Some(""));
    assert_eq!(element.child("count").map(Element::text), Some("0"));

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::RequiredEmpty);
    assert_eq!(alerts[0].id, "X01");
    assert_eq!(alerts[0].field, "req");

    let leaves = Leaves {
        opt: Some("x".to_string()),
        opt_text: "y".to_string(),
        req: Some("z".to_string()),
        non_zero: dec!(0.5),
        count: 3,
        scratch: "never written".to_string(),
    };
    let (element, alerts) = serializer.serialize_with_alerts(&leaves)?;
    assert_eq!(names(&element), vec!["opt", "optText", "req", "nonZero", "count"]);
    assert_eq!(element.child("nonZero").map(Element::text), Some("0.50"));
    assert!(alerts.is_empty());

    Ok(())
}

#[test]
fn test_alerts_can_be_disabled() -> Result<()> {
    let options = SerializerOptions {
        collect_alerts: false,
        ..Default::default()
    };
    let (_, alerts) = DfeSerializer::new(options).serialize_with_alerts(&Leaves::default())?;
    assert!(alerts.is_empty());
    Ok(())
}

#[test]
fn test_absent_leaves_take_defaults() -> Result<()> {
    let element = Element::new("leaves", None).with_child(Element::leaf("opt", None, "kept"));
    let leaves: Leaves = DfeSerializer::default().deserialize(&element)?;

    assert_eq!(leaves.opt.as_deref(), Some("kept"));
    assert_eq!(leaves.opt_text, "");
    assert_eq!(leaves.req, None);
    assert_eq!(leaves.non_zero, Decimal::ZERO);
    assert_eq!(leaves.count, 0);
    assert_eq!(leaves.scratch, "");
    Ok(())
}

#[test]
fn test_element_leaf_falls_back_to_attribute() -> Result<()> {
    let element = Element::new("leaves", None)
        .with_attribute("count", "7")
        .with_child(Element::leaf("req", None, "child"))
        .with_attribute("req", "attribute");
    let leaves: Leaves = DfeSerializer::default().deserialize(&element)?;

    assert_eq!(leaves.count, 7);
    assert_eq!(leaves.req.as_deref(), Some("child"));
    Ok(())
}

#[test]
fn test_strict_required_rejects_missing_leaf() {
    let options = SerializerOptions::default().with_strict_required(true);
    let element = Element::new("leaves", None).with_child(Element::leaf("req", None, "r"));

    let err = DfeSerializer::new(options)
        .deserialize::<Leaves>(&element)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    assert!(matches!(err.cause(), Cause::MissingNode { tag } if tag == "count"));
    assert_eq!(err.path(), "Leaves.count");
}

#[test]
fn test_absent_objects() -> Result<()> {
    let element = Element::new("parent", None);
    let parent: Parent = DfeSerializer::default().deserialize(&element)?;
    assert!(parent.maybe.is_none());
    assert_eq!(parent.always.value, "");

    let parent = Parent {
        maybe: None,
        always: Child {
            value: "v".to_string(),
        },
    };
    let element = DfeSerializer::default().serialize(&parent)?;
    assert_eq!(names(&element), vec!["always"]);
    assert_eq!(element.find(&["always", "value"]).map(Element::text), Some("v"));
    Ok(())
}

#[test]
fn test_should_serialize_predicate() -> Result<()> {
    let serializer = DfeSerializer::default();
    let gated = Gated {
        shown: "a".to_string(),
        hidden: "skip".to_string(),
    };
    assert_eq!(names(&serializer.serialize(&gated)?), vec!["shown"]);

    let gated = Gated {
        shown: "a".to_string(),
        hidden: "b".to_string(),
    };
    assert_eq!(names(&serializer.serialize(&gated)?), vec!["shown", "hidden"]);
    Ok(())
}

#[test]
fn test_length_alerts() -> Result<()> {
    let serializer = DfeSerializer::default();

    let (_, alerts) = serializer.serialize_with_alerts(&Bounded {
        code: "ab".to_string(),
    })?;
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::TooShort { length: 2, min: 3 });

    let (element, alerts) = serializer.serialize_with_alerts(&Bounded {
        code: "abcdef".to_string(),
    })?;
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::TooLong { length: 6, max: 5 });
    assert_eq!(alerts[0].tag, "code");
    assert_eq!(element.child("code").map(Element::text), Some("abcdef"));

    let (_, alerts) = serializer.serialize_with_alerts(&Bounded {
        code: "abcd".to_string(),
    })?;
    assert!(alerts.is_empty());
    Ok(())
}
