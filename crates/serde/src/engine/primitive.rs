use dfe_serde_support::Primitive;

use super::Context;
use crate::alert::AlertKind;
use crate::error::Cause;
use crate::metadata::{FieldDescriptor, Occurrence, Placement, TypeDescriptor};
use crate::tree::{Attribute, Element, Node};
use crate::value::{FieldRef, FieldValue, ValueError};

/// Writes a leaf as an element or attribute, honouring its occurrence rule.
pub(super) fn serialize(
    cx: &Context<'_>,
    owner: &TypeDescriptor,
    field: &FieldDescriptor,
    value: FieldRef<'_>,
) -> Result<Option<Node>, Cause> {
    let tag = field.tag.ok_or(Cause::MissingTag)?;
    let value = match value {
        FieldRef::Null => None,
        FieldRef::Primitive(p) => Some(p),
        other => {
            return Err(ValueError::Mismatch {
                expected: "primitive",
                found: other.describe(),
            }
            .into());
        }
    };

    let text = match (field.occurrence, value) {
        (Occurrence::OptionalIfNull, None) | (Occurrence::RequiredIfNonZero, None) => {
            return Ok(None);
        }
        (Occurrence::OptionalIfNull, Some(p)) if p.is_empty() => return Ok(None),
        (Occurrence::RequiredIfNonZero, Some(p)) if p.is_zero() => return Ok(None),
        (_, Some(p)) => cx.codec.to_text(&p, field.kind, cx.options)?,
        (Occurrence::Required, None) => String::new(),
    };

    check_length(cx, owner, field, &text);

    Ok(Some(match tag.placement {
        Placement::Element => Node::Element(Element::leaf(tag.name, tag.namespace, text)),
        Placement::Attribute => {
            Node::Attribute(Attribute::new(tag.name, text).with_namespace(tag.namespace))
        }
    }))
}

/// Reads a leaf from `parent`, falling back to the codec default when absent.
pub(super) fn deserialize(
    cx: &Context<'_>,
    field: &FieldDescriptor,
    parent: &Element,
) -> Result<FieldValue, Cause> {
    let tag = field.tag.ok_or(Cause::MissingTag)?;
    let text = match tag.placement {
        Placement::Element => parent.value_of(tag.name),
        Placement::Attribute => parent.attribute(tag.name),
    };

    match text {
        Some(text) => Ok(FieldValue::Primitive(
            cx.codec.from_text(text, field.kind, cx.options)?,
        )),
        None if field.optional => Ok(FieldValue::Null),
        None if cx.options.strict_required && field.occurrence == Occurrence::Required => {
            Err(Cause::MissingNode {
                tag: tag.name.to_string(),
            })
        }
        None => Ok(FieldValue::Primitive(cx.codec.default_for(field.kind))),
    }
}

/// Renders one element of a primitive sequence.
pub(super) fn serialize_item(
    cx: &Context<'_>,
    field: &FieldDescriptor,
    value: Primitive,
) -> Result<String, Cause> {
    Ok(cx.codec.to_text(&value, field.kind, cx.options)?)
}

fn check_length(cx: &Context<'_>, owner: &TypeDescriptor, field: &FieldDescriptor, text: &str) {
    let length = text.chars().count();
    if length == 0 {
        if field.occurrence == Occurrence::Required {
            cx.alert(owner, field, AlertKind::RequiredEmpty);
        }
        return;
    }
    if length < field.min {
        cx.alert(owner, field, AlertKind::TooShort { length, min: field.min });
    }
    if field.max > 0 && length > field.max {
        cx.alert(owner, field, AlertKind::TooLong { length, max: field.max });
    }
}
