use tracing::trace;

use super::{Context, deserialize_object, element_tag, polymorphic, primitive, serialize_object};
use crate::alert::AlertKind;
use crate::classify::Classification;
use crate::error::{Cause, MappingError};
use crate::metadata::{FieldDescriptor, TypeDescriptor};
use crate::tree::{Element, Node};
use crate::value::{FieldRef, FieldValue, ValueError};

/// Writes one node per element, repeating the field's tag.
pub(super) fn serialize(
    cx: &Context<'_>,
    owner: &TypeDescriptor,
    field: &FieldDescriptor,
    item: &Classification,
    value: FieldRef<'_>,
) -> Result<Vec<Node>, MappingError> {
    let items = match value {
        FieldRef::Null => Vec::new(),
        FieldRef::Sequence(items) => items,
        other => {
            return Err(ValueError::Mismatch {
                expected: "sequence",
                found: other.describe(),
            }
            .into());
        }
    };
    check_count(cx, owner, field, items.len());
    trace!(field = field.name, count = items.len(), "serializing sequence");

    let mut nodes = Vec::with_capacity(items.len());
    for (index, entry) in items.into_iter().enumerate() {
        if let Some(node) = serialize_item(cx, field, item, entry).map_err(|e| e.at_index(index))? {
            nodes.push(node);
        }
    }
    Ok(nodes)
}

fn serialize_item(
    cx: &Context<'_>,
    field: &FieldDescriptor,
    item: &Classification,
    value: FieldRef<'_>,
) -> Result<Option<Node>, MappingError> {
    match item {
        Classification::Interface(_) => polymorphic::serialize_value(cx, value),
        Classification::Root(descriptor) if !field.has_element_tag() => {
            polymorphic::serialize_root(cx, descriptor(), value)
        }
        Classification::Class(_) | Classification::Root(_) => {
            let tag = element_tag(field)?;
            match value {
                FieldRef::Null => Ok(None),
                FieldRef::Object(object) => Ok(Some(Node::Element(serialize_object(
                    cx,
                    object,
                    tag.name,
                    tag.namespace,
                )?))),
                other => Err(ValueError::Mismatch {
                    expected: "object",
                    found: other.describe(),
                }
                .into()),
            }
        }
        Classification::Primitive => {
            let tag = element_tag(field)?;
            match value {
                FieldRef::Null => Ok(None),
                FieldRef::Primitive(p) => {
                    let text = primitive::serialize_item(cx, field, p)?;
                    Ok(Some(Node::Element(Element::leaf(tag.name, tag.namespace, text))))
                }
                other => Err(ValueError::Mismatch {
                    expected: "primitive",
                    found: other.describe(),
                }
                .into()),
            }
        }
        nested => Err(Cause::UnsupportedItem(nested.name()).into()),
    }
}

/// Collects every child carrying the field's tag, or resolvable for an interface.
///
/// An optional field with no matching child reads back as absent.
pub(super) fn deserialize(
    cx: &Context<'_>,
    field: &FieldDescriptor,
    item: &Classification,
    parent: &Element,
) -> Result<FieldValue, MappingError> {
    let mut values = Vec::new();
    match item {
        Classification::Interface(interface) => {
            let resolved = parent.children.iter().filter_map(|child| {
                cx.resolver
                    .resolve(interface, &child.name)
                    .map(|descriptor| (descriptor, child))
            });
            for (index, (descriptor, child)) in resolved.enumerate() {
                let object = deserialize_object(cx, descriptor, Some(child))
                    .map_err(|e| e.at_index(index))?;
                values.push(FieldValue::Object(object));
            }
        }
        Classification::Root(descriptor) if !field.has_element_tag() => {
            let descriptor = descriptor();
            let children = parent.children.iter().filter(|child| descriptor.accepts(&child.name));
            for (index, child) in children.enumerate() {
                let object = deserialize_object(cx, descriptor, Some(child))
                    .map_err(|e| e.at_index(index))?;
                values.push(FieldValue::Object(object));
            }
        }
        Classification::Class(descriptor) | Classification::Root(descriptor) => {
            let tag = element_tag(field)?;
            for (index, child) in parent.children_named(tag.name).enumerate() {
                let object = deserialize_object(cx, descriptor(), Some(child))
                    .map_err(|e| e.at_index(index))?;
                values.push(FieldValue::Object(object));
            }
        }
        Classification::Primitive => {
            let tag = element_tag(field)?;
            for (index, child) in parent.children_named(tag.name).enumerate() {
                let value = cx
                    .codec
                    .from_text(child.text(), field.kind, cx.options)
                    .map_err(|e| MappingError::from(e).at_index(index))?;
                values.push(FieldValue::Primitive(value));
            }
        }
        nested => return Err(Cause::UnsupportedItem(nested.name()).into()),
    }
    trace!(field = field.name, count = values.len(), "deserialized sequence");
    if field.optional && values.is_empty() {
        return Ok(FieldValue::Null);
    }
    Ok(FieldValue::Sequence(values))
}

fn check_count(cx: &Context<'_>, owner: &TypeDescriptor, field: &FieldDescriptor, count: usize) {
    if count < field.min {
        cx.alert(owner, field, AlertKind::TooFew { count, min: field.min });
    }
    if field.max > 0 && count > field.max {
        cx.alert(owner, field, AlertKind::TooMany { count, max: field.max });
    }
}
