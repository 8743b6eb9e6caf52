use dfe_serde_support::Primitive;
use tracing::trace;

use super::{Context, deserialize_object, polymorphic, serialize_object};
use crate::classify::Classification;
use crate::error::{Cause, MappingError};
use crate::metadata::{DictionaryDescriptor, EntryDescriptor, FieldDescriptor, Occurrence};
use crate::tree::{Attribute, Element, Node};
use crate::value::{FieldRef, FieldValue, ValueError};

/// Writes `<tag><item key="k"><value>v</value></item>..</tag>`.
pub(super) fn serialize(
    cx: &Context<'_>,
    field: &FieldDescriptor,
    value_class: &Classification,
    value: FieldRef<'_>,
) -> Result<Vec<Node>, MappingError> {
    let meta = field.dictionary.ok_or(Cause::MissingDictionary)?;
    let entries = match value {
        FieldRef::Null => return Ok(Vec::new()),
        FieldRef::Map(entries) => entries,
        other => {
            return Err(ValueError::Mismatch {
                expected: "map",
                found: other.describe(),
            }
            .into());
        }
    };
    if entries.is_empty() && field.occurrence == Occurrence::OptionalIfNull {
        return Ok(Vec::new());
    }
    trace!(field = field.name, count = entries.len(), "serializing dictionary");

    let mut wrapper = Element::new(meta.tag, meta.namespace);
    for (key, value) in entries {
        let key_text = key_text(cx, &meta.key, key)?;
        let item = serialize_entry(cx, &meta, value_class, &key_text, value)
            .map_err(|e| e.at_key(key_text.as_str()))?;
        wrapper.children.push(item);
    }
    Ok(vec![Node::Element(wrapper)])
}

fn key_text(
    cx: &Context<'_>,
    key: &EntryDescriptor,
    value: FieldRef<'_>,
) -> Result<String, MappingError> {
    match value {
        FieldRef::Primitive(p) => Ok(cx.codec.to_text(&p, key.kind, cx.options)?),
        other => Err(ValueError::Mismatch {
            expected: "primitive key",
            found: other.describe(),
        }
        .into()),
    }
}

fn serialize_entry(
    cx: &Context<'_>,
    meta: &DictionaryDescriptor,
    value_class: &Classification,
    key_text: &str,
    value: FieldRef<'_>,
) -> Result<Element, MappingError> {
    let mut item = Element::new(meta.item_tag, meta.namespace);
    if meta.key.as_attribute {
        item.attributes
            .push(Attribute::new(meta.key.tag, key_text).with_namespace(meta.key.namespace));
    } else {
        item.children
            .push(Element::leaf(meta.key.tag, meta.key.namespace, key_text));
    }

    let node = match (value_class, value) {
        (_, FieldRef::Null) => None,
        (Classification::Primitive, FieldRef::Primitive(p)) => {
            let text = cx.codec.to_text(&p, meta.value.kind, cx.options)?;
            Some(Node::Element(Element::leaf(meta.value.tag, meta.value.namespace, text)))
        }
        (Classification::Interface(_), value) => polymorphic::serialize_value(cx, value)?,
        (Classification::Class(_) | Classification::Root(_), FieldRef::Object(object)) => Some(
            Node::Element(serialize_object(cx, object, meta.value.tag, meta.value.namespace)?),
        ),
        (Classification::Primitive | Classification::Class(_) | Classification::Root(_), other) => {
            return Err(ValueError::Mismatch {
                expected: value_class.name(),
                found: other.describe(),
            }
            .into());
        }
        (nested, _) => return Err(Cause::UnsupportedItem(nested.name()).into()),
    };
    if let Some(node) = node {
        item.push(node);
    }
    Ok(item)
}

/// Reads every item under the wrapper element back into key/value pairs.
pub(super) fn deserialize(
    cx: &Context<'_>,
    field: &FieldDescriptor,
    key_class: &Classification,
    value_class: &Classification,
    optional_values: bool,
    parent: &Element,
) -> Result<FieldValue, MappingError> {
    let meta = field.dictionary.ok_or(Cause::MissingDictionary)?;
    if !matches!(key_class, Classification::Primitive) {
        return Err(Cause::UnsupportedItem(key_class.name()).into());
    }
    let Some(wrapper) = parent.child(meta.tag) else {
        return Ok(if field.optional {
            FieldValue::Null
        } else {
            FieldValue::Map(Vec::new())
        });
    };

    let mut entries = Vec::new();
    for item in wrapper.children_named(meta.item_tag) {
        let key_text = match meta.key.as_attribute {
            true => item.attribute(meta.key.tag),
            false => item.child(meta.key.tag).map(Element::text),
        };
        let key_text = key_text.ok_or_else(|| Cause::MissingNode {
            tag: meta.key.tag.to_string(),
        })?;
        let key = cx.codec.from_text(key_text, meta.key.kind, cx.options)?;
        let value = deserialize_entry(cx, &meta, value_class, optional_values, item)
            .map_err(|e| e.at_key(key_text))?;
        entries.push((FieldValue::Primitive(key), value));
    }
    trace!(field = field.name, count = entries.len(), "deserialized dictionary");
    Ok(FieldValue::Map(entries))
}

/// A missing value element reads as absent when `V` admits absence, and as
/// the kind's default (or a bare object) otherwise.
fn deserialize_entry(
    cx: &Context<'_>,
    meta: &DictionaryDescriptor,
    value_class: &Classification,
    optional_values: bool,
    item: &Element,
) -> Result<FieldValue, MappingError> {
    let child = item.child(meta.value.tag);
    match value_class {
        Classification::Primitive => {
            let value: Primitive = match child {
                Some(child) => cx.codec.from_text(child.text(), meta.value.kind, cx.options)?,
                None if optional_values => return Ok(FieldValue::Null),
                None => cx.codec.default_for(meta.value.kind),
            };
            Ok(FieldValue::Primitive(value))
        }
        Classification::Class(_) | Classification::Root(_)
            if child.is_none() && optional_values =>
        {
            Ok(FieldValue::Null)
        }
        Classification::Class(descriptor) | Classification::Root(descriptor) => {
            Ok(FieldValue::Object(deserialize_object(cx, descriptor(), child)?))
        }
        Classification::Interface(interface) => {
            match polymorphic::resolve_child(cx, interface, item) {
                Some((descriptor, child)) => {
                    Ok(FieldValue::Object(deserialize_object(cx, descriptor, Some(child))?))
                }
                None => Ok(FieldValue::Null),
            }
        }
        nested => Err(Cause::UnsupportedItem(nested.name()).into()),
    }
}
