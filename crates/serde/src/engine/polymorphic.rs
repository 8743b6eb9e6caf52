use tracing::{debug, trace};

use super::{Context, absent_object, deserialize_object, serialize_object};
use crate::error::{Cause, MappingError};
use crate::metadata::{FieldDescriptor, TypeDescriptor};
use crate::tree::{Element, Node};
use crate::value::{FieldRef, FieldValue, ValueError};

/// Writes an interface-typed value under its runtime type's root name.
pub(super) fn serialize_value(
    cx: &Context<'_>,
    value: FieldRef<'_>,
) -> Result<Option<Node>, MappingError> {
    match value {
        FieldRef::Null => Ok(None),
        FieldRef::Object(object) => {
            let descriptor = object.descriptor();
            trace!(type_name = descriptor.name, element = descriptor.root_name(), "runtime type");
            Ok(Some(Node::Element(serialize_object(
                cx,
                object,
                descriptor.root_name(),
                descriptor.root_namespace(),
            )?)))
        }
        other => Err(ValueError::Mismatch {
            expected: "object",
            found: other.describe(),
        }
        .into()),
    }
}

/// Writes a root-marked value under the declared type's root name.
pub(super) fn serialize_root(
    cx: &Context<'_>,
    declared: &TypeDescriptor,
    value: FieldRef<'_>,
) -> Result<Option<Node>, MappingError> {
    match value {
        FieldRef::Null => Ok(None),
        FieldRef::Object(object) => Ok(Some(Node::Element(serialize_object(
            cx,
            object,
            declared.root_name(),
            declared.root_namespace(),
        )?))),
        other => Err(ValueError::Mismatch {
            expected: "object",
            found: other.describe(),
        }
        .into()),
    }
}

/// First child of `parent` whose name resolves to an implementor of `interface`.
pub(super) fn resolve_child<'e>(
    cx: &Context<'_>,
    interface: &str,
    parent: &'e Element,
) -> Option<(&'static TypeDescriptor, &'e Element)> {
    parent.children.iter().find_map(|child| {
        cx.resolver
            .resolve(interface, &child.name)
            .map(|descriptor| (descriptor, child))
    })
}

pub(super) fn deserialize_interface(
    cx: &Context<'_>,
    field: &FieldDescriptor,
    interface: &'static str,
    parent: &Element,
) -> Result<FieldValue, MappingError> {
    match resolve_child(cx, interface, parent) {
        Some((descriptor, child)) => {
            debug!(interface, type_name = descriptor.name, element = %child.name, "resolved implementor");
            Ok(FieldValue::Object(deserialize_object(cx, descriptor, Some(child))?))
        }
        None if field.optional => Ok(FieldValue::Null),
        None => Err(Cause::Unresolved { interface }.into()),
    }
}

/// Finds the child named after one of the declared type's root names.
pub(super) fn deserialize_root(
    cx: &Context<'_>,
    field: &FieldDescriptor,
    declared: &'static TypeDescriptor,
    parent: &Element,
) -> Result<FieldValue, MappingError> {
    match parent.children.iter().find(|child| declared.accepts(&child.name)) {
        Some(child) => Ok(FieldValue::Object(deserialize_object(cx, declared, Some(child))?)),
        None => absent_object(cx, field, declared, declared.root_name()),
    }
}
