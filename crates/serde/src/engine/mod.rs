//! The recursive mapping engine.
//!
//! [`serialize_object`] and [`deserialize_object`] walk a type's descriptors
//! in order and dispatch each field on its [`Classification`]. Nested
//! objects recurse back into them. Errors are annotated with the field and
//! object they passed through on the way out.

mod collection;
mod dictionary;
mod polymorphic;
mod primitive;

use std::cell::RefCell;

use tracing::{debug, trace, warn};

use crate::alert::{Alert, AlertKind};
use crate::classify::{Classification, classify};
use crate::codec::PrimitiveCodec;
use crate::error::{Cause, Direction, MappingError};
use crate::metadata::{FieldDescriptor, Occurrence, Tag, TypeDescriptor};
use crate::object::DfeObject;
use crate::options::SerializerOptions;
use crate::resolver::TypeResolver;
use crate::tree::{Element, Node};
use crate::value::{FieldRef, FieldValue, ValueError};

/// Collaborators and per-call state shared by every mapper.
pub struct Context<'a> {
    pub options: &'a SerializerOptions,
    pub codec: &'a dyn PrimitiveCodec,
    pub resolver: &'a dyn TypeResolver,
    alerts: RefCell<Vec<Alert>>,
}

impl<'a> Context<'a> {
    pub fn new(
        options: &'a SerializerOptions,
        codec: &'a dyn PrimitiveCodec,
        resolver: &'a dyn TypeResolver,
    ) -> Self {
        Context {
            options,
            codec,
            resolver,
            alerts: RefCell::new(Vec::new()),
        }
    }

    pub fn into_alerts(self) -> Vec<Alert> {
        self.alerts.into_inner()
    }

    fn alert(&self, owner: &TypeDescriptor, field: &FieldDescriptor, kind: AlertKind) {
        if !self.options.collect_alerts {
            return;
        }
        let alert = Alert {
            id: field.id,
            tag: field.tag.map(|tag| tag.name).unwrap_or(field.name),
            type_name: owner.name,
            field: field.name,
            kind,
        };
        warn!(alert = %alert, "schema alert");
        self.alerts.borrow_mut().push(alert);
    }
}

/// Serializes `object` into an element named `name`.
pub fn serialize_object(
    cx: &Context<'_>,
    object: &dyn DfeObject,
    name: &str,
    namespace: Option<&str>,
) -> Result<Element, MappingError> {
    let descriptor = object.descriptor();
    debug!(type_name = descriptor.name, element = name, "serializing object");

    let mut element = Element::new(name, namespace);
    for field in descriptor.ordered_fields() {
        if !object.should_serialize(field.name) {
            trace!(field = field.name, "skipped by should_serialize");
            continue;
        }
        let nodes = serialize_field(cx, descriptor, object, field)
            .map_err(|e| e.in_field(Direction::Serialize, descriptor.name, field.name))
            .map_err(|e| e.in_object(Direction::Serialize, descriptor.name, || format!("{:?}", object)))?;
        for node in nodes {
            element.push(node);
        }
    }
    Ok(element)
}

/// Builds an instance of `descriptor` from `element`.
///
/// An absent element yields the bare instance from the type's factory.
pub fn deserialize_object(
    cx: &Context<'_>,
    descriptor: &'static TypeDescriptor,
    element: Option<&Element>,
) -> Result<Box<dyn DfeObject>, MappingError> {
    let mut object = descriptor.create();
    let Some(element) = element else {
        trace!(type_name = descriptor.name, "no element, bare instance");
        return Ok(object);
    };
    debug!(type_name = descriptor.name, element = %element.name, "deserializing object");

    for field in descriptor.fields.iter().filter(|field| !field.ignore) {
        let instance = || format!("<{}>", element.name);
        let value = deserialize_field(cx, field, element)
            .map_err(|e| e.in_field(Direction::Deserialize, descriptor.name, field.name))
            .map_err(|e| e.in_object(Direction::Deserialize, descriptor.name, instance))?;
        object
            .set_field(field.name, value)
            .map_err(|e| {
                MappingError::from(e)
                    .in_field(Direction::Deserialize, descriptor.name, field.name)
                    .in_object(Direction::Deserialize, descriptor.name, instance)
            })?;
    }
    Ok(object)
}

fn serialize_field(
    cx: &Context<'_>,
    owner: &'static TypeDescriptor,
    object: &dyn DfeObject,
    field: &'static FieldDescriptor,
) -> Result<Vec<Node>, MappingError> {
    let classification = classify(field);
    trace!(field = field.name, classification = classification.name(), "serializing field");
    let value = object
        .field(field.name)
        .ok_or_else(|| ValueError::UnknownField(field.name.to_string()))?;

    match classification {
        Classification::Dictionary { value: value_class, .. } => {
            dictionary::serialize(cx, field, &value_class, value)
        }
        Classification::List(item) | Classification::Array(item) | Classification::Enumerable(item) => {
            collection::serialize(cx, owner, field, &item, value)
        }
        Classification::Interface(_) => {
            let node = polymorphic::serialize_value(cx, value)?;
            if node.is_none() && required_slot(field) {
                cx.alert(owner, field, AlertKind::RequiredMissing);
            }
            Ok(node.into_iter().collect())
        }
        Classification::Class(_) => serialize_class(cx, owner, field, value),
        Classification::Root(descriptor) => {
            let node = polymorphic::serialize_root(cx, descriptor(), value)?;
            if node.is_none() && required_slot(field) {
                cx.alert(owner, field, AlertKind::RequiredMissing);
            }
            Ok(node.into_iter().collect())
        }
        Classification::Primitive => {
            Ok(primitive::serialize(cx, owner, field, value)?.into_iter().collect())
        }
    }
}

fn deserialize_field(
    cx: &Context<'_>,
    field: &'static FieldDescriptor,
    parent: &Element,
) -> Result<FieldValue, MappingError> {
    let classification = classify(field);
    trace!(field = field.name, classification = classification.name(), "deserializing field");

    match classification {
        Classification::Dictionary {
            key,
            value,
            optional_values,
        } => dictionary::deserialize(cx, field, &key, &value, optional_values, parent),
        Classification::List(item) | Classification::Array(item) | Classification::Enumerable(item) => {
            collection::deserialize(cx, field, &item, parent)
        }
        Classification::Interface(interface) => {
            polymorphic::deserialize_interface(cx, field, interface, parent)
        }
        Classification::Class(descriptor) => {
            let tag = element_tag(field)?;
            match parent.child(tag.name) {
                Some(child) => Ok(FieldValue::Object(deserialize_object(cx, descriptor(), Some(child))?)),
                None => absent_object(cx, field, descriptor(), tag.name),
            }
        }
        Classification::Root(descriptor) => {
            polymorphic::deserialize_root(cx, field, descriptor(), parent)
        }
        Classification::Primitive => Ok(primitive::deserialize(cx, field, parent)?),
    }
}

fn serialize_class(
    cx: &Context<'_>,
    owner: &'static TypeDescriptor,
    field: &'static FieldDescriptor,
    value: FieldRef<'_>,
) -> Result<Vec<Node>, MappingError> {
    let tag = element_tag(field)?;
    match value {
        FieldRef::Null => {
            if required_slot(field) {
                cx.alert(owner, field, AlertKind::RequiredMissing);
            }
            Ok(Vec::new())
        }
        FieldRef::Object(object) => Ok(vec![Node::Element(serialize_object(
            cx,
            object,
            tag.name,
            tag.namespace,
        )?)]),
        other => Err(ValueError::Mismatch {
            expected: "object",
            found: other.describe(),
        }
        .into()),
    }
}

/// Value for an object-valued field whose node is absent.
fn absent_object(
    cx: &Context<'_>,
    field: &FieldDescriptor,
    descriptor: &'static TypeDescriptor,
    tag: &str,
) -> Result<FieldValue, MappingError> {
    if field.optional {
        return Ok(FieldValue::Null);
    }
    if cx.options.strict_required && field.occurrence == Occurrence::Required {
        return Err(Cause::MissingNode {
            tag: tag.to_string(),
        }
        .into());
    }
    Ok(FieldValue::Object(deserialize_object(cx, descriptor, None)?))
}

fn required_slot(field: &FieldDescriptor) -> bool {
    field.occurrence == Occurrence::Required
}

/// The field's element tag, required for anything written as a child element.
fn element_tag(field: &FieldDescriptor) -> Result<Tag, Cause> {
    match field.tag {
        Some(tag) => Ok(tag),
        None => Err(Cause::MissingTag),
    }
}
