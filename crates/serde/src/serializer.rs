//! Entry point tying options, codec and type resolution to the engine.

use std::fmt;

use tracing::{debug, info};

use crate::alert::Alert;
use crate::codec::{DefaultCodec, PrimitiveCodec};
use crate::engine::{self, Context};
use crate::error::{Cause, DfeError, Direction, MappingError};
use crate::metadata::TypeDescriptor;
use crate::object::{DfeInterface, DfeObject, DfeType, downcast};
use crate::options::SerializerOptions;
use crate::resolver::{TypeRegistry, TypeResolver};
use crate::tree::Element;

/// Serializes mapped objects to [`Element`] trees and back.
///
/// The serializer holds no per-call state and can be shared between threads.
///
/// ```ignore
/// let serializer = DfeSerializer::new(SerializerOptions::default())
///     .with_registry(TypeRegistry::new().with_interface::<dyn CfePis>());
///
/// let element = serializer.serialize(&cfe)?;
/// let back: Cfe = serializer.deserialize(&element)?;
/// ```
pub struct DfeSerializer {
    options: SerializerOptions,
    codec: Box<dyn PrimitiveCodec>,
    resolver: Box<dyn TypeResolver>,
}

impl fmt::Debug for DfeSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DfeSerializer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for DfeSerializer {
    fn default() -> Self {
        Self::new(SerializerOptions::default())
    }
}

impl DfeSerializer {
    pub fn new(options: SerializerOptions) -> Self {
        Self {
            options,
            codec: Box::new(DefaultCodec),
            resolver: Box::new(TypeRegistry::new()),
        }
    }

    /// Like [`new`](Self::new), rejecting invalid options.
    pub fn try_new(options: SerializerOptions) -> Result<Self, DfeError> {
        options.validate().map_err(DfeError::Options)?;
        Ok(Self::new(options))
    }

    pub fn with_codec(mut self, codec: impl PrimitiveCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    pub fn with_resolver(mut self, resolver: impl TypeResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_registry(self, registry: TypeRegistry) -> Self {
        self.with_resolver(registry)
    }

    /// Shorthand for a registry holding the implementors of `I`.
    pub fn with_interface<I: DfeInterface + ?Sized>(self) -> Self {
        self.with_registry(TypeRegistry::new().with_interface::<I>())
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    fn context(&self) -> Context<'_> {
        Context::new(&self.options, self.codec.as_ref(), self.resolver.as_ref())
    }

    /// Serializes `value` under its root name.
    pub fn serialize<T: DfeType>(&self, value: &T) -> Result<Element, MappingError> {
        self.serialize_with_alerts(value).map(|(element, _)| element)
    }

    /// Serializes `value` and returns the alerts raised along the way.
    pub fn serialize_with_alerts<T: DfeType>(
        &self,
        value: &T,
    ) -> Result<(Element, Vec<Alert>), MappingError> {
        let descriptor = T::type_descriptor();
        let cx = self.context();
        let element =
            engine::serialize_object(&cx, value, descriptor.root_name(), descriptor.root_namespace())?;
        let alerts = cx.into_alerts();
        info!(
            type_name = descriptor.name,
            element = %element.name,
            alerts = alerts.len(),
            "serialized document"
        );
        Ok((element, alerts))
    }

    /// Serializes any mapped object under an explicit element name.
    pub fn serialize_as(
        &self,
        value: &dyn DfeObject,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<Element, MappingError> {
        let cx = self.context();
        engine::serialize_object(&cx, value, name, namespace)
    }

    /// Deserializes a `T` from `element`.
    ///
    /// For root-marked types the element may be the root itself or its parent,
    /// such as a response envelope wrapping the document.
    pub fn deserialize<T: DfeType>(&self, element: &Element) -> Result<T, MappingError> {
        let descriptor = T::type_descriptor();
        let root = find_root(descriptor, element)?;
        let object = self.deserialize_as(descriptor, Some(root))?;
        downcast(object).map_err(|e| {
            MappingError::from(e).in_object(Direction::Deserialize, descriptor.name, || {
                format!("<{}>", root.name)
            })
        })
    }

    /// Deserializes an instance of `descriptor`, or its bare instance when `element` is absent.
    pub fn deserialize_as(
        &self,
        descriptor: &'static TypeDescriptor,
        element: Option<&Element>,
    ) -> Result<Box<dyn DfeObject>, MappingError> {
        let cx = self.context();
        let object = engine::deserialize_object(&cx, descriptor, element)?;
        debug!(type_name = descriptor.name, "deserialized document");
        Ok(object)
    }

    /// Serializes `value` to XML text.
    #[cfg(feature = "xml")]
    pub fn to_xml_string<T: DfeType>(&self, value: &T) -> crate::Result<String> {
        let element = self.serialize(value)?;
        crate::xml::to_xml_string(&element, &self.options)
    }

    /// Deserializes a `T` from XML text.
    #[cfg(feature = "xml")]
    pub fn from_xml_str<T: DfeType>(&self, xml: &str) -> crate::Result<T> {
        let element = crate::xml::from_xml_str(xml)?;
        Ok(self.deserialize(&element)?)
    }
}

fn find_root<'e>(
    descriptor: &'static TypeDescriptor,
    element: &'e Element,
) -> Result<&'e Element, MappingError> {
    if !descriptor.is_root() || descriptor.accepts(&element.name) {
        return Ok(element);
    }
    if let Some(child) = element
        .children
        .iter()
        .find(|child| descriptor.accepts(&child.name))
    {
        debug!(type_name = descriptor.name, parent = %element.name, "root found one level down");
        return Ok(child);
    }
    Err(MappingError::from(Cause::RootMismatch {
        type_name: descriptor.name,
        found: element.name.clone(),
        expected: descriptor.root_names().join(", "),
    })
    .in_object(Direction::Deserialize, descriptor.name, || {
        format!("<{}>", element.name)
    }))
}
