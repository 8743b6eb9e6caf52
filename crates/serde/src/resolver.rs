//! Resolution of concrete types for polymorphic slots.

use std::collections::HashMap;

use tracing::debug;

use crate::metadata::TypeDescriptor;
use crate::object::{DfeInterface, DfeType};

/// Maps an element name found under an interface slot to a concrete type.
pub trait TypeResolver: Send + Sync {
    fn resolve(&self, interface: &str, tag: &str) -> Option<&'static TypeDescriptor>;
}

/// Registry of interface implementors, keyed by their accepted root names.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    interfaces: HashMap<&'static str, Vec<&'static TypeDescriptor>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, interface: &'static str, descriptor: &'static TypeDescriptor) -> &mut Self {
        debug!(
            interface,
            type_name = descriptor.name,
            tags = ?descriptor.root_names(),
            "registering implementor"
        );
        let implementors = self.interfaces.entry(interface).or_default();
        if !implementors.iter().any(|known| std::ptr::eq(*known, descriptor)) {
            implementors.push(descriptor);
        }
        self
    }

    pub fn register_type<T: DfeType>(&mut self, interface: &'static str) -> &mut Self {
        self.register(interface, T::type_descriptor())
    }

    /// Registers every implementor listed for `I`.
    pub fn register_interface<I: DfeInterface + ?Sized>(&mut self) -> &mut Self {
        for descriptor in I::implementors() {
            self.register(I::NAME, descriptor);
        }
        self
    }

    pub fn with_interface<I: DfeInterface + ?Sized>(mut self) -> Self {
        self.register_interface::<I>();
        self
    }

    pub fn implementors(&self, interface: &str) -> &[&'static TypeDescriptor] {
        self.interfaces
            .get(interface)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve(&self, interface: &str, tag: &str) -> Option<&'static TypeDescriptor> {
        self.implementors(interface)
            .iter()
            .copied()
            .find(|descriptor| descriptor.accepts(tag))
    }
}
