//! Object traits implemented by mapped types.
//!
//! [`DfeObject`] is object safe, so the engine walks heterogeneous graphs
//! through `&dyn DfeObject`. `#[derive(DfeObject)]` implements it together
//! with [`DfeType`] and [`FieldType`](crate::FieldType).

use std::any::Any;
use std::fmt::Debug;

use crate::metadata::TypeDescriptor;
use crate::value::{FieldRef, FieldValue, ValueError};

/// Reflective access to a mapped object.
pub trait DfeObject: Any + Debug {
    fn descriptor(&self) -> &'static TypeDescriptor;

    /// Reads a mapped field by its Rust name.
    fn field(&self, name: &str) -> Option<FieldRef<'_>>;

    /// Writes a mapped field by its Rust name.
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), ValueError>;

    /// Per-instance predicate consulted before a field is serialized.
    fn should_serialize(&self, _field: &str) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn as_object(&self) -> &dyn DfeObject;
}

/// Static side of a mapped type.
pub trait DfeType: DfeObject + Sized {
    fn type_descriptor() -> &'static TypeDescriptor;
}

/// A trait whose boxed implementors fill polymorphic slots.
///
/// Implemented for `dyn Trait` by [`dfe_interface!`](crate::dfe_interface).
pub trait DfeInterface {
    const NAME: &'static str;

    fn implementors() -> Vec<&'static TypeDescriptor>;
}

/// Moves a boxed object out into its concrete type.
pub fn downcast<T: DfeObject>(object: Box<dyn DfeObject>) -> Result<T, ValueError> {
    let found = object.descriptor().name;
    object
        .into_any()
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| ValueError::Mismatch {
            expected: std::any::type_name::<T>(),
            found,
        })
}

/// Conversion used by derived [`FieldType`](crate::FieldType) impls.
///
/// A null value yields the type's bare instance.
pub fn object_from_value<T: DfeType>(value: FieldValue) -> Result<T, ValueError> {
    match value {
        FieldValue::Object(object) => downcast(object),
        FieldValue::Null => downcast(T::type_descriptor().create()),
        other => Err(ValueError::Mismatch {
            expected: T::type_descriptor().name,
            found: other.describe(),
        }),
    }
}

/// Declares a trait as a polymorphic slot and lists its implementors.
///
/// The trait must have [`DfeObject`] as a supertrait. `Box<dyn Trait>` then
/// becomes a field type classified as an interface, and deserialized objects
/// are converted back by trying each listed implementor.
///
/// ```ignore
/// pub trait CfePis: DfeObject {}
/// impl CfePis for ImpostoPisAliq {}
/// impl CfePis for ImpostoPisNt {}
///
/// dfe_interface!(CfePis => ImpostoPisAliq, ImpostoPisNt);
/// ```
#[macro_export]
macro_rules! dfe_interface {
    ($trait_:ident => $($ty:ty),+ $(,)?) => {
        impl $crate::DfeInterface for dyn $trait_ {
            const NAME: &'static str = stringify!($trait_);

            fn implementors() -> ::std::vec::Vec<&'static $crate::TypeDescriptor> {
                ::std::vec![$(<$ty as $crate::DfeType>::type_descriptor()),+]
            }
        }

        impl $crate::FieldType for ::std::boxed::Box<dyn $trait_> {
            fn classification() -> $crate::Classification {
                $crate::Classification::Interface(stringify!($trait_))
            }

            fn to_field_ref(&self) -> $crate::FieldRef<'_> {
                $crate::FieldRef::Object($crate::DfeObject::as_object(&**self))
            }

            fn from_field_value(
                value: $crate::FieldValue,
            ) -> ::std::result::Result<Self, $crate::ValueError> {
                match value {
                    $crate::FieldValue::Object(object) => {
                        let found = $crate::DfeObject::descriptor(&*object).name;
                        let any = $crate::DfeObject::into_any(object);
                        $(
                            let any = match any.downcast::<$ty>() {
                                ::std::result::Result::Ok(concrete) => {
                                    return ::std::result::Result::Ok(concrete as ::std::boxed::Box<dyn $trait_>);
                                }
                                ::std::result::Result::Err(any) => any,
                            };
                        )+
                        drop(any);
                        ::std::result::Result::Err($crate::ValueError::Mismatch {
                            expected: stringify!($trait_),
                            found,
                        })
                    }
                    other => ::std::result::Result::Err($crate::ValueError::Mismatch {
                        expected: stringify!($trait_),
                        found: other.describe(),
                    }),
                }
            }
        }
    };
}
