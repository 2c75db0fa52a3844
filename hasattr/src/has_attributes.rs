use crate::{
    atom::Atom,
    error::AttributeError,
    schema::Schema,
    store::AttributeStore,
    value::{FromValue, Value},
};
use indexmap::IndexMap;
use std::sync::Arc;

/// Trait implemented by types that carry dynamic attributes.
///
/// Implementors hand out their `AttributeStore`; the provided methods forward to it, so
/// `obj.set_attribute(..)` and `obj.get_attribute(..)` act as the object's dynamic properties.
/// Writes are always validated against `Self::schema()`, whatever schema the store itself was
/// built with. Usually derived with `#[derive(HasAttributes)]`.
pub trait HasAttributes {
    /// Schema shared by every instance of the type. `None` disables validation.
    fn schema() -> Option<Arc<Schema>>
    where
        Self: Sized,
    {
        None
    }

    fn attribute_store(&self) -> &AttributeStore;

    fn attribute_store_mut(&mut self) -> &mut AttributeStore;

    /// Creates a store bound to the type's schema, holding the initial attributes.
    fn new_attribute_store<I, K, V>(initial: I) -> Result<AttributeStore, AttributeError>
    where
        Self: Sized,
        I: IntoIterator<Item = (K, V)>,
        K: Into<Atom>,
        V: Into<Value>,
    {
        AttributeStore::from_attributes(Self::schema(), initial)
    }

    fn set_attribute(&mut self, key: impl Into<Atom>, value: impl Into<Value>) -> Result<(), AttributeError>
    where
        Self: Sized,
    {
        let schema = Self::schema();
        self.attribute_store_mut()
            .set_attribute_under(schema.as_ref(), key.into(), value.into())
    }

    fn set_attributes<I, K, V>(&mut self, attributes: I) -> Result<(), AttributeError>
    where
        Self: Sized,
        I: IntoIterator<Item = (K, V)>,
        K: Into<Atom>,
        V: Into<Value>,
    {
        let schema = Self::schema();
        self.attribute_store_mut().set_attributes_under(schema.as_ref(), attributes)
    }

    fn get_attribute(&self, key: impl Into<Atom>) -> Option<&Value>
    where
        Self: Sized,
    {
        self.attribute_store().get_attribute(key)
    }

    fn get_attribute_or(&self, key: impl Into<Atom>, default: impl Into<Value>) -> Value
    where
        Self: Sized,
    {
        self.attribute_store().get_attribute_or(key, default)
    }

    fn get_attributes<I, K>(&self, keys: I) -> IndexMap<Atom, Value>
    where
        Self: Sized,
        I: IntoIterator<Item = K>,
        K: Into<Atom>,
    {
        self.attribute_store().get_attributes(keys)
    }

    fn get_as<T: FromValue>(&self, key: impl Into<Atom>) -> Option<T>
    where
        Self: Sized,
    {
        self.attribute_store().get_as(key)
    }
}
