//! Object values.
//!
//! An `Object` is a shared instance of some Rust type, stored behind an `Arc` with its concrete
//! type erased. Objects are what named-type descriptors (classes and interfaces) are checked
//! against. A `Record` is the built-in structured object: an ordered bag of named fields.
use crate::{atom::Atom, value::Value};
use indexmap::IndexMap;
use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc,
};

////////////////////////////////////////////////////////////////////////////////////////////////////
// Object
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A shared, type-erased instance.
#[derive(Clone)]
pub struct Object {
    type_id: TypeId,
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Object {
    /// Wraps a value into a new object.
    pub fn new<T: Any + Send + Sync>(value: T) -> Object {
        Object::from_arc(Arc::new(value))
    }

    /// Creates an object sharing an existing allocation.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Object {
        Object {
            type_id: TypeId::of::<T>(),
            type_name: short_type_name(std::any::type_name::<T>()),
            inner: value,
        }
    }

    /// `TypeId` of the wrapped value.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Name of the wrapped type, without its module path.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns a new handle to the wrapped value if it is a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.inner.clone().downcast::<T>().ok()
    }

    /// Returns whether both handles refer to the same instance.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(record) = self.downcast_ref::<Record>() {
            return f.debug_tuple("Object").field(record).finish();
        }
        f.debug_tuple("Object").field(&self.type_name).finish()
    }
}

/// Strips the module path from a type name, keeping generic arguments out of the way:
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec`.
///
/// Tuples, arrays, slices, references, pointers and trait objects are not plain paths and keep
/// their full name.
fn short_type_name(full: &'static str) -> &'static str {
    if full.starts_with(['(', '[', '&', '*']) || full.starts_with("dyn ") || full.starts_with("fn(") {
        return full;
    }
    let base = match full.find('<') {
        Some(pos) => &full[..pos],
        None => full,
    };
    base.rsplit("::").next().unwrap_or(base)
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// Record
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Built-in structured object.
///
/// Records are always resolvable by the name `"Record"` in a type registry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<Atom, Value>,
}

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    /// Builder-style field insertion.
    pub fn with(mut self, name: impl Into<Atom>, value: impl Into<Value>) -> Record {
        self.insert(name, value);
        self
    }

    /// Inserts or replaces a field, returning the previous value.
    pub fn insert(&mut self, name: impl Into<Atom>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn get(&self, name: impl Into<Atom>) -> Option<&Value> {
        let name: Atom = name.into();
        self.fields.get(&name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Atom, &Value)> {
        self.fields.iter()
    }
}

impl<K: Into<Atom>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
