//! Named types.
//!
//! Attribute schemas can require a value to be an instance of a named class or interface. Rust
//! has no runtime class table, so names are resolved against a `TypeRegistry`:
//!
//! * a _class_ names exactly one concrete Rust type;
//! * an _interface_ names a set of implementing Rust types.
//!
//! Types are registered program-wide with the [`register_class!`](crate::register_class) and
//! [`register_interface!`](crate::register_interface) macros; the global registry collects them
//! on first use. Schemas may also carry their own local registry.
//!
//! The global registry is published as an immutable snapshot. Validation loads the current
//! snapshot without locking, so it never waits on a thread that is registering types. Runtime
//! registrations go through [`global_mut`], which edits a private copy and publishes it when the
//! guard is dropped; writers are serialized, so holding two guards on one thread deadlocks.
use crate::{
    atom::Atom,
    error::RegistryError,
    object::{Object, Record},
};
use arc_swap::ArcSwap;
use lazy_static::lazy_static;
use parking_lot::{Mutex, MutexGuard};
use std::{
    any::{Any, TypeId},
    collections::{HashMap, HashSet},
    ops::{Deref, DerefMut},
    sync::Arc,
};

////////////////////////////////////////////////////////////////////////////////////////////////////
// Definition
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A named type.
#[derive(Clone, Debug, PartialEq)]
pub enum Definition {
    /// A concrete type.
    Class(TypeId),
    /// Every type in the set implements the interface.
    Interface(HashSet<TypeId>),
}

impl Definition {
    /// Returns whether the object is an instance (or implementer) of this type.
    pub fn admits(&self, object: &Object) -> bool {
        match self {
            Definition::Class(type_id) => object.type_id() == *type_id,
            Definition::Interface(implementors) => implementors.contains(&object.type_id()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// TypeRegistry
////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug)]
pub struct TypeRegistry {
    definitions: HashMap<Atom, Definition>,
}

impl TypeRegistry {
    /// Creates a registry containing only the built-in `Record` class.
    pub fn new() -> TypeRegistry {
        let mut definitions = HashMap::new();
        definitions.insert(Atom::from("Record"), Definition::Class(TypeId::of::<Record>()));
        TypeRegistry { definitions }
    }

    /// Builds a registry from every `register_class!` and `register_interface!` in the program.
    ///
    /// Duplicate names and implementations of unknown interfaces are skipped with a warning.
    pub fn collect() -> TypeRegistry {
        let mut registry = TypeRegistry::new();

        for interface in inventory::iter::<InterfaceRegistration> {
            if let Err(err) = registry.register_interface(interface.name) {
                warn!("ignoring interface registration: {}", err);
            }
        }

        for class in inventory::iter::<ClassRegistration> {
            let type_id = (class.type_id)();
            if let Err(err) = registry.insert(Atom::from(class.name), Definition::Class(type_id)) {
                warn!("ignoring class registration: {}", err);
                continue;
            }
            for &interface in class.implements {
                if let Err(err) = registry.implement_id(type_id, Atom::from(interface)) {
                    warn!("class `{}`: {}", class.name, err);
                }
            }
        }

        trace!("collected {} named types", registry.definitions.len());
        registry
    }

    /// Registers `T` as a class.
    pub fn register_class<T: Any>(&mut self, name: impl Into<Atom>) -> Result<(), RegistryError> {
        self.insert(name.into(), Definition::Class(TypeId::of::<T>()))
    }

    /// Registers an interface with no implementors yet.
    pub fn register_interface(&mut self, name: impl Into<Atom>) -> Result<(), RegistryError> {
        self.insert(name.into(), Definition::Interface(HashSet::new()))
    }

    /// Declares that `T` implements a previously registered interface.
    pub fn implement<T: Any>(&mut self, interface: impl Into<Atom>) -> Result<(), RegistryError> {
        self.implement_id(TypeId::of::<T>(), interface.into())
    }

    /// Returns the definition registered under `name`.
    pub fn resolve(&self, name: &Atom) -> Option<&Definition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &Atom) -> bool {
        self.definitions.contains_key(name)
    }

    fn insert(&mut self, name: Atom, definition: Definition) -> Result<(), RegistryError> {
        if self.definitions.contains_key(&name) {
            return Err(RegistryError::DuplicateDefinition(name));
        }
        self.definitions.insert(name, definition);
        Ok(())
    }

    fn implement_id(&mut self, type_id: TypeId, interface: Atom) -> Result<(), RegistryError> {
        match self.definitions.get_mut(&interface) {
            Some(Definition::Interface(implementors)) => {
                implementors.insert(type_id);
                Ok(())
            }
            _ => Err(RegistryError::UnknownInterface(interface)),
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        TypeRegistry::new()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// Program-wide registration
////////////////////////////////////////////////////////////////////////////////////////////////////

#[doc(hidden)]
pub struct ClassRegistration {
    pub name: &'static str,
    pub type_id: fn() -> TypeId,
    pub implements: &'static [&'static str],
}

#[doc(hidden)]
pub struct InterfaceRegistration {
    pub name: &'static str,
}

inventory::collect!(ClassRegistration);
inventory::collect!(InterfaceRegistration);

/// Registers a type as a named class in the global registry.
///
/// ```ignore
/// register_interface!("Eatable");
/// register_class!(Pig, "Pig", implements ["Eatable"]);
/// ```
#[macro_export]
macro_rules! register_class {
    ($t:ty, $name:expr) => {
        $crate::register_class!($t, $name, implements []);
    };
    ($t:ty, $name:expr, implements [$($interface:expr),* $(,)?]) => {
        $crate::__private::inventory::submit! {
            $crate::registry::ClassRegistration {
                name: $name,
                type_id: ::std::any::TypeId::of::<$t>,
                implements: &[$($interface),*],
            }
        }
    };
}

/// Registers a named interface in the global registry.
#[macro_export]
macro_rules! register_interface {
    ($name:expr) => {
        $crate::__private::inventory::submit! {
            $crate::registry::InterfaceRegistration { name: $name }
        }
    };
}

lazy_static! {
    static ref GLOBAL_TYPES: ArcSwap<TypeRegistry> = ArcSwap::from_pointee(TypeRegistry::collect());
    static ref GLOBAL_WRITER: Mutex<()> = Mutex::new(());
}

/// Current snapshot of the global registry.
///
/// Registrations made after the call are not visible through the returned snapshot.
pub fn global() -> Arc<TypeRegistry> {
    GLOBAL_TYPES.load_full()
}

/// Write access to the global registry, for types registered at runtime.
///
/// Changes become visible to readers when the guard is dropped.
pub fn global_mut() -> GlobalTypesMut {
    let lock = GLOBAL_WRITER.lock();
    let types = (**GLOBAL_TYPES.load()).clone();
    GlobalTypesMut { types, _lock: lock }
}

/// Pending edit of the global registry, returned by [`global_mut`].
pub struct GlobalTypesMut {
    types: TypeRegistry,
    _lock: MutexGuard<'static, ()>,
}

impl Deref for GlobalTypesMut {
    type Target = TypeRegistry;

    fn deref(&self) -> &TypeRegistry {
        &self.types
    }
}

impl DerefMut for GlobalTypesMut {
    fn deref_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }
}

impl Drop for GlobalTypesMut {
    fn drop(&mut self) {
        let types = std::mem::take(&mut self.types);
        trace!("publishing global registry ({} named types)", types.definitions.len());
        GLOBAL_TYPES.store(Arc::new(types));
    }
}
