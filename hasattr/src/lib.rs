//! Dynamic, optionally validated attributes for any type.
//!
//! An [`AttributeStore`] maps names to [`Value`]s. When it has a [`Schema`], every write is checked
//! first: the key must be declared, and the value must match the declared primitive kind or be an
//! instance of the declared class or interface (see [`registry`]).
//!
//! Embedding types implement [`HasAttributes`], usually through the derive macro:
//!
//! ```ignore
//! #[derive(HasAttributes)]
//! #[schema(color = "string", pig = "Eatable")]
//! struct Farm {
//!     #[attributes]
//!     attributes: AttributeStore,
//! }
//! ```

// macro support
#[macro_use]
extern crate tracing;
extern crate self as hasattr;

pub mod atom;
pub mod error;
mod has_attributes;
pub mod object;
pub mod registry;
pub mod schema;
pub mod store;
pub mod typedesc;
pub mod value;

pub use atom::Atom;
pub use error::{AttributeError, RegistryError};
pub use has_attributes::HasAttributes;
pub use hasattr_macros::HasAttributes;
pub use object::{Object, Record};
pub use registry::{Definition, TypeRegistry};
pub use schema::Schema;
pub use store::AttributeStore;
pub use typedesc::{PrimitiveType, TypeDesc};
pub use value::{FromValue, Value};

#[doc(hidden)]
pub mod __private {
    pub use inventory;
    pub use lazy_static::lazy_static;
}
