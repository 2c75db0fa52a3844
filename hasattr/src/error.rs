use crate::{atom::Atom, typedesc::PrimitiveType, value::Value};
use thiserror::Error;

/// Reasons an attribute write is rejected.
///
/// A rejected write leaves the store untouched.
#[derive(Clone, Debug, Error)]
pub enum AttributeError {
    /// The schema has no entry for the key.
    #[error("key `{key}` is not defined")]
    UndefinedKey { key: Atom },
    /// The value is not of the primitive kind declared for the key.
    #[error("[{key} => {value}] value is not of type `{expected}`")]
    TypeMismatch {
        key: Atom,
        value: Value,
        expected: PrimitiveType,
    },
    /// The descriptor is neither a primitive keyword nor a registered class or interface.
    #[error("type definition `{definition}` is not supported")]
    UnsupportedDefinition { definition: Atom },
    /// The value is an object, but not an instance of the declared class or interface.
    #[error("[{key} => {actual}] object is not an instance of `{expected}`")]
    InstanceMismatch {
        key: Atom,
        actual: &'static str,
        expected: Atom,
    },
    /// The declared type is a class or interface but the value is not an object.
    #[error("[{key} => {value}] value is not an instance of `{expected}`")]
    ValueNotInstance { key: Atom, value: Value, expected: Atom },
}

impl AttributeError {
    /// Key of the rejected write, if the error relates to one.
    pub fn key(&self) -> Option<&Atom> {
        match self {
            AttributeError::UndefinedKey { key }
            | AttributeError::TypeMismatch { key, .. }
            | AttributeError::InstanceMismatch { key, .. }
            | AttributeError::ValueNotInstance { key, .. } => Some(key),
            AttributeError::UnsupportedDefinition { .. } => None,
        }
    }
}

/// Errors raised while registering named types.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("a type named `{0}` has already been registered")]
    DuplicateDefinition(Atom),
    #[error("`{0}` is not a registered interface")]
    UnknownInterface(Atom),
}
