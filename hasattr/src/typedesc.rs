//! Type description.
use crate::atom::Atom;
use std::fmt;

/// Primitive value types.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PrimitiveType {
    String,
    Integer,
    Boolean,
    Object,
    Array,
    Float,
}

impl PrimitiveType {
    /// Recognizes a primitive type keyword, including its synonyms.
    ///
    /// Keywords are matched exactly (case-sensitive).
    pub fn from_keyword(keyword: &str) -> Option<PrimitiveType> {
        match keyword {
            "string" => Some(PrimitiveType::String),
            "int" | "integer" => Some(PrimitiveType::Integer),
            "bool" | "boolean" => Some(PrimitiveType::Boolean),
            "object" => Some(PrimitiveType::Object),
            "array" => Some(PrimitiveType::Array),
            "real" | "float" | "double" => Some(PrimitiveType::Float),
            _ => None,
        }
    }

    /// Canonical name of the type.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Object => "object",
            PrimitiveType::Array => "array",
            PrimitiveType::Float => "float",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Describes the expected type of an attribute.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeDesc {
    /// One of the primitive kinds.
    Primitive(PrimitiveType),
    /// Name of a class or interface, resolved against a type registry when a value is checked.
    Named(Atom),
}

impl TypeDesc {
    /// Parses a descriptor. Primitive keywords win; anything else is a named type.
    pub fn parse(descriptor: &str) -> TypeDesc {
        match PrimitiveType::from_keyword(descriptor) {
            Some(prim) => TypeDesc::Primitive(prim),
            None => TypeDesc::Named(Atom::from(descriptor)),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeDesc::Primitive(_))
    }
}

impl From<&str> for TypeDesc {
    fn from(descriptor: &str) -> Self {
        TypeDesc::parse(descriptor)
    }
}

impl From<String> for TypeDesc {
    fn from(descriptor: String) -> Self {
        TypeDesc::parse(&descriptor)
    }
}

impl From<PrimitiveType> for TypeDesc {
    fn from(prim: PrimitiveType) -> Self {
        TypeDesc::Primitive(prim)
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeDesc::Primitive(prim) => write!(f, "{}", prim),
            TypeDesc::Named(name) => write!(f, "{}", name),
        }
    }
}
