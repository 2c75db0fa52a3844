//! Attribute schemas and the validation engine.
use crate::{
    atom::Atom,
    error::AttributeError,
    registry::{self, TypeRegistry},
    typedesc::TypeDesc,
    value::Value,
};
use indexmap::IndexMap;
use serde::Deserialize;
use std::sync::Arc;

/// Expected type of every attribute an object may hold.
///
/// Named types are resolved against the global registry, unless a local one is attached with
/// [`Schema::with_types`]. Schemas are meant to be built once per embedding type and shared.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(from = "IndexMap<String, String>")]
pub struct Schema {
    attributes: IndexMap<Atom, TypeDesc>,
    types: Option<Arc<TypeRegistry>>,
}

impl Schema {
    pub fn new() -> Schema {
        Schema::default()
    }

    /// Declares an attribute.
    pub fn attribute(mut self, name: impl Into<Atom>, ty: impl Into<TypeDesc>) -> Schema {
        self.attributes.insert(name.into(), ty.into());
        self
    }

    /// Resolves named types against `types` instead of the global registry.
    pub fn with_types(mut self, types: Arc<TypeRegistry>) -> Schema {
        self.types = Some(types);
        self
    }

    /// Loads a schema from a JSON object mapping attribute names to descriptors.
    pub fn from_json(json: &str) -> Result<Schema, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns the descriptor of an attribute.
    pub fn definition(&self, name: &Atom) -> Option<&TypeDesc> {
        self.attributes.get(name)
    }

    pub fn contains(&self, name: &Atom) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Atom, &TypeDesc)> {
        self.attributes.iter()
    }

    /// Checks that `value` may be stored under `key`.
    ///
    /// Pure function of the schema, the key and the value.
    pub fn check(&self, key: &Atom, value: &Value) -> Result<(), AttributeError> {
        let ty = self
            .attributes
            .get(key)
            .ok_or_else(|| AttributeError::UndefinedKey { key: key.clone() })?;

        match ty {
            TypeDesc::Primitive(expected) => {
                if value.primitive_type() == Some(*expected) {
                    Ok(())
                } else {
                    Err(AttributeError::TypeMismatch {
                        key: key.clone(),
                        value: value.clone(),
                        expected: *expected,
                    })
                }
            }
            TypeDesc::Named(name) => match &self.types {
                Some(types) => check_instance(types, key, name, value),
                None => check_instance(&registry::global(), key, name, value),
            },
        }
    }
}

fn check_instance(types: &TypeRegistry, key: &Atom, name: &Atom, value: &Value) -> Result<(), AttributeError> {
    let definition = types
        .resolve(name)
        .ok_or_else(|| AttributeError::UnsupportedDefinition { definition: name.clone() })?;

    match value {
        Value::Object(object) if definition.admits(object) => Ok(()),
        Value::Object(object) => Err(AttributeError::InstanceMismatch {
            key: key.clone(),
            actual: object.type_name(),
            expected: name.clone(),
        }),
        other => Err(AttributeError::ValueNotInstance {
            key: key.clone(),
            value: other.clone(),
            expected: name.clone(),
        }),
    }
}

impl<K: Into<Atom>, T: Into<TypeDesc>> FromIterator<(K, T)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Schema {
            attributes: iter.into_iter().map(|(k, t)| (k.into(), t.into())).collect(),
            types: None,
        }
    }
}

impl From<IndexMap<String, String>> for Schema {
    fn from(map: IndexMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{object::Object, typedesc::PrimitiveType};

    struct Pig;
    struct Rock;

    fn farm_types() -> Arc<TypeRegistry> {
        let mut types = TypeRegistry::new();
        types.register_interface("Eatable").unwrap();
        types.register_class::<Pig>("Pig").unwrap();
        types.implement::<Pig>("Eatable").unwrap();
        Arc::new(types)
    }

    #[test]
    fn test_primitive_checks() {
        let schema = Schema::new()
            .attribute("color", "string")
            .attribute("number", "int")
            .attribute("score", "double");

        assert!(schema.check(&"color".into(), &"red".into()).is_ok());
        assert!(schema.check(&"number".into(), &123.into()).is_ok());
        assert!(schema.check(&"score".into(), &1.0.into()).is_ok());

        match schema.check(&"number".into(), &1.5.into()) {
            Err(AttributeError::TypeMismatch { expected, .. }) => assert_eq!(expected, PrimitiveType::Integer),
            other => panic!("unexpected result: {:?}", other),
        }
        match schema.check(&"color".into(), &Value::Null) {
            Err(AttributeError::TypeMismatch { .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_named_checks() {
        let schema = Schema::new().attribute("pig", "Eatable").with_types(farm_types());
        let key = Atom::from("pig");

        assert!(schema.check(&key, &Object::new(Pig).into()).is_ok());
        match schema.check(&key, &Object::new(Rock).into()) {
            Err(AttributeError::InstanceMismatch { actual, .. }) => assert_eq!(actual, "Rock"),
            other => panic!("unexpected result: {:?}", other),
        }
        match schema.check(&key, &"eat".into()) {
            Err(AttributeError::ValueNotInstance { .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_definition() {
        let schema = Schema::new().attribute("pig", "foo").with_types(farm_types());
        match schema.check(&"pig".into(), &Object::new(Pig).into()) {
            Err(AttributeError::UnsupportedDefinition { definition }) => assert_eq!(definition, "foo"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_from_json() {
        let schema = Schema::from_json(r#"{ "color": "string", "number": "integer", "pig": "Eatable" }"#).unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(
            schema.definition(&"number".into()),
            Some(&TypeDesc::Primitive(PrimitiveType::Integer))
        );
        assert_eq!(schema.definition(&"pig".into()), Some(&TypeDesc::Named("Eatable".into())));
        assert!(Schema::from_json(r#"{ "color": 1 }"#).is_err());
    }
}
