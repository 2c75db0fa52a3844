//! Attribute storage.
use crate::{
    atom::Atom,
    error::AttributeError,
    schema::Schema,
    value::{FromValue, Value},
};
use indexmap::IndexMap;
use std::{ops::Index, sync::Arc};

static NULL: Value = Value::Null;

/// A set of named values, optionally validated against a schema.
///
/// Writes are validated before anything is stored: with a schema, the store never holds a key
/// missing from the schema or a value that does not match its descriptor. Without a schema,
/// anything goes.
///
/// The store does no locking of its own. Sharing one mutably between threads is up to the owner.
#[derive(Clone, Debug, Default)]
pub struct AttributeStore {
    attributes: IndexMap<Atom, Value>,
    schema: Option<Arc<Schema>>,
}

impl AttributeStore {
    /// Creates an empty store that accepts any attribute.
    pub fn new() -> AttributeStore {
        AttributeStore::default()
    }

    /// Creates an empty store validated against `schema`.
    pub fn with_schema(schema: Arc<Schema>) -> AttributeStore {
        AttributeStore {
            attributes: IndexMap::new(),
            schema: Some(schema),
        }
    }

    /// Creates a store and sets the initial attributes, in order.
    ///
    /// Same as creating an empty store and calling `set_attributes`.
    pub fn from_attributes<I, K, V>(schema: Option<Arc<Schema>>, initial: I) -> Result<AttributeStore, AttributeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Atom>,
        V: Into<Value>,
    {
        let mut store = AttributeStore {
            attributes: IndexMap::new(),
            schema,
        };
        store.set_attributes(initial)?;
        Ok(store)
    }

    /// The schema writes are validated against, if any.
    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.schema.as_ref()
    }

    /// Validates and stores a value, replacing any previous one.
    ///
    /// On error the store is left unmodified.
    pub fn set_attribute(&mut self, key: impl Into<Atom>, value: impl Into<Value>) -> Result<(), AttributeError> {
        self.set_attribute_under(None, key.into(), value.into())
    }

    /// Validates against `owner` (the embedding type's schema) as well as the store's own schema.
    ///
    /// `owner` is skipped when it is the very schema the store is bound to.
    pub(crate) fn set_attribute_under(
        &mut self,
        owner: Option<&Arc<Schema>>,
        key: Atom,
        value: Value,
    ) -> Result<(), AttributeError> {
        let owner = owner.filter(|owner| !matches!(&self.schema, Some(own) if Arc::ptr_eq(own, owner)));

        for schema in owner.into_iter().chain(self.schema.as_ref()) {
            if let Err(err) = schema.check(&key, &value) {
                debug!("rejected attribute write: {}", err);
                return Err(err);
            }
        }

        trace!("set attribute `{}` = {:?}", key, value);
        self.attributes.insert(key, value);
        Ok(())
    }

    /// Sets several attributes in iteration order.
    ///
    /// This is not transactional: attributes set before a failing one stay set, and the failing
    /// attribute and those after it are not applied.
    pub fn set_attributes<I, K, V>(&mut self, attributes: I) -> Result<(), AttributeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Atom>,
        V: Into<Value>,
    {
        self.set_attributes_under(None, attributes)
    }

    pub(crate) fn set_attributes_under<I, K, V>(
        &mut self,
        owner: Option<&Arc<Schema>>,
        attributes: I,
    ) -> Result<(), AttributeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Atom>,
        V: Into<Value>,
    {
        for (key, value) in attributes {
            self.set_attribute_under(owner, key.into(), value.into())?;
        }
        Ok(())
    }

    /// Returns the value of an attribute, or `None` if it is unset or null.
    pub fn get_attribute(&self, key: impl Into<Atom>) -> Option<&Value> {
        let key: Atom = key.into();
        self.attributes.get(&key).filter(|v| !v.is_null())
    }

    /// Returns the value of an attribute, or `default` if it is unset or null.
    pub fn get_attribute_or(&self, key: impl Into<Atom>, default: impl Into<Value>) -> Value {
        match self.get_attribute(key) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Returns the requested attributes, in the order they were asked for.
    ///
    /// Attributes that are not set map to `Value::Null`.
    pub fn get_attributes<I, K>(&self, keys: I) -> IndexMap<Atom, Value>
    where
        I: IntoIterator<Item = K>,
        K: Into<Atom>,
    {
        keys.into_iter()
            .map(|key| {
                let key: Atom = key.into();
                let value = self.get_attribute_or(key.clone(), Value::Null);
                (key, value)
            })
            .collect()
    }

    /// Reads an attribute as a concrete type.
    pub fn get_as<T: FromValue>(&self, key: impl Into<Atom>) -> Option<T> {
        self.get_attribute(key).and_then(T::from_value)
    }

    pub fn contains_key(&self, key: impl Into<Atom>) -> bool {
        let key: Atom = key.into();
        self.attributes.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterates over the stored attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Atom, &Value)> {
        self.attributes.iter()
    }
}

/// Two stores are equal when they hold the same attributes under the same schema instance.
impl PartialEq for AttributeStore {
    fn eq(&self, other: &Self) -> bool {
        let same_schema = match (&self.schema, &other.schema) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_schema && self.attributes == other.attributes
    }
}

/// Read-only property access: `store["color"]`. Unset attributes read as `Value::Null`.
impl Index<&str> for AttributeStore {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get_attribute(key).unwrap_or(&NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_schema() -> Arc<Schema> {
        Arc::new(Schema::new().attribute("color", "string").attribute("size", "int"))
    }

    #[test]
    fn test_set_get() {
        let mut store = AttributeStore::new();
        store.set_attribute("color", "red").unwrap();
        assert_eq!(store.get_attribute("color"), Some(&Value::from("red")));
        assert_eq!(store.get_attribute("fruit"), None);
        assert_eq!(store.get_attribute_or("fruit", "apple"), Value::from("apple"));
        assert_eq!(store["color"], Value::from("red"));
        assert_eq!(store["fruit"], Value::Null);
    }

    #[test]
    fn test_null_reads_as_unset() {
        let mut store = AttributeStore::new();
        store.set_attribute("color", Value::Null).unwrap();
        assert!(store.contains_key("color"));
        assert_eq!(store.get_attribute("color"), None);
        assert_eq!(store.get_attribute_or("color", "red"), Value::from("red"));
    }

    #[test]
    fn test_rejected_write_leaves_store_untouched() {
        let mut store = AttributeStore::with_schema(color_schema());
        store.set_attribute("color", "red").unwrap();
        let before = store.clone();

        assert!(store.set_attribute("color", 123).is_err());
        assert!(store.set_attribute("fruit", "banana").is_err());
        assert_eq!(store, before);
        assert_eq!(store.get_attribute("color"), Some(&Value::from("red")));
    }

    #[test]
    fn test_batch_is_not_transactional() {
        let mut store = AttributeStore::with_schema(color_schema());
        let err = store
            .set_attributes(vec![
                ("color", Value::from("red")),
                ("size", Value::from("large")),
                ("color", Value::from("blue")),
            ])
            .unwrap_err();

        assert_eq!(err.key(), Some(&Atom::from("size")));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_as::<String>("color").as_deref(), Some("red"));
    }

    #[test]
    fn test_owner_schema_applies_to_unbound_store() {
        let owner = color_schema();
        let mut store = AttributeStore::new();

        assert!(matches!(
            store.set_attribute_under(Some(&owner), "fruit".into(), "banana".into()),
            Err(AttributeError::UndefinedKey { .. })
        ));
        assert!(store.set_attribute_under(Some(&owner), "color".into(), 123.into()).is_err());
        assert!(store.is_empty());

        store.set_attribute_under(Some(&owner), "color".into(), "red".into()).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_owner_and_store_schemas_both_apply() {
        let owner = Arc::new(Schema::new().attribute("color", "string"));
        let mut store = AttributeStore::with_schema(color_schema());

        // `size` is known to the store but not to the owner
        assert!(store.set_attribute_under(Some(&owner), "size".into(), 3.into()).is_err());
        store.set_attribute_under(Some(&owner), "color".into(), "red".into()).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_attributes_order() {
        let mut store = AttributeStore::new();
        store.set_attributes([("a", 1), ("b", 2)]).unwrap();

        let values = store.get_attributes(["b", "missing", "a"]);
        let keys: Vec<&str> = values.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["b", "missing", "a"]);
        assert_eq!(values[&Atom::from("missing")], Value::Null);
        assert_eq!(values[&Atom::from("a")], Value::Int(1));
    }
}
