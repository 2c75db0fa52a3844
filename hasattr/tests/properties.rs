use hasattr::{AttributeStore, Schema, TypeDesc, Value};
use proptest::prelude::*;
use std::sync::Arc;

fn arb_key() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::from),
    ]
}

/// Non-null scalar and array values.
fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => arb_scalar(),
        1 => prop::collection::vec(arb_scalar(), 0..4).prop_map(Value::Array),
    ]
}

fn arb_pairs() -> impl Strategy<Value = Vec<(String, Value)>> {
    prop::collection::vec((arb_key(), arb_value()), 0..8)
}

fn mixed_schema() -> Arc<Schema> {
    Arc::new(
        Schema::new()
            .attribute("a", "string")
            .attribute("b", "int")
            .attribute("c", "bool")
            .attribute("d", "float")
            .attribute("e", "array"),
    )
}

proptest! {
    #[test]
    fn set_then_get_without_schema(key in arb_key(), value in arb_value()) {
        let mut store = AttributeStore::new();
        store.set_attribute(key.as_str(), value.clone()).unwrap();
        prop_assert_eq!(store.get_attribute(key.as_str()), Some(&value));
    }

    #[test]
    fn unset_key_returns_default(pairs in arb_pairs(), key in "[A-Z]{1,8}", default in arb_value()) {
        // upper-case keys are never generated by `arb_pairs`
        let store = AttributeStore::from_attributes(None, pairs).unwrap();
        prop_assert_eq!(store.get_attribute_or(key.as_str(), default.clone()), default);
    }

    #[test]
    fn get_attributes_matches_single_reads(pairs in arb_pairs(), keys in prop::collection::vec(arb_key(), 0..6)) {
        let store = AttributeStore::from_attributes(None, pairs).unwrap();
        let values = store.get_attributes(keys.iter().map(String::as_str));
        for key in &keys {
            let expected = store.get_attribute_or(key.as_str(), Value::Null);
            prop_assert_eq!(&values[&hasattr::Atom::from(key.as_str())], &expected);
        }
    }

    #[test]
    fn setting_twice_is_idempotent(pairs in arb_pairs(), key in arb_key(), value in arb_value()) {
        let mut once = AttributeStore::from_attributes(None, pairs.clone()).unwrap();
        let mut twice = AttributeStore::from_attributes(None, pairs).unwrap();
        once.set_attribute(key.as_str(), value.clone()).unwrap();
        twice.set_attribute(key.as_str(), value.clone()).unwrap();
        twice.set_attribute(key.as_str(), value).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn construction_matches_set_attributes(
        pairs in prop::collection::vec((prop::sample::select(vec!["a", "b", "c", "d", "e", "z"]), arb_value()), 0..8)
    ) {
        let schema = mixed_schema();
        let constructed = AttributeStore::from_attributes(Some(schema.clone()), pairs.clone());

        let mut incremental = AttributeStore::with_schema(schema);
        let applied = incremental.set_attributes(pairs);

        match (constructed, applied) {
            (Ok(store), Ok(())) => {
                prop_assert_eq!(store, incremental);
            }
            (Err(a), Err(b)) => {
                prop_assert_eq!(a.to_string(), b.to_string());
            }
            (a, b) => {
                prop_assert!(false, "diverging outcomes: {:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn schema_never_admits_invalid_pairs(
        pairs in prop::collection::vec((prop::sample::select(vec!["a", "b", "c", "d", "e", "z"]), arb_value()), 0..8)
    ) {
        let schema = mixed_schema();
        let mut store = AttributeStore::with_schema(schema.clone());
        for (key, value) in pairs {
            let _ = store.set_attribute(key, value);
        }
        for (key, value) in store.iter() {
            let ty = schema.definition(key);
            prop_assert!(ty.is_some());
            if let Some(TypeDesc::Primitive(expected)) = ty {
                prop_assert_eq!(value.primitive_type(), Some(*expected));
            }
        }
    }
}

#[test]
fn synonyms_behave_identically() {
    let groups: [&[&str]; 3] = [&["int", "integer"], &["bool", "boolean"], &["real", "float", "double"]];
    let samples = [Value::from(1), Value::from(true), Value::from(1.5), Value::from("x")];

    for group in groups {
        let outcomes: Vec<Vec<bool>> = group
            .iter()
            .map(|descriptor| {
                let mut store = AttributeStore::with_schema(Arc::new(Schema::new().attribute("k", *descriptor)));
                samples
                    .iter()
                    .map(|value| store.set_attribute("k", value.clone()).is_ok())
                    .collect()
            })
            .collect();
        assert!(outcomes.windows(2).all(|w| w[0] == w[1]), "{:?}: {:?}", group, outcomes);
    }
}
