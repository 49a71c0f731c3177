//! Reading and writing through a persister.

use std::collections::HashMap;
use std::sync::Arc;

use persist_rust::{
    Base64Transformer, InMemoryStorage, JsonTransformer, PersistenceError, Persister,
    StorableTransformer, Storage, StorageError, Transformer, Value,
};
use serde::{Deserialize, Serialize};

use crate::support::FlakyStorage;

fn storage() -> Arc<InMemoryStorage<Value>> {
    Arc::new(InMemoryStorage::new())
}

#[test]
fn persists_bool_false_and_true() {
    let persister = Persister::builder("test", storage()).build_storable(|| true);

    persister.persist(&false).unwrap();
    assert!(!persister.retrieve().unwrap());

    persister.persist(&true).unwrap();
    assert!(persister.retrieve().unwrap());
}

#[test]
fn persists_scalars_as_their_own_variant() {
    let storage = storage();

    let int = Persister::builder("int", storage.clone()).build_storable(|| 1i64);
    int.persist(&0).unwrap();
    assert_eq!(int.retrieve().unwrap(), 0);
    assert_eq!(storage.get("int").unwrap(), Some(Value::Int64(0)));

    let double = Persister::builder("double", storage.clone()).build_storable(|| 0.0f64);
    double.persist(&1.23).unwrap();
    assert_eq!(double.retrieve().unwrap(), 1.23);
    assert_eq!(storage.get("double").unwrap(), Some(Value::Double(1.23)));

    let string = Persister::builder("string", storage.clone()).build_storable(String::new);
    string.persist(&"value".to_string()).unwrap();
    assert_eq!(storage.get("string").unwrap(), Some(Value::from("value")));
}

#[test]
fn persists_list_in_order() {
    let persister = Persister::builder("test", storage()).build_storable(Vec::<i64>::new);
    let list = vec![1, 2, 0, 6];

    persister.persist(&list).unwrap();
    assert_eq!(persister.retrieve().unwrap(), list);
}

#[test]
fn persists_map_of_lists() {
    let persister =
        Persister::builder("test", storage()).build_storable(HashMap::<String, Vec<i64>>::new);
    let mut map = HashMap::new();
    map.insert("foo".to_string(), vec![1, 2, 0, 6]);
    map.insert("bar".to_string(), vec![0, 4, 7]);

    persister.persist(&map).unwrap();
    assert_eq!(persister.retrieve().unwrap(), map);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Bar {
    baz: String,
}

#[test]
fn stores_transformed_value_and_returns_untransformed() {
    let storage = storage();
    let persister = Persister::builder("bar", storage.clone())
        .build_optional_with(JsonTransformer::<Bar>::new());

    let bar = Bar {
        baz: "new-value".into(),
    };
    persister.persist(&Some(bar.clone())).unwrap();

    assert_eq!(
        storage.get("bar").unwrap(),
        Some(Value::Bytes(br#"{"baz":"new-value"}"#.to_vec()))
    );
    assert_eq!(persister.retrieve().unwrap(), Some(bar));
}

#[test]
fn optional_none_removes_key() {
    let storage = storage();
    let persister =
        Persister::builder("nickname", storage.clone()).build_optional_storable::<String>();

    assert_eq!(persister.retrieve().unwrap(), None);

    persister.persist(&Some("sam".to_string())).unwrap();
    assert_eq!(storage.get("nickname").unwrap(), Some(Value::from("sam")));

    persister.persist(&None).unwrap();
    assert_eq!(storage.get("nickname").unwrap(), None);
    assert_eq!(persister.retrieve().unwrap(), None);
}

#[test]
fn deep_chain_round_trips() {
    let storage = storage();
    let chain = JsonTransformer::<Vec<Bar>>::new()
        .append(Base64Transformer::new())
        .append(StorableTransformer::<String>::new());
    let persister = Persister::new("bars", storage.clone(), chain, Vec::new);

    let bars = vec![Bar { baz: "a".into() }, Bar { baz: "b".into() }];
    persister.persist(&bars).unwrap();

    let raw = storage.get("bars").unwrap().unwrap();
    assert!(matches!(raw, Value::String(_)));
    assert_eq!(persister.retrieve().unwrap(), bars);
}

#[test]
fn blob_backend_uses_bytes_directly() {
    let storage = Arc::new(InMemoryStorage::<Vec<u8>>::new());
    let persister = Persister::new("bar", storage.clone(), JsonTransformer::<Bar>::new(), || Bar {
        baz: "default".into(),
    });

    persister.persist(&Bar { baz: "x".into() }).unwrap();
    assert_eq!(storage.get("bar").unwrap(), Some(br#"{"baz":"x"}"#.to_vec()));
    assert_eq!(persister.retrieve().unwrap().baz, "x");
}

#[test]
fn remove_value_restores_default() {
    let storage = storage();
    let persister = Persister::builder("count", storage.clone()).build_storable(|| 10i64);

    persister.persist(&3).unwrap();
    persister.remove_value().unwrap();

    assert_eq!(storage.get("count").unwrap(), None);
    assert_eq!(persister.retrieve().unwrap(), 10);
}

#[test]
fn retrieve_stored_reports_absence() {
    let persister = Persister::builder("count", storage()).build_storable(|| 10i64);

    assert_eq!(
        persister.retrieve_stored(),
        Err(PersistenceError::ValueAbsent {
            key: "count".into()
        })
    );

    persister.persist(&4).unwrap();
    assert_eq!(persister.retrieve_stored(), Ok(4));
}

#[test]
fn persisters_share_a_backend_by_key() {
    let storage = storage();
    let a = Persister::builder("a", storage.clone()).build_storable(|| 0i64);
    let b = Persister::builder("b", storage.clone()).build_storable(|| 0i64);
    let a_again = Persister::builder("a", storage.clone()).build_storable(|| 0i64);

    a.persist(&1).unwrap();
    b.persist(&2).unwrap();

    assert_eq!(a_again.retrieve().unwrap(), 1);
    assert_eq!(b.retrieve().unwrap(), 2);
}

#[test]
fn storage_write_failure_propagates_unmodified() {
    let storage = Arc::new(FlakyStorage::new());
    let persister = Persister::builder("key", storage.clone()).build_storable(|| 0i64);

    storage.fail_writes(true);
    assert_eq!(
        persister.persist(&1),
        Err(PersistenceError::StorageFailed(StorageError::Backend(
            "set rejected".into()
        )))
    );
    assert_eq!(
        persister.remove_value(),
        Err(PersistenceError::StorageFailed(StorageError::Backend(
            "remove rejected".into()
        )))
    );
}

#[test]
fn storage_read_failure_propagates() {
    let storage = Arc::new(FlakyStorage::new());
    let persister = Persister::builder("key", storage.clone()).build_storable(|| 0i64);

    storage.fail_reads(true);
    assert!(matches!(
        persister.retrieve(),
        Err(PersistenceError::StorageFailed(StorageError::Backend(_)))
    ));
}

#[cfg(feature = "file")]
#[test]
fn file_backed_value_survives_reopen() {
    use persist_rust::FileStorage;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    {
        let storage = Arc::new(FileStorage::open(&path).unwrap());
        let persister = Persister::builder("bars", storage)
            .build_with(JsonTransformer::<Vec<Bar>>::new(), Vec::new);
        persister.persist(&vec![Bar { baz: "kept".into() }]).unwrap();
    }

    let storage = Arc::new(FileStorage::open(&path).unwrap());
    let persister =
        Persister::builder("bars", storage).build_with(JsonTransformer::<Vec<Bar>>::new(), Vec::new);
    assert_eq!(
        persister.retrieve().unwrap(),
        vec![Bar {
            baz: "kept".into()
        }]
    );
}
