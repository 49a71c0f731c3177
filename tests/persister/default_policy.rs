//! Default-value policy behaviour.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use persist_rust::{
    Base64Transformer, DefaultValuePolicy, InMemoryStorage, JsonTransformer, PersistenceError,
    Persister, Storage, StorageError, Transformer, Value,
};

use crate::support::{init_tracing, FlakyStorage};

fn storage() -> Arc<InMemoryStorage<Value>> {
    Arc::new(InMemoryStorage::new())
}

#[test]
fn absent_value_returns_default_without_writing() {
    let storage = storage();
    let persister = Persister::builder("test", storage.clone()).build_storable(|| 4i64);

    assert_eq!(persister.retrieve().unwrap(), 4);
    assert_eq!(storage.get("test").unwrap(), None);
    assert!(storage.is_empty().unwrap());
}

#[test]
fn persist_when_absent_writes_default() {
    let storage = storage();
    let persister = Persister::builder("test", storage.clone())
        .default_value_policy(DefaultValuePolicy::PERSIST_WHEN_ABSENT)
        .build_storable(|| 4i64);

    assert_eq!(persister.retrieve().unwrap(), 4);
    assert_eq!(storage.get("test").unwrap(), Some(Value::Int64(4)));
}

#[test]
fn default_supplier_runs_only_when_needed() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let persister = Persister::builder("test", storage()).build_storable(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        7i64
    });
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    persister.persist(&1).unwrap();
    assert_eq!(persister.retrieve().unwrap(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    persister.remove_value().unwrap();
    assert_eq!(persister.retrieve().unwrap(), 7);
    assert_eq!(persister.retrieve().unwrap(), 7);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn wrong_shape_is_an_error_by_default() {
    let storage = storage();
    storage.set("test", Value::from("the string")).unwrap();
    let persister = Persister::builder("test", storage.clone()).build_storable(|| 0i64);

    assert_eq!(
        persister.retrieve(),
        Err(PersistenceError::UnexpectedValueType {
            actual: Value::String("the string".into()),
            expected: "i64",
        })
    );
    assert_eq!(storage.get("test").unwrap(), Some(Value::from("the string")));
}

#[test]
fn default_on_error_recovers_without_writing() {
    let storage = storage();
    storage.set("test", Value::from("the string")).unwrap();
    let persister = Persister::builder("test", storage.clone())
        .default_value_policy(DefaultValuePolicy::DEFAULT_ON_ERROR)
        .build_storable(|| 9i64);

    assert_eq!(persister.retrieve().unwrap(), 9);
    assert_eq!(storage.get("test").unwrap(), Some(Value::from("the string")));
}

#[test]
fn persist_on_error_replaces_unreadable_value() {
    let storage = storage();
    storage.set("test", Value::from("the string")).unwrap();
    let persister = Persister::builder("test", storage.clone())
        .default_value_policy(DefaultValuePolicy::PERSIST_ON_ERROR)
        .build_storable(|| 9i64);

    assert_eq!(persister.retrieve().unwrap(), 9);
    assert_eq!(storage.get("test").unwrap(), Some(Value::Int64(9)));
}

#[test]
fn persist_when_absent_does_not_recover_errors() {
    let storage = storage();
    storage.set("test", Value::Bool(true)).unwrap();
    let persister = Persister::builder("test", storage)
        .default_value_policy(DefaultValuePolicy::PERSIST_WHEN_ABSENT)
        .build_storable(|| 0i64);

    assert!(matches!(
        persister.retrieve(),
        Err(PersistenceError::UnexpectedValueType { .. })
    ));
}

#[test]
fn malformed_payload_reports_transformer_failure() {
    let storage = storage();
    storage
        .set("test", Value::String("!!! not base64 !!!".into()))
        .unwrap();
    let chain = JsonTransformer::<Vec<i64>>::new().append(Base64Transformer::new());
    let persister = Persister::builder("test", storage).build_with(chain, Vec::new);

    match persister.retrieve() {
        Err(PersistenceError::TransformerFailed { stage, .. }) => assert_eq!(stage, "base64"),
        other => panic!("expected a transformer failure, got {:?}", other),
    }
}

#[test]
fn malformed_json_recovers_with_default_on_error() {
    let storage = storage();
    storage
        .set("test", Value::Bytes(b"{not json".to_vec()))
        .unwrap();
    let persister = Persister::builder("test", storage.clone())
        .default_value_policy(DefaultValuePolicy::DEFAULT_ON_ERROR)
        .build_with(JsonTransformer::<Vec<i64>>::new(), || vec![1]);

    assert_eq!(persister.retrieve().unwrap(), vec![1]);

    let strict = Persister::builder("test", storage)
        .build_with(JsonTransformer::<Vec<i64>>::new(), Vec::new);
    assert!(matches!(
        strict.retrieve(),
        Err(PersistenceError::TransformerFailed { stage: "json", .. })
    ));
}

#[test]
fn storage_failure_is_never_recovered() {
    let storage = Arc::new(FlakyStorage::new());
    let persister = Persister::builder("test", storage.clone())
        .default_value_policy(DefaultValuePolicy::PERSIST_ON_ERROR)
        .build_storable(|| 0i64);

    storage.fail_reads(true);
    assert_eq!(
        persister.retrieve(),
        Err(PersistenceError::StorageFailed(StorageError::Backend(
            "get rejected".into()
        )))
    );
}

#[test]
fn failed_default_write_back_still_returns_default() {
    init_tracing();
    let storage = Arc::new(FlakyStorage::new());
    let persister = Persister::builder("test", storage.clone())
        .default_value_policy(DefaultValuePolicy::PERSIST_WHEN_ABSENT)
        .build_storable(|| 3i64);

    storage.fail_writes(true);
    assert_eq!(persister.retrieve().unwrap(), 3);
    assert_eq!(storage.inner().get("test").unwrap(), None);
}

#[test]
fn optional_persister_defaults_to_none_even_when_persisting() {
    let storage = storage();
    let persister = Persister::builder("test", storage.clone())
        .default_value_policy(DefaultValuePolicy::PERSIST_WHEN_ABSENT)
        .build_optional_storable::<i64>();

    assert_eq!(persister.retrieve().unwrap(), None);
    assert_eq!(storage.get("test").unwrap(), None);
}
