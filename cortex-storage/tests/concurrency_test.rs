//! Optimistic concurrency on mutable records (spec §4.2 CAS contract).

use cortex_core::errors::CortexError;
use cortex_core::traits::{IMutableStorage, IStorageBackend};
use cortex_storage::SqliteBackend;

async fn open_backend() -> (SqliteBackend, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let backend = SqliteBackend::open(&dir.path().join("cortex.db"), 4).expect("open backend");
    backend.migrate().await.expect("migrate");
    (backend, dir)
}

#[tokio::test]
async fn put_with_none_token_creates_new_key() {
    let (backend, _dir) = open_backend().await;
    let token = backend
        .put("prefs", "theme", serde_json::json!("dark"), None, Some("user-1"))
        .await
        .expect("create");
    assert_eq!(token, 1);

    let record = backend.get_mutable("prefs", "theme").await.expect("get").expect("found");
    assert_eq!(record.value, serde_json::json!("dark"));
    assert_eq!(record.concurrency_token, 1);
}

#[tokio::test]
async fn put_with_stale_token_is_rejected() {
    let (backend, _dir) = open_backend().await;
    let token = backend
        .put("prefs", "theme", serde_json::json!("dark"), None, None)
        .await
        .expect("create");

    let result = backend
        .put("prefs", "theme", serde_json::json!("light"), Some(token - 1), None)
        .await;
    assert!(matches!(result, Err(CortexError::Storage(_))));

    let current = backend.get_mutable("prefs", "theme").await.expect("get").expect("found");
    assert_eq!(current.value, serde_json::json!("dark"));
}

#[tokio::test]
async fn put_with_matching_token_advances_it() {
    let (backend, _dir) = open_backend().await;
    let token = backend
        .put("prefs", "theme", serde_json::json!("dark"), None, None)
        .await
        .expect("create");

    let next = backend
        .put("prefs", "theme", serde_json::json!("light"), Some(token), None)
        .await
        .expect("update");
    assert_eq!(next, token + 1);

    let current = backend.get_mutable("prefs", "theme").await.expect("get").expect("found");
    assert_eq!(current.value, serde_json::json!("light"));
}

#[tokio::test]
async fn put_with_some_token_on_missing_key_fails() {
    let (backend, _dir) = open_backend().await;
    let result = backend
        .put("prefs", "missing", serde_json::json!("x"), Some(1), None)
        .await;
    assert!(result.is_err());
}
