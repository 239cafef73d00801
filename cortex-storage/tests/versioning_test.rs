//! Versioning contract for immutable records and memories: bounded
//! `previous_versions`, correct `get_version` resolution (spec §4.2).

use cortex_core::traits::{IImmutableStorage, IStorageBackend};
use cortex_storage::SqliteBackend;

async fn open_backend() -> (SqliteBackend, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let backend = SqliteBackend::open(&dir.path().join("cortex.db"), 4).expect("open backend");
    backend.migrate().await.expect("migrate");
    (backend, dir)
}

#[tokio::test]
async fn store_new_version_increments_and_snapshots() {
    let (backend, _dir) = open_backend().await;
    let v1 = backend
        .store_new_version("agent-config", "agent-1", serde_json::json!({"model": "a"}), Some("user-1"))
        .await
        .expect("v1");
    assert_eq!(v1, 2, "first store_new_version call bumps the implicit v1 created by ImmutableRecord::new");

    let v2 = backend
        .store_new_version("agent-config", "agent-1", serde_json::json!({"model": "b"}), None)
        .await
        .expect("v2");
    assert_eq!(v2, 3);

    let record = backend
        .get_immutable("agent-config", "agent-1")
        .await
        .expect("get")
        .expect("found");
    assert_eq!(record.data, serde_json::json!({"model": "b"}));
    assert_eq!(record.user_id.as_deref(), Some("user-1"), "user_id set on first write is never overwritten");

    let historical = backend
        .get_immutable_version("agent-config", "agent-1", 2)
        .await
        .expect("get_version")
        .expect("found v2 snapshot");
    assert_eq!(historical, serde_json::json!({"model": "a"}));
}

#[tokio::test]
async fn version_history_trims_to_retention() {
    let (backend, _dir) = open_backend().await;
    for i in 0..25 {
        backend
            .store_new_version("agent-config", "agent-1", serde_json::json!({"rev": i}), None)
            .await
            .expect("store version");
    }

    let record = backend
        .get_immutable("agent-config", "agent-1")
        .await
        .expect("get")
        .expect("found");
    assert!(
        record.previous_versions.len() <= cortex_core::constants::DEFAULT_IMMUTABLE_VERSION_RETENTION,
        "previous_versions must stay within the retention bound, got {}",
        record.previous_versions.len()
    );
}

#[tokio::test]
async fn delete_removes_record() {
    let (backend, _dir) = open_backend().await;
    backend
        .store_new_version("agent-config", "agent-1", serde_json::json!({"model": "a"}), None)
        .await
        .expect("store");
    backend.delete_immutable("agent-config", "agent-1").await.expect("delete");
    assert!(backend.get_immutable("agent-config", "agent-1").await.expect("get").is_none());
}
