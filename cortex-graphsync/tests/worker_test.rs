use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use cortex_core::config::{GraphSyncConfig, ResilienceConfig};
use cortex_core::errors::{CortexResult, GraphSyncError};
use cortex_core::models::{GraphSyncOperation, GraphSyncQueueEntry};
use cortex_core::traits::{GraphNode, IGraphAdapter, IGraphSyncQueueStorage};
use cortex_resilience::ResilienceEnvelope;
use cortex_graphsync::GraphSyncWorker;

struct InMemoryQueue {
    entries: Mutex<Vec<GraphSyncQueueEntry>>,
}

#[async_trait]
impl IGraphSyncQueueStorage for InMemoryQueue {
    async fn enqueue(
        &self,
        table: &str,
        entity_id: &str,
        operation: GraphSyncOperation,
        entity: serde_json::Value,
        _priority: Option<u8>,
    ) -> CortexResult<String> {
        let entry = GraphSyncQueueEntry::new(table, entity_id, operation, Some(entity));
        let id = entry.id.clone();
        self.entries.lock().await.push(entry);
        Ok(id)
    }

    async fn claim_batch(&self, limit: usize) -> CortexResult<Vec<GraphSyncQueueEntry>> {
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .filter(|e| !e.synced && !e.dead_lettered && e.next_attempt_at <= Utc::now())
            .take(limit)
            .cloned()
            .collect())
    }

    async fn mark_synced(&self, id: &str) -> CortexResult<()> {
        let mut entries = self.entries.lock().await;
        if let Some(e) = entries.iter_mut().find(|e| e.id == id) {
            e.synced = true;
        }
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: &str,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> CortexResult<()> {
        let mut entries = self.entries.lock().await;
        if let Some(e) = entries.iter_mut().find(|e| e.id == id) {
            e.failed_attempts += 1;
            e.last_error = Some(error.to_string());
            e.next_attempt_at = next_attempt_at;
        }
        Ok(())
    }

    async fn mark_dead_lettered(&self, id: &str, error: &str) -> CortexResult<()> {
        let mut entries = self.entries.lock().await;
        if let Some(e) = entries.iter_mut().find(|e| e.id == id) {
            e.dead_lettered = true;
            e.last_error = Some(error.to_string());
        }
        Ok(())
    }

    async fn reap_synced(&self, older_than: DateTime<Utc>) -> CortexResult<usize> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|e| !(e.synced && e.updated_at <= older_than));
        Ok(before - entries.len())
    }
}

#[derive(Default)]
struct CountingAdapter {
    upserts: AtomicUsize,
    fail_next: std::sync::atomic::AtomicBool,
}

#[async_trait]
impl IGraphAdapter for CountingAdapter {
    async fn connect(&self) -> CortexResult<()> {
        Ok(())
    }
    async fn disconnect(&self) -> CortexResult<()> {
        Ok(())
    }
    async fn upsert_node(&self, _label: &str, _props: serde_json::Value) -> CortexResult<String> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(GraphSyncError::AdapterFailed {
                entity_id: "x".into(),
                reason: "injected failure".into(),
            }
            .into());
        }
        self.upserts.fetch_add(1, Ordering::SeqCst);
        Ok("node-1".to_string())
    }
    async fn update_node(&self, _id: &str, _props: serde_json::Value) -> CortexResult<()> {
        Ok(())
    }
    async fn delete_node(&self, _id: &str, _cleanup_orphans: bool) -> CortexResult<()> {
        Ok(())
    }
    async fn find_nodes(
        &self,
        _label: &str,
        _filter: serde_json::Value,
        _limit: usize,
    ) -> CortexResult<Vec<GraphNode>> {
        Ok(vec![])
    }
    async fn relate(
        &self,
        _from: &str,
        _rel_type: &str,
        _to: &str,
        _props: Option<serde_json::Value>,
    ) -> CortexResult<()> {
        Ok(())
    }
    async fn unrelate(&self, _from: &str, _rel_type: &str, _to: &str) -> CortexResult<()> {
        Ok(())
    }
    async fn query(&self, _cypher_like: &str, _params: serde_json::Value) -> CortexResult<Vec<GraphNode>> {
        Ok(vec![])
    }
}

#[tokio::test]
async fn successful_sync_marks_entry_synced() {
    let queue = Arc::new(InMemoryQueue {
        entries: Mutex::new(vec![]),
    });
    queue
        .enqueue("memories", "m-1", GraphSyncOperation::Insert, serde_json::json!({}), None)
        .await
        .unwrap();

    let adapter = Arc::new(CountingAdapter::default());
    let envelope = Arc::new(ResilienceEnvelope::new(&ResilienceConfig::default()));
    let worker = GraphSyncWorker::new(queue.clone(), Some(adapter.clone()), envelope, GraphSyncConfig::default(), 10);

    let processed = worker.run_once().await.unwrap();
    assert_eq!(processed, 1);
    assert_eq!(adapter.upserts.load(Ordering::SeqCst), 1);

    let entries = queue.entries.lock().await;
    assert!(entries[0].synced);
}

#[tokio::test]
async fn failure_reschedules_with_backoff() {
    let queue = Arc::new(InMemoryQueue {
        entries: Mutex::new(vec![]),
    });
    queue
        .enqueue("memories", "m-1", GraphSyncOperation::Insert, serde_json::json!({}), None)
        .await
        .unwrap();

    let adapter = Arc::new(CountingAdapter::default());
    adapter.fail_next.store(true, Ordering::SeqCst);
    let envelope = Arc::new(ResilienceEnvelope::new(&ResilienceConfig::default()));
    let worker = GraphSyncWorker::new(queue.clone(), Some(adapter), envelope, GraphSyncConfig::default(), 10);

    worker.run_once().await.unwrap();

    let entries = queue.entries.lock().await;
    assert!(!entries[0].synced);
    assert_eq!(entries[0].failed_attempts, 1);
    assert!(entries[0].next_attempt_at > Utc::now() - chrono::Duration::seconds(1));
    let _ = Duration::from_secs(0);
}
