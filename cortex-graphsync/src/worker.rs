use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};

use cortex_core::config::GraphSyncConfig;
use cortex_core::errors::{CortexResult, GraphSyncError};
use cortex_core::models::{GraphSyncOperation, GraphSyncQueueEntry, Priority};
use cortex_core::traits::{IGraphAdapter, IGraphSyncQueueStorage};
use cortex_resilience::ResilienceEnvelope;

use crate::backoff::backoff_ms;

/// Drains `graphSyncQueue` to an external native-graph adapter (spec §4.7).
/// Always runs at `background` priority so it never competes with
/// `high`/`normal` caller traffic for the resilience envelope's
/// concurrency permits.
pub struct GraphSyncWorker<Q, A> {
    queue: Arc<Q>,
    adapter: Option<Arc<A>>,
    envelope: Arc<ResilienceEnvelope>,
    config: GraphSyncConfig,
    batch_size: usize,
}

impl<Q, A> GraphSyncWorker<Q, A>
where
    Q: IGraphSyncQueueStorage + 'static,
    A: IGraphAdapter + 'static,
{
    pub fn new(
        queue: Arc<Q>,
        adapter: Option<Arc<A>>,
        envelope: Arc<ResilienceEnvelope>,
        config: GraphSyncConfig,
        batch_size: usize,
    ) -> Self {
        Self {
            queue,
            adapter,
            envelope,
            config,
            batch_size,
        }
    }

    /// Run one drain pass: claim a batch, apply each entry to the adapter,
    /// and resolve it to synced, rescheduled, or dead-lettered.
    pub async fn run_once(&self) -> CortexResult<usize> {
        let Some(adapter) = &self.adapter else {
            return Ok(0);
        };

        let batch = self.queue.claim_batch(self.batch_size).await?;
        let processed = batch.len();

        for entry in batch {
            self.apply_entry(adapter, &entry).await;
        }

        let cutoff = Utc::now() - chrono::Duration::seconds(self.config.synced_retention_secs);
        if let Err(err) = self.queue.reap_synced(cutoff).await {
            warn!(error = %err, "graph sync queue reap failed");
        }

        Ok(processed)
    }

    /// Run continuously at a fixed poll interval until cancelled.
    pub async fn run_forever(&self, poll_interval: Duration) {
        loop {
            match self.run_once().await {
                Ok(0) => tokio::time::sleep(poll_interval).await,
                Ok(_) => {}
                Err(err) => {
                    error!(error = %err, "graph sync drain pass failed");
                    tokio::time::sleep(poll_interval).await;
                }
            }
        }
    }

    async fn apply_entry(&self, adapter: &Arc<A>, entry: &GraphSyncQueueEntry) {
        let outcome = self
            .envelope
            .execute(
                Priority::Background,
                "graphsync:apply",
                Duration::from_secs(5),
                Duration::from_secs(30),
                || self.apply_once(adapter, entry),
            )
            .await;

        match outcome {
            Ok(()) => {
                if let Err(err) = self.queue.mark_synced(&entry.id).await {
                    warn!(error = %err, entry_id = %entry.id, "failed to mark graph sync entry synced");
                }
            }
            Err(err) => self.handle_failure(entry, err.to_string()).await,
        }
    }

    async fn apply_once(&self, adapter: &Arc<A>, entry: &GraphSyncQueueEntry) -> CortexResult<()> {
        match entry.operation {
            GraphSyncOperation::Insert | GraphSyncOperation::Update => {
                let props = entry.entity.clone().unwrap_or(serde_json::Value::Null);
                adapter.upsert_node(&entry.table, props).await?;
            }
            GraphSyncOperation::Delete => {
                adapter.delete_node(&entry.entity_id, true).await?;
            }
        }
        Ok(())
    }

    async fn handle_failure(&self, entry: &GraphSyncQueueEntry, error: String) {
        let attempts = entry.failed_attempts + 1;
        if attempts >= self.config.max_sync_attempts {
            warn!(entry_id = %entry.id, attempts, "graph sync entry dead-lettered");
            if let Err(err) = self.queue.mark_dead_lettered(&entry.id, &error).await {
                error!(error = %err, entry_id = %entry.id, "failed to dead-letter graph sync entry");
            }
            return;
        }

        let delay_ms = backoff_ms(attempts, self.config.backoff_base_ms, self.config.backoff_cap_ms);
        let next_attempt_at = Utc::now() + chrono::Duration::milliseconds(delay_ms as i64);
        info!(entry_id = %entry.id, attempts, delay_ms, "rescheduling graph sync entry");
        if let Err(err) = self
            .queue
            .mark_failed(&entry.id, &error, next_attempt_at)
            .await
        {
            error!(error = %err, entry_id = %entry.id, "failed to reschedule graph sync entry");
        }
    }
}

/// Raised when a sync is attempted with no adapter configured, for callers
/// that want to fail loudly rather than silently no-op (spec §6: "optional").
pub fn require_adapter_configured<A>(adapter: &Option<Arc<A>>) -> CortexResult<()> {
    if adapter.is_none() {
        return Err(GraphSyncError::AdapterNotConfigured.into());
    }
    Ok(())
}
