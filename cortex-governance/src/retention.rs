use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use cortex_core::config::{GovernanceConfig, RetentionCombineMode, RetentionRule};
use cortex_core::errors::CortexResult;
use cortex_core::models::{
    AuditActor, AuditOperation, Fact, GovernanceEnforcement, Memory, Priority,
};
use cortex_core::traits::{IAuditStorage, IFactStorage, IGovernanceStorage, IMemoryStorage};
use cortex_resilience::ResilienceEnvelope;

const SEMAPHORE_TIMEOUT: Duration = Duration::from_secs(2);
const DEADLINE: Duration = Duration::from_secs(30);

/// One `governanceEnforcement` run's totals across both collections
/// (spec §4.8).
#[derive(Debug, Clone, Default)]
pub struct EnforcementReport {
    pub versions_deleted: usize,
    pub records_purged: usize,
    pub storage_freed_bytes: usize,
}

/// Applies [`RetentionRule`]s to facts and memories in a memory space.
///
/// Only superseded facts are ever candidates for deletion; the active
/// (non-superseded) version of a fact is excluded before rules are even
/// evaluated, since deleting it would leave any `FactsRef` pointing at it
/// unresolvable (the orphan that `GovernanceError::WouldOrphanPrimaryKey`
/// names).
pub struct RetentionEnforcer<S> {
    storage: Arc<S>,
    envelope: Arc<ResilienceEnvelope>,
    config: GovernanceConfig,
}

impl<S> RetentionEnforcer<S>
where
    S: IFactStorage + IMemoryStorage + IGovernanceStorage + IAuditStorage + 'static,
{
    pub fn new(storage: Arc<S>, envelope: Arc<ResilienceEnvelope>, config: GovernanceConfig) -> Self {
        Self { storage, envelope, config }
    }

    /// Run every configured rule against `memory_space_id`. Idempotent: a
    /// second run with no newly-eligible records purges nothing and still
    /// records a zeroed enforcement row.
    pub async fn enforce(&self, memory_space_id: &str) -> CortexResult<EnforcementReport> {
        let mut report = EnforcementReport::default();

        if let Some(rules) = self.config.rules.get("facts") {
            let collection_report = self.enforce_facts(memory_space_id, rules).await?;
            report.versions_deleted += collection_report.versions_deleted;
            report.records_purged += collection_report.records_purged;
            report.storage_freed_bytes += collection_report.storage_freed_bytes;
            self.record(memory_space_id, "facts", &collection_report).await?;
        }

        if let Some(rules) = self.config.rules.get("memories") {
            let collection_report = self.enforce_memories(memory_space_id, rules).await?;
            report.versions_deleted += collection_report.versions_deleted;
            report.records_purged += collection_report.records_purged;
            report.storage_freed_bytes += collection_report.storage_freed_bytes;
            self.record(memory_space_id, "memories", &collection_report).await?;
        }

        Ok(report)
    }

    async fn enforce_facts(&self, memory_space_id: &str, rules: &[RetentionRule]) -> CortexResult<EnforcementReport> {
        let facts = self
            .envelope
            .execute(Priority::Low, "governance:list_facts", SEMAPHORE_TIMEOUT, DEADLINE, || async {
                self.storage.list_facts_by_space(memory_space_id, true).await
            })
            .await?;

        let mut superseded: Vec<Fact> = facts.into_iter().filter(|f| f.superseded_by.is_some()).collect();
        superseded.sort_by_key(|f| f.updated_at);

        let mut report = EnforcementReport::default();
        for (rank, fact) in superseded.iter().enumerate() {
            let rank_from_newest = superseded.len() - 1 - rank;
            if !eligible(rules, self.config.combine_mode, fact.updated_at, rank_from_newest) {
                continue;
            }

            let rule = rules.first();
            if rule.map(|r| r.archive_before_delete).unwrap_or(true) {
                self.storage
                    .record(
                        "facts",
                        &fact.fact_id,
                        AuditOperation::Delete,
                        AuditActor::System,
                        Some(serde_json::json!({"reason": "retention_policy", "memory_space_id": memory_space_id})),
                    )
                    .await?;
            }

            let freed = serde_json::to_string(fact).map(|s| s.len()).unwrap_or(0);
            self.storage.delete_fact(&fact.fact_id).await?;
            report.versions_deleted += 1;
            report.storage_freed_bytes += freed;
            info!(fact_id = %fact.fact_id, memory_space_id, "retention: purged superseded fact");
        }

        Ok(report)
    }

    async fn enforce_memories(&self, memory_space_id: &str, rules: &[RetentionRule]) -> CortexResult<EnforcementReport> {
        let mut memories: Vec<Memory> = self
            .envelope
            .execute(Priority::Low, "governance:list_memories", SEMAPHORE_TIMEOUT, DEADLINE, || async {
                self.storage.list_memories_by_space(memory_space_id).await
            })
            .await?;
        memories.sort_by_key(|m| m.updated_at);

        let mut report = EnforcementReport::default();
        let total = memories.len();
        for (rank, memory) in memories.iter().enumerate() {
            let rank_from_newest = total - 1 - rank;
            if !eligible(rules, self.config.combine_mode, memory.updated_at, rank_from_newest) {
                continue;
            }

            let rule = rules.first();
            if rule.map(|r| r.archive_before_delete).unwrap_or(true) {
                self.storage
                    .record(
                        "memories",
                        &memory.memory_id,
                        AuditOperation::Delete,
                        AuditActor::System,
                        Some(serde_json::json!({"reason": "retention_policy", "memory_space_id": memory_space_id})),
                    )
                    .await?;
            }

            let freed = serde_json::to_string(memory).map(|s| s.len()).unwrap_or(0);
            self.storage.delete_memory(&memory.memory_id).await?;
            report.records_purged += 1;
            report.storage_freed_bytes += freed;
        }

        if report.records_purged == total && total > 0 {
            warn!(memory_space_id, "retention: purged every memory in the space, leaving it empty");
        }
        Ok(report)
    }

    async fn record(&self, memory_space_id: &str, collection: &str, report: &EnforcementReport) -> CortexResult<()> {
        let mut entry = GovernanceEnforcement::new(memory_space_id, collection);
        entry.versions_deleted = report.versions_deleted;
        entry.records_purged = report.records_purged;
        entry.storage_freed_bytes = report.storage_freed_bytes;
        self.storage.record_enforcement(&entry).await
    }
}

/// A record is eligible for cleanup per `mode` (spec §4.8: rules combine
/// by intersection unless configured to union). `rank_from_newest` counts
/// 0 for the most recently updated record in the set being evaluated, so
/// `max_count` and `max_versions` both mean "keep the `max` most recent,
/// the rest are eligible". The two names collapse to the same check here
/// because the public `Fact`/`Memory` API has no per-entity version chain
/// to distinguish "versions of one record" from "records in a space".
fn eligible(rules: &[RetentionRule], mode: RetentionCombineMode, updated_at: chrono::DateTime<Utc>, rank_from_newest: usize) -> bool {
    if rules.is_empty() {
        return false;
    }
    let now = Utc::now();
    let verdicts: Vec<bool> = rules
        .iter()
        .map(|rule| {
            let age_hit = rule.max_age_ms.map(|max| (now - updated_at).num_milliseconds() > max).unwrap_or(false);
            let count_hit = rule.max_count.map(|max| rank_from_newest >= max).unwrap_or(false);
            let versions_hit = rule.max_versions.map(|max| rank_from_newest >= max).unwrap_or(false);
            age_hit || count_hit || versions_hit
        })
        .collect();

    match mode {
        RetentionCombineMode::Union => verdicts.iter().any(|v| *v),
        RetentionCombineMode::Intersection => verdicts.iter().all(|v| *v),
    }
}
