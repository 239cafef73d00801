//! Retention enforcement (spec §4.8) against a real SQLite backend: only
//! superseded facts and purge-eligible memories are ever removed.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use cortex_core::config::{GovernanceConfig, ResilienceConfig, RetentionCombineMode, RetentionRule};
use cortex_core::models::{ContentType, FactType, Memory, SourceType};
use cortex_core::traits::{IFactStorage, IMemoryStorage, IStorageBackend};
use cortex_governance::RetentionEnforcer;
use cortex_resilience::ResilienceEnvelope;
use cortex_storage::SqliteBackend;

async fn backend() -> (Arc<SqliteBackend>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let backend = Arc::new(SqliteBackend::open(&dir.path().join("cortex.db"), 4).expect("open"));
    backend.migrate().await.expect("migrate");
    (backend, dir)
}

#[tokio::test]
async fn purges_old_superseded_facts_but_keeps_the_active_one() {
    let (backend, _dir) = backend().await;

    let mut old_fact = cortex_core::models::Fact::new("space-1", "likes jazz", FactType::Preference, SourceType::Conversation);
    old_fact.updated_at = Utc::now() - ChronoDuration::days(400);
    backend.create_fact(&old_fact).await.expect("create old");

    let new_fact = cortex_core::models::Fact::new("space-1", "loves jazz", FactType::Preference, SourceType::Conversation);
    backend.create_fact(&new_fact).await.expect("create new");
    backend.supersede(&old_fact.fact_id, &new_fact.fact_id).await.expect("supersede");

    let mut rules = HashMap::new();
    rules.insert(
        "facts".to_string(),
        vec![RetentionRule {
            max_versions: None,
            max_age_ms: Some(ChronoDuration::days(365).num_milliseconds()),
            max_count: None,
            archive_before_delete: true,
        }],
    );
    let config = GovernanceConfig {
        rules,
        combine_mode: RetentionCombineMode::Union,
        gdpr_batch_size: 500,
    };
    let envelope = Arc::new(ResilienceEnvelope::new(&ResilienceConfig::default()));
    let enforcer = RetentionEnforcer::new(backend.clone(), envelope, config);

    let report = enforcer.enforce("space-1").await.expect("enforce");
    assert_eq!(report.versions_deleted, 1);

    assert!(backend.get_fact(&old_fact.fact_id).await.expect("get").is_none());
    assert!(backend.get_fact(&new_fact.fact_id).await.expect("get").is_some());
}

#[tokio::test]
async fn second_run_is_idempotent() {
    let (backend, _dir) = backend().await;

    let old_fact = cortex_core::models::Fact::new("space-1", "likes jazz", FactType::Preference, SourceType::Conversation);
    backend.create_fact(&old_fact).await.expect("create");

    let mut rules = HashMap::new();
    rules.insert(
        "facts".to_string(),
        vec![RetentionRule {
            max_versions: None,
            max_age_ms: Some(1),
            max_count: None,
            archive_before_delete: true,
        }],
    );
    let config = GovernanceConfig {
        rules,
        combine_mode: RetentionCombineMode::Union,
        gdpr_batch_size: 500,
    };
    let envelope = Arc::new(ResilienceEnvelope::new(&ResilienceConfig::default()));
    let enforcer = RetentionEnforcer::new(backend.clone(), envelope, config);

    // The fact is active (never superseded), so no rule run ever deletes it.
    let first = enforcer.enforce("space-1").await.expect("first run");
    let second = enforcer.enforce("space-1").await.expect("second run");
    assert_eq!(first.versions_deleted, 0);
    assert_eq!(second.versions_deleted, 0);
    assert!(backend.get_fact(&old_fact.fact_id).await.expect("get").is_some());
}

#[tokio::test]
async fn purges_memories_past_max_count() {
    let (backend, _dir) = backend().await;

    let mut ids = Vec::new();
    for i in 0..5 {
        let mut memory = Memory::new("space-1", format!("memory {i}"), ContentType::Raw, SourceType::Conversation);
        memory.updated_at = Utc::now() - ChronoDuration::minutes(5 - i);
        ids.push(memory.memory_id.clone());
        backend.create_memory(&memory).await.expect("create");
    }

    let mut rules = HashMap::new();
    rules.insert(
        "memories".to_string(),
        vec![RetentionRule {
            max_versions: None,
            max_age_ms: None,
            max_count: Some(2),
            archive_before_delete: true,
        }],
    );
    let config = GovernanceConfig {
        rules,
        combine_mode: RetentionCombineMode::Union,
        gdpr_batch_size: 500,
    };
    let envelope = Arc::new(ResilienceEnvelope::new(&ResilienceConfig::default()));
    let enforcer = RetentionEnforcer::new(backend.clone(), envelope, config);

    let report = enforcer.enforce("space-1").await.expect("enforce");
    assert_eq!(report.records_purged, 3);

    let remaining = backend.list_memories_by_space("space-1").await.expect("list");
    assert_eq!(remaining.len(), 2);
}
