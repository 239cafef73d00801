//! Numeric defaults named explicitly in spec.md, collected in one place so
//! every `Default` impl in `config/` cites the same constant.

// Resilience (spec §4.1)
pub const DEFAULT_TOKENS_PER_SECOND: u32 = 100;
pub const DEFAULT_MAX_BURST_MULTIPLIER: u32 = 2;
pub const DEFAULT_SEMAPHORE_CEILING: usize = 16;
pub const MAX_SEMAPHORE_CEILING: usize = 256;
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;
pub const DEFAULT_CIRCUIT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_HALF_OPEN_MAX: u32 = 3;
pub const DEFAULT_SUCCESS_THRESHOLD: u32 = 2;

// Storage / versioning (spec §3, §4.2, §5)
pub const DEFAULT_MEMORY_RETENTION: usize = 10;
pub const DEFAULT_IMMUTABLE_RETENTION: usize = 20;
pub const DEFAULT_CONTEXT_RETENTION: usize = 10;
pub const DEFAULT_CONFLICT_RETRIES: u32 = 3;
pub const DEFAULT_IDEMPOTENCY_WINDOW_SECS: i64 = 300;
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

// Belief revision (spec §4.4)
pub const DEFAULT_SEMANTIC_SIMILARITY_THRESHOLD: f64 = 0.88;

// Recall ranking (spec §4.5)
pub const DEFAULT_WEIGHT_SIMILARITY: f64 = 0.50;
pub const DEFAULT_WEIGHT_IMPORTANCE: f64 = 0.20;
pub const DEFAULT_WEIGHT_CONFIDENCE: f64 = 0.20;
pub const DEFAULT_WEIGHT_RECENCY: f64 = 0.15;
pub const DEFAULT_WEIGHT_ACCESS: f64 = 0.05;
pub const DEFAULT_WEIGHT_MULTI_SOURCE: f64 = 0.10;
pub const DEFAULT_RECENCY_HALF_LIFE_SECS: f64 = 7.0 * 24.0 * 3600.0;
pub const DEFAULT_ACCESS_LOG_K: f64 = 10.0;
pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_PER_SOURCE_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_TOTAL_DEADLINE_MS: u64 = 5_000;
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.0;

// Graph sync (spec §4.7)
pub const DEFAULT_MAX_SYNC_ATTEMPTS: u32 = 10;
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 1_000;
pub const DEFAULT_BACKOFF_CAP_MS: u64 = 5 * 60 * 1_000;
pub const DEFAULT_SYNCED_RETENTION_SECS: i64 = 60;

// Governance (spec §4.8)
pub const DEFAULT_GDPR_BATCH_SIZE: usize = 500;
