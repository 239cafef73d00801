//! System-wide constants shared by every crate in the workspace.

/// Cortex system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default embedding dimension (spec §3, Memory.embedding).
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Default retention: number of `previousVersions` kept per memory.
pub const DEFAULT_MEMORY_VERSION_RETENTION: usize = 10;

/// Default retention: number of `previousVersions` kept per immutable record.
pub const DEFAULT_IMMUTABLE_VERSION_RETENTION: usize = 20;

/// Default retention: number of `previousVersions` kept per context.
pub const DEFAULT_CONTEXT_VERSION_RETENTION: usize = 10;

/// Maximum batch size for bulk operations.
pub const MAX_BULK_BATCH_SIZE: usize = 1000;

/// Default idempotency-key retention window (spec §5).
pub const DEFAULT_IDEMPOTENCY_WINDOW_SECS: i64 = 5 * 60;

/// Default optimistic-concurrency retry count for mutable records (spec §5, §7).
pub const DEFAULT_CONFLICT_RETRY_COUNT: u32 = 3;
