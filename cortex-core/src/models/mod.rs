//! Data model (spec §3). One module per collection, plus shared enums,
//! id helpers, and ambient audit/health models.

pub mod audit;
pub mod context;
pub mod conversation;
pub mod enums;
pub mod fact;
pub mod fact_history;
pub mod governance;
pub mod graph_sync_queue;
pub mod health;
pub mod ids;
pub mod immutable;
pub mod memory;
pub mod memory_space;
pub mod mutable;

pub use audit::{AuditActor, AuditEntry, AuditOperation};
pub use context::{Context, ContextVersionSnapshot, GrantedAccess};
pub use conversation::{Conversation, Message, Participant};
pub use enums::{
    BeliefOutcome, ContentType, ContextStatus, ConversationType, FactHistoryAction, FactType,
    GraphSyncOperation, MemorySpaceStatus, MemorySpaceType, MessageRole, Priority, SourceType,
};
pub use fact::{canonicalize, Fact, FactEnrichment, SourceRef, TemporalWindow, Triple};
pub use fact_history::{FactHistoryEntry, PipelineFlags};
pub use governance::{GdprCascadeJob, GovernanceEnforcement};
pub use graph_sync_queue::GraphSyncQueueEntry;
pub use health::{CircuitMetrics, CircuitState, HealthReport};
pub use immutable::{ImmutableRecord, ImmutableVersionSnapshot};
pub use memory::{ConversationRef, FactsRef, ImmutableRef, Memory, MemoryVersionSnapshot, MutableRef};
pub use memory_space::MemorySpace;
pub use mutable::MutableRecord;
