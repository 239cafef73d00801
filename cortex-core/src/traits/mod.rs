//! Capability-typed seams between components (spec §9: "components
//! interact through capability-typed handles"). Every trait here is
//! `async` and `Send + Sync` so it can be shared behind an `Arc` across
//! the tokio runtime.

mod embedding;
mod graph_adapter;
mod llm;
mod storage;

pub use embedding::IEmbeddingProvider;
pub use graph_adapter::{GraphNode, IGraphAdapter};
pub use llm::{ChatMessage, ChatOptions, ILlmProvider};
pub use storage::{
    IAuditStorage, IConversationStorage, IContextStorage, IFactHistoryStorage, IFactStorage,
    IGovernanceStorage, IGraphSyncQueueStorage, IImmutableStorage, IMemorySpaceStorage,
    IMemoryStorage, IMutableStorage, IStorageBackend,
};
