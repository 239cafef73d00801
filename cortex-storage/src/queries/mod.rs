//! One module per collection (spec §3), each a thin layer of synchronous
//! rusqlite calls. The async trait impls in [`crate::backend`] wrap these
//! in `tokio::task::spawn_blocking`.

pub mod audit;
pub mod contexts;
pub mod conversations;
pub mod facts;
pub mod fact_history;
pub mod governance;
pub mod graph_sync_queue;
pub mod immutable;
pub mod memories;
pub mod memory_spaces;
pub mod mutable;
