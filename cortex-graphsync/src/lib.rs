//! Graph sync worker (C7): drains `graphSyncQueue` to an optional external
//! native-graph adapter, with exponential backoff and dead-lettering.

mod backoff;
mod worker;

pub use backoff::backoff_ms;
pub use worker::{require_adapter_configured, GraphSyncWorker};
