//! Multi-source recall engine (C5, spec §4.5): fans a query out to up to
//! three sources — vector k-NN over memories, keyword search over facts,
//! and an optional native-graph expansion — under a per-source timeout and
//! a total deadline, then fuses and ranks the merged results.

mod context;
mod engine;
mod ranking;
mod sources;

pub use context::to_context_string;
pub use engine::{RecallEngine, RecallQuery};
pub use ranking::score;
pub use sources::SourceStats;

use cortex_core::models::{Fact, Memory};
use cortex_core::traits::GraphNode;

/// The fused, ranked recall result (spec §4.5 result shape).
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct RecallResult {
    pub memories: Vec<(Memory, f64)>,
    pub facts: Vec<(Fact, f64)>,
    pub graph_entities: Vec<GraphNode>,
    pub sources: std::collections::HashMap<String, SourceStats>,
    pub total_results: usize,
}
