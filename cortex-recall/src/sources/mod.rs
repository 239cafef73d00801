mod facts;
mod graph;
mod vector;

pub(crate) use facts::search_facts;
pub(crate) use graph::search_graph;
pub(crate) use vector::search_vector;

/// Per-source outcome for the `sources` field of [`crate::RecallResult`]
/// (spec §4.5): a source failure is recorded here and never aborts the
/// whole recall.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SourceStats {
    pub count: usize,
    pub latency_ms: u64,
    pub error: Option<String>,
}
