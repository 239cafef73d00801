//! Belief revision pipeline (C4, spec §4.4): three deterministic-then-LLM
//! stages that decide whether a newly-extracted candidate fact should be
//! skipped as a duplicate, superseded over an existing fact, merged into
//! one, or created fresh — always recording the outcome in `factHistory`.

mod adjudicate;
mod pipeline;
mod semantic;
mod slot;

pub use adjudicate::Adjudication;
pub use pipeline::{BeliefRevisionPipeline, RevisionResult};
