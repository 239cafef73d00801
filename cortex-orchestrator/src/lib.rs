//! `remember`/`recall` facade (C6, spec §4.6): the orchestrator composes
//! the conversation, memory, belief revision, and graph sync primitives
//! built by the other crates into one logical write-and-read surface.

mod extract;
mod remember;

pub use extract::FactCandidate;
pub use remember::{Orchestrator, RememberRequest, RememberResult};

pub use cortex_recall::{RecallQuery, RecallResult};
