//! # cortex-core
//!
//! Foundation crate for the Cortex memory substrate.
//! Defines all types, traits, errors, config, and constants shared by
//! every other crate in the workspace.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

pub use config::CortexConfig;
pub use errors::{CortexError, CortexResult};
