//! Retention-rule enforcement and GDPR cascade (C8, spec §4.8).

mod gdpr;
mod retention;

pub use gdpr::{CascadeReport, GdprCascade};
pub use retention::{EnforcementReport, RetentionEnforcer};
