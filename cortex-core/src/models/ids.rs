//! Identifier helpers. Every collection key in spec §3 is a plain string;
//! these helpers keep generation consistent across crates.

use chrono::Utc;
use uuid::Uuid;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn new_prefixed_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Context ids must match `^ctx-\d+-[a-z0-9]+$` (spec §3, Context).
pub fn new_context_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ctx-{millis}-{}", &suffix[..12])
}

/// Validate a context id against the required shape without pulling in `regex`
/// for a single fixed pattern.
pub fn is_valid_context_id(id: &str) -> bool {
    let Some(rest) = id.strip_prefix("ctx-") else {
        return false;
    };
    let mut parts = rest.splitn(2, '-');
    let Some(ts) = parts.next() else { return false };
    let Some(suffix) = parts.next() else {
        return false;
    };
    !ts.is_empty()
        && ts.chars().all(|c| c.is_ascii_digit())
        && !suffix.is_empty()
        && suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}
