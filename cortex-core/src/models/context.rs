use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::ContextStatus;
use super::ids::new_context_id;

/// A cross-space access grant (spec §3, Context.grantedAccess).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantedAccess {
    pub memory_space_id: String,
    pub scope: String,
    pub granted_at: DateTime<Utc>,
}

/// One prior state of a context, retained for `retention` updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextVersionSnapshot {
    pub version: u64,
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Coordination entity forming a tree of delegated work (spec §3, Context;
/// §GLOSSARY "Collaboration mode").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    pub context_id: String,
    pub memory_space_id: String,
    pub purpose: String,
    pub user_id: Option<String>,
    pub parent_id: Option<String>,
    pub root_id: String,
    pub depth: u32,
    pub child_ids: Vec<String>,
    pub status: ContextStatus,
    pub participants: Vec<String>,
    pub granted_access: Vec<GrantedAccess>,
    pub version: u64,
    pub previous_versions: Vec<ContextVersionSnapshot>,
    pub tenant_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Context {
    /// Create a root context: `depth == 0`, `root_id == context_id`, no parent
    /// (spec §3 invariant).
    pub fn new_root(memory_space_id: impl Into<String>, purpose: impl Into<String>) -> Self {
        let id = new_context_id();
        let now = Utc::now();
        Self {
            root_id: id.clone(),
            context_id: id,
            memory_space_id: memory_space_id.into(),
            purpose: purpose.into(),
            user_id: None,
            parent_id: None,
            depth: 0,
            child_ids: Vec::new(),
            status: ContextStatus::Active,
            participants: Vec::new(),
            granted_access: Vec::new(),
            version: 1,
            previous_versions: Vec::new(),
            tenant_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a child context under `parent`, inheriting `root_id` and
    /// incrementing `depth` by exactly one (spec §3 invariant: strictly
    /// increasing depth along the `parentId` path to `rootId`).
    pub fn new_child(parent: &Context, purpose: impl Into<String>) -> Self {
        let id = new_context_id();
        let now = Utc::now();
        Self {
            context_id: id,
            memory_space_id: parent.memory_space_id.clone(),
            purpose: purpose.into(),
            user_id: parent.user_id.clone(),
            parent_id: Some(parent.context_id.clone()),
            root_id: parent.root_id.clone(),
            depth: parent.depth + 1,
            child_ids: Vec::new(),
            status: ContextStatus::Active,
            participants: Vec::new(),
            granted_access: Vec::new(),
            version: 1,
            previous_versions: Vec::new(),
            tenant_id: parent.tenant_id.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}
