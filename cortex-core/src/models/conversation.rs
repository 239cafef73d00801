use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{ConversationType, MessageRole};
use super::ids::new_id;

/// A single participant reference attached to a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: Option<String>,
    pub agent_id: Option<String>,
    pub memory_space_id: Option<String>,
}

/// One message in a conversation (spec §3, Conversation.messages).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub participant_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            participant_id: None,
            metadata: None,
        }
    }
}

/// Layer 1a: append-only conversation record (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation_id: String,
    pub memory_space_id: String,
    pub participant_id: Option<String>,
    pub conversation_type: ConversationType,
    pub participants: Vec<Participant>,
    pub messages: Vec<Message>,
    pub message_count: usize,
    pub tenant_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(memory_space_id: impl Into<String>, conversation_type: ConversationType) -> Self {
        let now = Utc::now();
        Self {
            conversation_id: new_id(),
            memory_space_id: memory_space_id.into(),
            participant_id: None,
            conversation_type,
            participants: Vec::new(),
            messages: Vec::new(),
            message_count: 0,
            tenant_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message, keeping `message_count` in sync (spec §3 invariant:
    /// `messageCount == |messages|`, new messages only append).
    pub fn append(&mut self, message: Message) -> String {
        let id = message.id.clone();
        self.messages.push(message);
        self.message_count = self.messages.len();
        self.updated_at = Utc::now();
        id
    }

    /// Return the subset of `ids` that are NOT present in this conversation's
    /// message list (used to enforce the `conversationRef.messageIds` invariant).
    pub fn missing_message_ids(&self, ids: &[String]) -> Vec<String> {
        ids.iter()
            .filter(|id| !self.messages.iter().any(|m| &m.id == *id))
            .cloned()
            .collect()
    }
}
