//! Shared builders for the Cortex model types, for use in integration tests
//! across crates that need a populated `Conversation`/`Memory`/`Fact`/etc.
//! without repeating the same constructor boilerplate in every test module.

use cortex_core::models::{
    Context, Conversation, ConversationType, FactType, ImmutableRecord, Memory, MemorySpace,
    MemorySpaceType, Message, MessageRole, MutableRecord, SourceType,
};

/// A memory space with no parent, ready to anchor a conversation/memory/fact.
pub fn sample_memory_space() -> MemorySpace {
    MemorySpace::new(MemorySpaceType::Personal)
}

/// A conversation with one user message and one agent reply, both attributed
/// to `participant_id`.
pub fn sample_conversation(memory_space_id: &str, participant_id: &str) -> Conversation {
    let mut conversation = Conversation::new(memory_space_id, ConversationType::UserAgent);
    conversation.participant_id = Some(participant_id.to_string());

    let mut user_msg = Message::new(MessageRole::User, "what's the weather in Lisbon?");
    user_msg.participant_id = Some(participant_id.to_string());
    conversation.append(user_msg);

    let agent_msg = Message::new(MessageRole::Agent, "sunny and 24C right now.");
    conversation.append(agent_msg);

    conversation
}

/// A memory attributed to `user_id`, with a non-default importance so tests
/// exercising importance-ranked recall have something to distinguish.
pub fn sample_memory(memory_space_id: &str, user_id: &str) -> Memory {
    let mut memory = Memory::new(
        memory_space_id,
        "user prefers window seats on long flights",
        cortex_core::models::ContentType::Raw,
        SourceType::Conversation,
    );
    memory.user_id = Some(user_id.to_string());
    memory.importance = 70;
    memory
}

/// A fact attributed to `user_id`, not yet superseded.
pub fn sample_fact(memory_space_id: &str, user_id: &str) -> cortex_core::models::Fact {
    let mut fact = cortex_core::models::Fact::new(
        memory_space_id,
        "prefers window seats",
        FactType::Preference,
        SourceType::Conversation,
    );
    fact.user_id = Some(user_id.to_string());
    fact
}

/// A root context for a memory space, the entry point of a context tree.
pub fn sample_context(memory_space_id: &str) -> Context {
    Context::new_root(memory_space_id, "trip planning")
}

/// An immutable record under a record type, keyed by an explicit id.
pub fn sample_immutable_record(record_type: &str, id: &str) -> ImmutableRecord {
    ImmutableRecord::new(record_type, id, serde_json::json!({"status": "confirmed"}))
}

/// A mutable key/value record in a namespace.
pub fn sample_mutable_record(namespace: &str, key: &str) -> MutableRecord {
    MutableRecord::new(namespace, key, serde_json::json!({"value": 42}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_conversation_has_two_messages_from_the_same_participant() {
        let conversation = sample_conversation("space-1", "user-1");
        assert_eq!(conversation.message_count, 2);
        assert_eq!(conversation.participant_id.as_deref(), Some("user-1"));
        assert_eq!(conversation.messages[0].participant_id.as_deref(), Some("user-1"));
    }

    #[test]
    fn sample_memory_and_fact_share_the_same_user() {
        let memory = sample_memory("space-1", "user-1");
        let fact = sample_fact("space-1", "user-1");
        assert_eq!(memory.user_id.as_deref(), fact.user_id.as_deref());
        assert_eq!(memory.memory_space_id, fact.memory_space_id);
    }

    #[test]
    fn sample_context_is_a_root_with_no_parent() {
        let context = sample_context("space-1");
        assert!(context.parent_id.is_none());
    }
}
