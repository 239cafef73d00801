use rusqlite::{params, Connection, OptionalExtension};

use cortex_core::errors::{CortexResult, StorageError};
use cortex_core::models::{Conversation, Message};

use crate::to_storage_err;

pub fn create(conn: &Connection, conversation: &Conversation) -> CortexResult<()> {
    let data = serde_json::to_string(conversation).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT INTO conversations
            (conversation_id, memory_space_id, participant_id, conversation_type,
             message_count, tenant_id, data, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            conversation.conversation_id,
            conversation.memory_space_id,
            conversation.participant_id,
            serde_json::to_string(&conversation.conversation_type).unwrap_or_default(),
            conversation.message_count as i64,
            conversation.tenant_id,
            data,
            conversation.created_at.to_rfc3339(),
            conversation.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get(conn: &Connection, conversation_id: &str) -> CortexResult<Option<Conversation>> {
    conn.query_row(
        "SELECT data FROM conversations WHERE conversation_id = ?1",
        params![conversation_id],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .map(|data| serde_json::from_str(&data).map_err(|e| to_storage_err(e.to_string())))
    .transpose()
}

pub fn append_message(conn: &Connection, conversation_id: &str, message: &Message) -> CortexResult<()> {
    let mut conversation = get(conn, conversation_id)?.ok_or_else(|| StorageError::NotFound {
        collection: "conversations".to_string(),
        id: conversation_id.to_string(),
    })?;
    conversation.messages.push(message.clone());
    conversation.message_count = conversation.messages.len();
    conversation.updated_at = chrono::Utc::now();

    let data = serde_json::to_string(&conversation).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "UPDATE conversations SET data = ?1, message_count = ?2, updated_at = ?3
         WHERE conversation_id = ?4",
        params![
            data,
            conversation.message_count as i64,
            conversation.updated_at.to_rfc3339(),
            conversation_id,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Append several messages in one read-modify-write of the conversation
/// row (spec §4.6 step 1), rather than one round trip per message.
pub fn append_messages(conn: &Connection, conversation_id: &str, messages: &[Message]) -> CortexResult<Vec<String>> {
    let mut conversation = get(conn, conversation_id)?.ok_or_else(|| StorageError::NotFound {
        collection: "conversations".to_string(),
        id: conversation_id.to_string(),
    })?;
    let ids: Vec<String> = messages.iter().map(|m| m.id.clone()).collect();
    conversation.messages.extend(messages.iter().cloned());
    conversation.message_count = conversation.messages.len();
    conversation.updated_at = chrono::Utc::now();

    let data = serde_json::to_string(&conversation).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "UPDATE conversations SET data = ?1, message_count = ?2, updated_at = ?3
         WHERE conversation_id = ?4",
        params![
            data,
            conversation.message_count as i64,
            conversation.updated_at.to_rfc3339(),
            conversation_id,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(ids)
}

pub fn list_by_participant(conn: &Connection, participant_id: &str) -> CortexResult<Vec<Conversation>> {
    let mut stmt = conn
        .prepare("SELECT data FROM conversations WHERE participant_id = ?1 ORDER BY updated_at DESC")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![participant_id], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let data = row.map_err(|e| to_storage_err(e.to_string()))?;
        out.push(serde_json::from_str(&data).map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(out)
}

pub fn delete(conn: &Connection, conversation_id: &str) -> CortexResult<()> {
    conn.execute(
        "DELETE FROM conversations WHERE conversation_id = ?1",
        params![conversation_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// GDPR cascade helper: delete every conversation whose participant or
/// tenant matches `user_id` (spec §4.8).
pub fn delete_for_user(conn: &Connection, user_id: &str) -> CortexResult<usize> {
    conn.execute(
        "DELETE FROM conversations WHERE participant_id = ?1 OR tenant_id = ?1",
        params![user_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
