use rusqlite::{params, Connection, OptionalExtension};

use cortex_core::errors::CortexResult;
use cortex_core::models::Memory;

use crate::to_storage_err;
use crate::vector::{bytes_to_embedding, cosine_similarity, embedding_to_bytes};

fn row_to_memory(data: String) -> CortexResult<Memory> {
    serde_json::from_str(&data).map_err(|e| to_storage_err(e.to_string()))
}

pub fn create(conn: &Connection, memory: &Memory) -> CortexResult<()> {
    let data = serde_json::to_string(memory).map_err(|e| to_storage_err(e.to_string()))?;
    let embedding = memory.embedding.as_deref().map(embedding_to_bytes);
    conn.execute(
        "INSERT INTO memories
            (memory_id, memory_space_id, content, content_type, embedding, source_type,
             importance, version, access_count, user_id, tenant_id, data, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            memory.memory_id,
            memory.memory_space_id,
            memory.content,
            serde_json::to_string(&memory.content_type).unwrap_or_default(),
            embedding,
            serde_json::to_string(&memory.source_type).unwrap_or_default(),
            memory.importance as i64,
            memory.version as i64,
            memory.access_count as i64,
            memory.user_id,
            memory.tenant_id,
            data,
            memory.created_at.to_rfc3339(),
            memory.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn create_bulk(conn: &mut Connection, memories: &[Memory]) -> CortexResult<usize> {
    let tx = conn.transaction().map_err(|e| to_storage_err(e.to_string()))?;
    for memory in memories {
        create(&tx, memory)?;
    }
    let count = memories.len();
    tx.commit().map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count)
}

pub fn get(conn: &Connection, memory_id: &str) -> CortexResult<Option<Memory>> {
    conn.query_row(
        "SELECT data FROM memories WHERE memory_id = ?1",
        params![memory_id],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .map(row_to_memory)
    .transpose()
}

pub fn update_content(
    conn: &Connection,
    memory_id: &str,
    content: String,
    embedding: Vec<f32>,
    retention: usize,
) -> CortexResult<u64> {
    let mut memory = get(conn, memory_id)?.ok_or_else(|| cortex_core::errors::StorageError::NotFound {
        collection: "memories".to_string(),
        id: memory_id.to_string(),
    })?;
    let has_embedding = !embedding.is_empty();
    memory.update_content(content, has_embedding.then_some(embedding), retention);

    let data = serde_json::to_string(&memory).map_err(|e| to_storage_err(e.to_string()))?;
    let embedding_blob = memory.embedding.as_deref().map(embedding_to_bytes);
    conn.execute(
        "UPDATE memories SET content = ?1, embedding = ?2, version = ?3, data = ?4, updated_at = ?5
         WHERE memory_id = ?6",
        params![
            memory.content,
            embedding_blob,
            memory.version as i64,
            data,
            memory.updated_at.to_rfc3339(),
            memory_id,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(memory.version)
}

pub fn record_access(conn: &Connection, memory_id: &str) -> CortexResult<()> {
    let mut memory = get(conn, memory_id)?.ok_or_else(|| cortex_core::errors::StorageError::NotFound {
        collection: "memories".to_string(),
        id: memory_id.to_string(),
    })?;
    memory.record_access();
    let data = serde_json::to_string(&memory).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "UPDATE memories SET access_count = ?1, data = ?2, updated_at = ?3 WHERE memory_id = ?4",
        params![
            memory.access_count as i64,
            data,
            memory.updated_at.to_rfc3339(),
            memory_id,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn delete(conn: &Connection, memory_id: &str) -> CortexResult<()> {
    conn.execute("DELETE FROM memories WHERE memory_id = ?1", params![memory_id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn list_by_space(conn: &Connection, memory_space_id: &str) -> CortexResult<Vec<Memory>> {
    let mut stmt = conn
        .prepare("SELECT data FROM memories WHERE memory_space_id = ?1 ORDER BY updated_at DESC")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![memory_space_id], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row_to_memory(row.map_err(|e| to_storage_err(e.to_string()))?)?);
    }
    Ok(out)
}

pub fn search_vector(
    conn: &Connection,
    memory_space_id: &str,
    embedding: &[f32],
    limit: usize,
) -> CortexResult<Vec<(Memory, f64)>> {
    let mut stmt = conn
        .prepare("SELECT data, embedding FROM memories WHERE memory_space_id = ?1 AND embedding IS NOT NULL")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![memory_space_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut scored = Vec::new();
    for row in rows {
        let (data, blob) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let memory = row_to_memory(data)?;
        let stored = bytes_to_embedding(&blob);
        let sim = cosine_similarity(embedding, &stored);
        scored.push((memory, sim));
    }
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    Ok(scored)
}

pub fn delete_for_user(conn: &Connection, user_id: &str) -> CortexResult<usize> {
    conn.execute(
        "DELETE FROM memories WHERE user_id = ?1 OR tenant_id = ?1",
        params![user_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
