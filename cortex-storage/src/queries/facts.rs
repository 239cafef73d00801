use rusqlite::{params, Connection, OptionalExtension};

use cortex_core::errors::{CortexResult, StorageError};
use cortex_core::models::Fact;

use crate::to_storage_err;
use crate::vector::{bytes_to_embedding, cosine_similarity, embedding_to_bytes};

fn row_to_fact(data: String) -> CortexResult<Fact> {
    serde_json::from_str(&data).map_err(|e| to_storage_err(e.to_string()))
}

/// `embedding` is also mirrored into its own indexed column so
/// `search_candidates` can scan it without deserializing every `data` blob
/// (spec §4.4 Stage 2: "query active facts... for nearest neighbours").
pub fn create(conn: &Connection, fact: &Fact) -> CortexResult<()> {
    let data = serde_json::to_string(fact).map_err(|e| to_storage_err(e.to_string()))?;
    let embedding = fact.embedding.as_deref().map(embedding_to_bytes);
    conn.execute(
        "INSERT INTO facts
            (fact_id, memory_space_id, user_id, fact, fact_type, slot_key, confidence,
             version, superseded_by, supersedes, tenant_id, embedding, data, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            fact.fact_id,
            fact.memory_space_id,
            fact.user_id,
            fact.fact,
            serde_json::to_string(&fact.fact_type).unwrap_or_default(),
            fact.slot_key(),
            fact.confidence as i64,
            fact.version as i64,
            fact.superseded_by,
            fact.supersedes,
            fact.tenant_id,
            embedding,
            data,
            fact.created_at.to_rfc3339(),
            fact.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get(conn: &Connection, fact_id: &str) -> CortexResult<Option<Fact>> {
    conn.query_row(
        "SELECT data FROM facts WHERE fact_id = ?1",
        params![fact_id],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .map(row_to_fact)
    .transpose()
}

pub fn find_by_slot_key(conn: &Connection, memory_space_id: &str, slot_key: &str) -> CortexResult<Vec<Fact>> {
    let mut stmt = conn
        .prepare("SELECT data FROM facts WHERE memory_space_id = ?1 AND slot_key = ?2")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![memory_space_id, slot_key], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row_to_fact(row.map_err(|e| to_storage_err(e.to_string()))?)?);
    }
    Ok(out)
}

pub fn search_candidates(
    conn: &Connection,
    memory_space_id: &str,
    embedding: &[f32],
    limit: usize,
) -> CortexResult<Vec<(Fact, f64)>> {
    let mut stmt = conn
        .prepare("SELECT data, embedding FROM facts WHERE memory_space_id = ?1 AND embedding IS NOT NULL")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![memory_space_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut scored = Vec::new();
    for row in rows {
        let (data, blob) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let fact = row_to_fact(data)?;
        let sim = cosine_similarity(embedding, &bytes_to_embedding(&blob));
        scored.push((fact, sim));
    }
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    Ok(scored)
}

pub fn update(conn: &Connection, fact: &Fact) -> CortexResult<()> {
    let data = serde_json::to_string(fact).map_err(|e| to_storage_err(e.to_string()))?;
    let embedding = fact.embedding.as_deref().map(embedding_to_bytes);
    conn.execute(
        "UPDATE facts SET fact = ?1, confidence = ?2, slot_key = ?3, version = ?4,
            superseded_by = ?5, supersedes = ?6, embedding = ?7, data = ?8, updated_at = ?9
         WHERE fact_id = ?10",
        params![
            fact.fact,
            fact.confidence as i64,
            fact.slot_key(),
            fact.version as i64,
            fact.superseded_by,
            fact.supersedes,
            embedding,
            data,
            fact.updated_at.to_rfc3339(),
            fact.fact_id,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Mark `old_fact_id` as superseded and point it at `new_fact_id`, without
/// rewriting any memory that still references the old fact (spec §4.3).
pub fn supersede(conn: &Connection, old_fact_id: &str, new_fact_id: &str) -> CortexResult<()> {
    let mut old = get(conn, old_fact_id)?.ok_or_else(|| StorageError::NotFound {
        collection: "facts".to_string(),
        id: old_fact_id.to_string(),
    })?;
    old.superseded_by = Some(new_fact_id.to_string());
    old.updated_at = chrono::Utc::now();
    update(conn, &old)
}

pub fn list_by_space(conn: &Connection, memory_space_id: &str, include_superseded: bool) -> CortexResult<Vec<Fact>> {
    let sql = if include_superseded {
        "SELECT data FROM facts WHERE memory_space_id = ?1 ORDER BY updated_at DESC"
    } else {
        "SELECT data FROM facts WHERE memory_space_id = ?1 AND superseded_by IS NULL ORDER BY updated_at DESC"
    };
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![memory_space_id], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row_to_fact(row.map_err(|e| to_storage_err(e.to_string()))?)?);
    }
    Ok(out)
}

pub fn delete(conn: &Connection, fact_id: &str) -> CortexResult<()> {
    conn.execute("DELETE FROM facts WHERE fact_id = ?1", params![fact_id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn delete_for_user(conn: &Connection, user_id: &str) -> CortexResult<usize> {
    conn.execute(
        "DELETE FROM facts WHERE user_id = ?1 OR tenant_id = ?1",
        params![user_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
