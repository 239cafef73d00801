//! CRUD round-trips against the seven collections plus the ambient audit log.

use cortex_core::models::{
    Conversation, ContentType, ConversationType, Fact, FactType, Memory, MemorySpace,
    MemorySpaceStatus, MemorySpaceType, Message, MessageRole, SourceType,
};
use cortex_core::traits::{
    IConversationStorage, IFactStorage, IMemorySpaceStorage, IMemoryStorage, IStorageBackend,
};
use cortex_storage::SqliteBackend;

async fn open_backend() -> (SqliteBackend, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let backend = SqliteBackend::open(&dir.path().join("cortex.db"), 4).expect("open backend");
    backend.migrate().await.expect("migrate");
    (backend, dir)
}

#[tokio::test]
async fn conversation_append_keeps_count_in_sync() {
    let (backend, _dir) = open_backend().await;
    let space = MemorySpace::new(MemorySpaceType::Personal);
    backend.create_memory_space(&space).await.expect("create space");

    let conversation = Conversation::new(&space.memory_space_id, ConversationType::UserAgent);
    let id = conversation.conversation_id.clone();
    backend.create_conversation(&conversation).await.expect("create conversation");

    backend
        .append_message(&id, &Message::new(MessageRole::User, "hello"))
        .await
        .expect("append");
    backend
        .append_message(&id, &Message::new(MessageRole::Agent, "hi there"))
        .await
        .expect("append");

    let loaded = backend.get_conversation(&id).await.expect("get").expect("found");
    assert_eq!(loaded.message_count, 2);
    assert_eq!(loaded.messages.len(), 2);
}

#[tokio::test]
async fn memory_create_and_fetch_round_trips() {
    let (backend, _dir) = open_backend().await;
    let space = MemorySpace::new(MemorySpaceType::Personal);
    backend.create_memory_space(&space).await.expect("create space");

    let mut memory = Memory::new(&space.memory_space_id, "user prefers dark mode", ContentType::Raw, SourceType::Conversation);
    memory.embedding = Some(vec![0.1, 0.2, 0.3]);
    backend.create_memory(&memory).await.expect("create memory");

    let loaded = backend
        .get_memory(&memory.memory_id)
        .await
        .expect("get")
        .expect("found");
    assert_eq!(loaded.content, memory.content);
    assert_eq!(loaded.embedding, memory.embedding);
    assert_eq!(loaded.version, 1);
}

#[tokio::test]
async fn memory_update_content_bumps_version_and_snapshots_prior() {
    let (backend, _dir) = open_backend().await;
    let space = MemorySpace::new(MemorySpaceType::Personal);
    backend.create_memory_space(&space).await.expect("create space");

    let memory = Memory::new(&space.memory_space_id, "first draft", ContentType::Raw, SourceType::Conversation);
    backend.create_memory(&memory).await.expect("create memory");

    let new_version = backend
        .update_memory_content(&memory.memory_id, "revised draft".to_string(), vec![], 10)
        .await
        .expect("update content");
    assert_eq!(new_version, 2);

    let loaded = backend.get_memory(&memory.memory_id).await.expect("get").expect("found");
    assert_eq!(loaded.content, "revised draft");
    assert_eq!(loaded.previous_versions.len(), 1);
    assert_eq!(loaded.previous_versions[0].content, "first draft");
}

#[tokio::test]
async fn memory_bulk_insert_commits_as_one_transaction() {
    let (backend, _dir) = open_backend().await;
    let space = MemorySpace::new(MemorySpaceType::Personal);
    backend.create_memory_space(&space).await.expect("create space");

    let memories: Vec<Memory> = (0..20)
        .map(|i| Memory::new(&space.memory_space_id, format!("memory {i}"), ContentType::Raw, SourceType::Conversation))
        .collect();
    let inserted = backend.create_memories_bulk(&memories).await.expect("bulk insert");
    assert_eq!(inserted, 20);

    let listed = backend.list_memories_by_space(&space.memory_space_id).await.expect("list");
    assert_eq!(listed.len(), 20);
}

#[tokio::test]
async fn memory_search_vector_ranks_by_cosine_similarity() {
    let (backend, _dir) = open_backend().await;
    let space = MemorySpace::new(MemorySpaceType::Personal);
    backend.create_memory_space(&space).await.expect("create space");

    let mut close = Memory::new(&space.memory_space_id, "close match", ContentType::Raw, SourceType::Conversation);
    close.embedding = Some(vec![1.0, 0.0, 0.0]);
    let mut far = Memory::new(&space.memory_space_id, "far match", ContentType::Raw, SourceType::Conversation);
    far.embedding = Some(vec![0.0, 1.0, 0.0]);
    backend.create_memory(&close).await.expect("create close");
    backend.create_memory(&far).await.expect("create far");

    let results = backend
        .search_memory_vector(&space.memory_space_id, &[1.0, 0.0, 0.0], 10)
        .await
        .expect("search");
    assert_eq!(results[0].0.memory_id, close.memory_id);
    assert!(results[0].1 > results[1].1);
}

#[tokio::test]
async fn fact_supersede_preserves_old_row_and_links_forward() {
    let (backend, _dir) = open_backend().await;
    let space = MemorySpace::new(MemorySpaceType::Personal);
    backend.create_memory_space(&space).await.expect("create space");

    let old = Fact::new(&space.memory_space_id, "likes tea", FactType::Preference, SourceType::Conversation);
    backend.create_fact(&old).await.expect("create old fact");

    let mut new_fact = Fact::new(&space.memory_space_id, "likes coffee", FactType::Preference, SourceType::Conversation);
    new_fact.supersedes = Some(old.fact_id.clone());
    backend.create_fact(&new_fact).await.expect("create new fact");
    backend
        .supersede(&old.fact_id, &new_fact.fact_id)
        .await
        .expect("supersede");

    let reloaded_old = backend.get_fact(&old.fact_id).await.expect("get").expect("found");
    assert_eq!(reloaded_old.superseded_by, Some(new_fact.fact_id.clone()));

    let active = backend.list_facts_by_space(&space.memory_space_id, false).await.expect("list active");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].fact_id, new_fact.fact_id);

    let all = backend.list_facts_by_space(&space.memory_space_id, true).await.expect("list all");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn memory_space_list_for_participant_scans_membership() {
    let (backend, _dir) = open_backend().await;
    let mut space = MemorySpace::new(MemorySpaceType::Team);
    space.participants.push("user-1".to_string());
    backend.create_memory_space(&space).await.expect("create space");

    let mut other = MemorySpace::new(MemorySpaceType::Team);
    other.participants.push("user-2".to_string());
    backend.create_memory_space(&other).await.expect("create other space");

    let found = backend.list_memory_spaces_for_participant("user-1").await.expect("list");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].memory_space_id, space.memory_space_id);

    backend.archive(&space.memory_space_id).await.expect("archive");
    let archived = backend.get_memory_space(&space.memory_space_id).await.expect("get").expect("found");
    assert_eq!(archived.status, MemorySpaceStatus::Archived);
}
