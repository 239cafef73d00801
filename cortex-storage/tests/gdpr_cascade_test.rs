//! GDPR cascade: `delete_*_for_user` must clear every user-keyed collection
//! (spec §4.8) and leave data outside the scope untouched.

use cortex_core::models::{
    Context, ContentType, Conversation, ConversationType, Fact, FactType, Memory, MemorySpace,
    MemorySpaceType, SourceType,
};
use cortex_core::traits::{
    IContextStorage, IConversationStorage, IFactStorage, IMemoryStorage, IMutableStorage,
    IMemorySpaceStorage, IStorageBackend,
};
use cortex_storage::SqliteBackend;

async fn open_backend() -> (SqliteBackend, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let backend = SqliteBackend::open(&dir.path().join("cortex.db"), 4).expect("open backend");
    backend.migrate().await.expect("migrate");
    (backend, dir)
}

#[tokio::test]
async fn delete_for_user_clears_memories_and_spares_other_users() {
    let (backend, _dir) = open_backend().await;
    let space = MemorySpace::new(MemorySpaceType::Personal);
    backend.create_memory_space(&space).await.expect("create space");

    let mut mine = Memory::new(&space.memory_space_id, "mine", ContentType::Raw, SourceType::Conversation);
    mine.user_id = Some("user-1".to_string());
    let mut theirs = Memory::new(&space.memory_space_id, "theirs", ContentType::Raw, SourceType::Conversation);
    theirs.user_id = Some("user-2".to_string());
    backend.create_memory(&mine).await.expect("create mine");
    backend.create_memory(&theirs).await.expect("create theirs");

    let deleted = backend.delete_memories_for_user("user-1").await.expect("cascade");
    assert_eq!(deleted, 1);
    assert!(backend.get_memory(&mine.memory_id).await.expect("get").is_none());
    assert!(backend.get_memory(&theirs.memory_id).await.expect("get").is_some());
}

#[tokio::test]
async fn delete_for_user_cascades_across_conversations_facts_contexts_and_mutable() {
    let (backend, _dir) = open_backend().await;
    let space = MemorySpace::new(MemorySpaceType::Personal);
    backend.create_memory_space(&space).await.expect("create space");

    let mut conversation = Conversation::new(&space.memory_space_id, ConversationType::UserAgent);
    conversation.participant_id = Some("user-1".to_string());
    backend.create_conversation(&conversation).await.expect("create conversation");

    let mut fact = Fact::new(&space.memory_space_id, "likes tea", FactType::Preference, SourceType::Conversation);
    fact.user_id = Some("user-1".to_string());
    backend.create_fact(&fact).await.expect("create fact");

    let mut ctx = Context::new_root(&space.memory_space_id, "investigate bug");
    ctx.user_id = Some("user-1".to_string());
    backend.create_context(&ctx).await.expect("create context");

    backend
        .put("prefs", "user-1", serde_json::json!("dark"), None, Some("user-1"))
        .await
        .expect("put mutable");

    assert_eq!(backend.delete_conversations_for_user("user-1").await.expect("conv cascade"), 1);
    assert_eq!(backend.delete_facts_for_user("user-1").await.expect("fact cascade"), 1);
    assert_eq!(backend.delete_contexts_for_user("user-1").await.expect("context cascade"), 1);
    assert_eq!(backend.delete_mutable_for_user("user-1").await.expect("mutable cascade"), 1);

    assert!(backend.get_conversation(&conversation.conversation_id).await.expect("get").is_none());
    assert!(backend.get_fact(&fact.fact_id).await.expect("get").is_none());
    assert!(backend.get_context(&ctx.context_id).await.expect("get").is_none());
    assert!(backend.get_mutable("prefs", "user-1").await.expect("get").is_none());
}
