use std::sync::Arc;

use leoula_core::model::WordId;
use storage::repository::KeyValueRepository;
use storage::sqlite::SqliteRepository;
use storage::{MISSED_WORDS_KEY, MissedWordsStore, Storage};

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_kv_roundtrip_and_overwrite() {
    let repo = connect("memdb_kv_roundtrip").await;

    assert_eq!(repo.get("missing").await.unwrap(), None);

    repo.put("k", "first").await.unwrap();
    repo.put("k", "second").await.unwrap();
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("second"));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = connect("memdb_migrate_twice").await;
    repo.put("k", "kept").await.unwrap();
    repo.migrate().await.expect("second migrate");
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("kept"));
}

#[tokio::test]
async fn missed_words_survive_reopen() {
    let url = "sqlite:file:memdb_missed_reopen?mode=memory&cache=shared";
    let first = Storage::sqlite(url).await.expect("open");
    let store = MissedWordsStore::new(Arc::clone(&first.kv));
    store
        .save(&[WordId::new("plage"), WordId::new("musée")])
        .await
        .unwrap();

    // Keep `first` alive so the shared in-memory database is not dropped.
    let second = Storage::sqlite(url).await.expect("reopen");
    let reloaded = MissedWordsStore::new(Arc::clone(&second.kv)).load().await;
    assert_eq!(reloaded, vec![WordId::new("plage"), WordId::new("musée")]);
    drop(first);
}

#[tokio::test]
async fn corrupt_sqlite_payload_loads_empty() {
    let repo = connect("memdb_missed_corrupt").await;
    repo.put(MISSED_WORDS_KEY, "[\"w1\", 42]").await.unwrap();

    let store = MissedWordsStore::new(Arc::new(repo));
    assert!(store.load().await.is_empty());
}
