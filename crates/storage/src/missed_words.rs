use std::sync::Arc;

use leoula_core::model::WordId;
use log::{info, warn};

use crate::repository::{KeyValueRepository, StorageError};

/// Key holding the JSON array of missed word ids.
pub const MISSED_WORDS_KEY: &str = "french_incorrect_ids";

/// Loads and saves the missed-word id list under a single key.
#[derive(Clone)]
pub struct MissedWordsStore {
    kv: Arc<dyn KeyValueRepository>,
}

impl MissedWordsStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueRepository>) -> Self {
        Self { kv }
    }

    /// Read the saved list.
    ///
    /// Absent, unreadable, or malformed data yields an empty list; the failure
    /// is logged and never propagated.
    pub async fn load(&self) -> Vec<WordId> {
        let raw = match self.kv.get(MISSED_WORDS_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("failed to read saved missed words: {err}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<WordId>>(&raw) {
            Ok(ids) => ids,
            Err(err) => {
                warn!("failed to parse saved missed words, starting empty: {err}");
                Vec::new()
            }
        }
    }

    /// Overwrite the saved list with `ids`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the underlying write fails.
    pub async fn save(&self, ids: &[WordId]) -> Result<(), StorageError> {
        let payload =
            serde_json::to_string(ids).map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.kv.put(MISSED_WORDS_KEY, &payload).await?;
        info!("saved {} missed word(s)", ids.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    fn store_with(repo: &InMemoryRepository) -> MissedWordsStore {
        MissedWordsStore::new(Arc::new(repo.clone()))
    }

    #[tokio::test]
    async fn empty_storage_loads_empty_list() {
        let repo = InMemoryRepository::new();
        assert!(store_with(&repo).load().await.is_empty());
    }

    #[tokio::test]
    async fn save_writes_full_json_array() {
        let repo = InMemoryRepository::new();
        let store = store_with(&repo);
        store
            .save(&[WordId::new("w1"), WordId::new("w2")])
            .await
            .unwrap();

        let raw = repo.get(MISSED_WORDS_KEY).await.unwrap().unwrap();
        assert_eq!(raw, r#"["w1","w2"]"#);
        assert_eq!(
            store.load().await,
            vec![WordId::new("w1"), WordId::new("w2")]
        );
    }

    #[tokio::test]
    async fn corrupt_payload_falls_back_to_empty() {
        let repo = InMemoryRepository::new();
        repo.put(MISSED_WORDS_KEY, "{not json").await.unwrap();
        assert!(store_with(&repo).load().await.is_empty());

        repo.put(MISSED_WORDS_KEY, r#"{"ids": ["w1"]}"#).await.unwrap();
        assert!(store_with(&repo).load().await.is_empty());
    }

    struct BrokenRepository;

    #[async_trait::async_trait]
    impl KeyValueRepository for BrokenRepository {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Connection("disk gone".into()))
        }

        async fn put(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk gone".into()))
        }
    }

    #[tokio::test]
    async fn unreadable_backend_loads_empty_but_save_reports_error() {
        let store = MissedWordsStore::new(Arc::new(BrokenRepository));
        assert!(store.load().await.is_empty());
        let err = store.save(&[WordId::new("w1")]).await.unwrap_err();
        assert!(matches!(err, StorageError::Connection(_)));
    }

    #[tokio::test]
    async fn saving_empty_list_clears_previous_value() {
        let repo = InMemoryRepository::new();
        let store = store_with(&repo);
        store.save(&[WordId::new("w1")]).await.unwrap();
        store.save(&[]).await.unwrap();
        assert_eq!(repo.get(MISSED_WORDS_KEY).await.unwrap().as_deref(), Some("[]"));
        assert!(store.load().await.is_empty());
    }
}
