use std::sync::Arc;

use log::error;
use rand::Rng;

use leoula_core::Catalog;
use leoula_core::model::{Gender, MissedSet};
use storage::MissedWordsStore;

use super::plan::{DeckBuilder, DeckSource};
use super::service::{AnswerOutcome, QuizSession};
use crate::Clock;
use crate::error::SessionError;

/// Orchestrates session start and answering with write-through persistence of
/// the missed set.
///
/// The missed set itself is owned by the caller: load it once with
/// [`SessionLoopService::load_missed`], pass it by `&mut` to every answer, and
/// flush it with [`SessionLoopService::save_missed`] on shutdown.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    catalog: Arc<Catalog>,
    store: MissedWordsStore,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<Catalog>, store: MissedWordsStore) -> Self {
        Self {
            clock,
            catalog,
            store,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Read the persisted missed set. Never fails; bad data reads as empty.
    pub async fn load_missed(&self) -> MissedSet {
        MissedSet::from_ids(self.store.load().await)
    }

    /// Persist the full missed set.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the write fails.
    pub async fn save_missed(&self, missed: &MissedSet) -> Result<(), SessionError> {
        self.store.save(missed.ids()).await?;
        Ok(())
    }

    /// Start a session with a thread-local RNG.
    #[must_use]
    pub fn start_session(&self, source: DeckSource, missed: &MissedSet) -> QuizSession {
        self.start_session_with_rng(source, missed, &mut rand::rng())
    }

    /// Start a session with a caller-supplied RNG.
    ///
    /// Review decks are built from a snapshot of `missed` taken here.
    pub fn start_session_with_rng<R: Rng + ?Sized>(
        &self,
        source: DeckSource,
        missed: &MissedSet,
        rng: &mut R,
    ) -> QuizSession {
        let snapshot = missed.snapshot();
        let deck = DeckBuilder::new(&self.catalog).build(source, &snapshot, rng);
        QuizSession::new(source, deck, self.clock.now())
    }

    /// Commit the revealed guess on the current card.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRevealed` / `SessionError::Completed` for
    /// precondition violations, or `SessionError::Storage` if the missed set
    /// changed and could not be saved. In the storage case the session has
    /// already advanced.
    pub async fn answer_current(
        &self,
        session: &mut QuizSession,
        missed: &mut MissedSet,
    ) -> Result<AnswerOutcome, SessionError> {
        let outcome = session.commit_guess(missed, self.clock.now())?;
        self.write_through(&outcome, missed).await?;
        Ok(outcome)
    }

    /// Score `chosen` directly, skipping the reveal step.
    ///
    /// # Errors
    ///
    /// Same as [`SessionLoopService::answer_current`], minus `NotRevealed`.
    pub async fn submit_answer(
        &self,
        session: &mut QuizSession,
        missed: &mut MissedSet,
        chosen: Gender,
    ) -> Result<AnswerOutcome, SessionError> {
        let outcome = session.submit_answer(missed, chosen, self.clock.now())?;
        self.write_through(&outcome, missed).await?;
        Ok(outcome)
    }

    async fn write_through(
        &self,
        outcome: &AnswerOutcome,
        missed: &MissedSet,
    ) -> Result<(), SessionError> {
        if !outcome.missed_changed {
            return Ok(());
        }
        if let Err(err) = self.store.save(missed.ids()).await {
            error!("failed to save missed words after {}: {err}", outcome.word_id);
            return Err(err.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leoula_core::model::{Category, WordEntry, WordId};
    use leoula_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use storage::{InMemoryRepository, KeyValueRepository, MISSED_WORDS_KEY, StorageError};

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::new(vec![
                WordEntry::new("w1", "maison", "house", Gender::Feminine, Category::Home),
                WordEntry::new("w2", "lit", "bed", Gender::Masculine, Category::Home),
                WordEntry::new("w3", "bureau", "office", Gender::Masculine, Category::Work),
            ])
            .unwrap(),
        )
    }

    fn service(repo: &InMemoryRepository) -> SessionLoopService {
        SessionLoopService::new(
            Clock::fixed(fixed_now()),
            catalog(),
            MissedWordsStore::new(Arc::new(repo.clone())),
        )
    }

    #[tokio::test]
    async fn wrong_answer_is_written_through() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo);
        let mut missed = svc.load_missed().await;
        let mut rng = StdRng::seed_from_u64(5);
        let mut session =
            svc.start_session_with_rng(DeckSource::Category(Some(Category::Work)), &missed, &mut rng);

        session.guess(Gender::Feminine).unwrap();
        let outcome = svc.answer_current(&mut session, &mut missed).await.unwrap();

        assert!(!outcome.was_correct);
        assert!(outcome.is_complete);
        assert_eq!(
            repo.get(MISSED_WORDS_KEY).await.unwrap().as_deref(),
            Some(r#"["w3"]"#)
        );
    }

    #[tokio::test]
    async fn unchanged_missed_set_skips_write() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo);
        let mut missed = MissedSet::new();
        let mut session = svc.start_session(DeckSource::Category(Some(Category::Work)), &missed);

        svc.submit_answer(&mut session, &mut missed, Gender::Masculine)
            .await
            .unwrap();
        assert_eq!(repo.get(MISSED_WORDS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn review_deck_is_a_snapshot() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo);
        let mut missed = MissedSet::from_ids([WordId::new("w1"), WordId::new("w2")]);
        let mut session = svc.start_session(DeckSource::Review, &missed);
        assert_eq!(session.deck().len(), 2);

        while let Some(word) = session.current_word() {
            let gender = word.gender();
            svc.submit_answer(&mut session, &mut missed, gender)
                .await
                .unwrap();
        }

        assert!(missed.is_empty());
        assert_eq!(session.deck().len(), 2);
        assert_eq!(session.score(), 2);
        assert_eq!(repo.get(MISSED_WORDS_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn answer_after_completion_is_rejected() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo);
        let mut missed = MissedSet::new();
        let mut session = svc.start_session(DeckSource::Review, &missed);
        assert!(session.is_complete());

        let err = svc
            .submit_answer(&mut session, &mut missed, Gender::Masculine)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Completed));
    }

    struct ReadOnlyRepository;

    #[async_trait::async_trait]
    impl KeyValueRepository for ReadOnlyRepository {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn put(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("database is locked".into()))
        }
    }

    #[tokio::test]
    async fn failed_save_still_advances_and_keeps_missed_word() {
        let svc = SessionLoopService::new(
            Clock::fixed(fixed_now()),
            catalog(),
            MissedWordsStore::new(Arc::new(ReadOnlyRepository)),
        );
        let mut missed = svc.load_missed().await;
        let mut session = svc.start_session(DeckSource::Category(Some(Category::Home)), &missed);
        let first = session.current_word().unwrap().clone();
        let wrong = match first.gender() {
            Gender::Masculine => Gender::Feminine,
            Gender::Feminine => Gender::Masculine,
        };

        session.guess(wrong).unwrap();
        let err = svc
            .answer_current(&mut session, &mut missed)
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Storage(StorageError::Connection(_))));
        assert_eq!(session.position(), 1);
        assert_eq!(session.results().len(), 1);
        assert!(missed.contains(first.id()));
        assert!(!session.is_complete());
    }
}
