use chrono::{DateTime, Utc};
use std::fmt;

use leoula_core::model::{AppMode, CardState, Gender, MissedSet, WordEntry, WordId};

use super::plan::DeckSource;
use super::progress::{SessionProgress, SessionStats};
use crate::error::SessionError;

//
// ─── ANSWERS ───────────────────────────────────────────────────────────────────
//

/// One committed answer, in the order it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub word_id: WordId,
    pub chosen: Gender,
    pub correct: bool,
}

/// What a committed answer did to the session and the missed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub word_id: WordId,
    pub chosen: Gender,
    pub correct_gender: Gender,
    pub was_correct: bool,
    /// True when the missed set gained or lost this word.
    pub missed_changed: bool,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One pass through a fixed deck.
///
/// The deck never changes after construction. Each card is first guessed
/// (reveal only) and then committed, which scores it, updates the missed set
/// and advances to the next card.
pub struct QuizSession {
    source: DeckSource,
    deck: Vec<WordEntry>,
    position: usize,
    score: usize,
    card: CardState,
    results: Vec<AnswerRecord>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session over `deck`.
    ///
    /// An empty deck produces a session that is already complete, so callers
    /// go straight to the stats screen with 0 of 0.
    #[must_use]
    pub fn new(source: DeckSource, deck: Vec<WordEntry>, started_at: DateTime<Utc>) -> Self {
        let completed_at = deck.is_empty().then_some(started_at);
        Self {
            source,
            deck,
            position: 0,
            score: 0,
            card: CardState::AwaitingGuess,
            results: Vec::new(),
            started_at,
            completed_at,
        }
    }

    #[must_use]
    pub fn source(&self) -> DeckSource {
        self.source
    }

    /// `Quiz` or `Review` while running, `Stats` once the deck is exhausted.
    #[must_use]
    pub fn mode(&self) -> AppMode {
        if self.is_complete() {
            AppMode::Stats
        } else {
            self.source.mode()
        }
    }

    #[must_use]
    pub fn deck(&self) -> &[WordEntry] {
        &self.deck
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn results(&self) -> &[AnswerRecord] {
        &self.results
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn card_state(&self) -> CardState {
        self.card
    }

    #[must_use]
    pub fn current_word(&self) -> Option<&WordEntry> {
        if self.is_complete() {
            return None;
        }
        self.deck.get(self.position)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.deck.len(),
            answered: self.results.len(),
            remaining: self.deck.len().saturating_sub(self.position),
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        SessionStats::new(self.deck.len(), self.score)
    }

    /// Reveal the current card with `chosen` as the user's pick.
    ///
    /// Nothing is scored yet. A second guess on the same card is ignored and
    /// the first pick is returned.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if there is no card left.
    pub fn guess(&mut self, chosen: Gender) -> Result<Gender, SessionError> {
        if self.current_word().is_none() {
            return Err(SessionError::Completed);
        }
        Ok(self.card.guess(chosen))
    }

    /// Commit the pick recorded by [`QuizSession::guess`].
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRevealed` if the card is still awaiting a guess,
    /// or `SessionError::Completed` if the session is over.
    pub fn commit_guess(
        &mut self,
        missed: &mut MissedSet,
        answered_at: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        let chosen = self.card.chosen().ok_or(SessionError::NotRevealed)?;
        self.submit_answer(missed, chosen, answered_at)
    }

    /// Score `chosen` against the current card, update `missed`, and advance.
    ///
    /// A correct answer removes the word from `missed`; a wrong one adds it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session is already finished; no
    /// state changes in that case.
    pub fn submit_answer(
        &mut self,
        missed: &mut MissedSet,
        chosen: Gender,
        answered_at: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        let word = self.current_word().ok_or(SessionError::Completed)?;
        let word_id = word.id().clone();
        let correct_gender = word.gender();
        let was_correct = chosen == correct_gender;

        let missed_changed = if was_correct {
            self.score += 1;
            missed.remove(&word_id)
        } else {
            missed.insert(word_id.clone())
        };

        self.results.push(AnswerRecord {
            word_id: word_id.clone(),
            chosen,
            correct: was_correct,
        });
        self.position += 1;
        self.card = CardState::AwaitingGuess;
        if self.position >= self.deck.len() {
            self.completed_at = Some(answered_at);
        }

        Ok(AnswerOutcome {
            word_id,
            chosen,
            correct_gender,
            was_correct,
            missed_changed,
            is_complete: self.is_complete(),
        })
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("source", &self.source)
            .field("deck_len", &self.deck.len())
            .field("position", &self.position)
            .field("score", &self.score)
            .field("card", &self.card)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
