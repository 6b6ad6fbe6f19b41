use log::debug;

use leoula_core::model::WordId;

/// Explanation status for the card on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExplanationState {
    #[default]
    Idle,
    Pending,
    Ready(String),
}

/// Ties explanation replies to the card they were requested for.
///
/// Requests run detached from the session. When the user moves on before a
/// reply arrives, the reply carries the old word id and is dropped.
#[derive(Debug, Clone, Default)]
pub struct ExplanationTracker {
    word_id: Option<WordId>,
    state: ExplanationState,
}

impl ExplanationTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to a new card, discarding whatever was shown for the old one.
    pub fn focus(&mut self, word_id: WordId) {
        self.word_id = Some(word_id);
        self.state = ExplanationState::Idle;
    }

    /// Forget the current card, e.g. when leaving the quiz.
    pub fn reset(&mut self) {
        self.word_id = None;
        self.state = ExplanationState::Idle;
    }

    /// Claim the single request slot for `word_id`.
    ///
    /// Returns `false` if `word_id` is not the focused card or a request for it
    /// is already pending or answered; the caller should not send another.
    pub fn begin(&mut self, word_id: &WordId) -> bool {
        if self.word_id.as_ref() != Some(word_id) || self.state != ExplanationState::Idle {
            return false;
        }
        self.state = ExplanationState::Pending;
        true
    }

    /// Accept a reply for `word_id` if it is still the focused, pending card.
    pub fn resolve(&mut self, word_id: &WordId, text: String) -> bool {
        let is_current = self.word_id.as_ref() == Some(word_id);
        if !is_current || self.state != ExplanationState::Pending {
            debug!("dropping stale explanation for {word_id}");
            return false;
        }
        self.state = ExplanationState::Ready(text);
        true
    }

    #[must_use]
    pub fn word_id(&self) -> Option<&WordId> {
        self.word_id.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> &ExplanationState {
        &self.state
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state == ExplanationState::Pending
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.state {
            ExplanationState::Ready(text) => Some(text),
            _ => None,
        }
    }
}
