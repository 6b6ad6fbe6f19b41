use std::collections::HashSet;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use leoula_core::Catalog;
use leoula_core::model::{AppMode, Category, WordEntry, WordId};

/// Largest deck a fresh category quiz will hold.
pub const QUIZ_DECK_CAP: usize = 15;
/// Largest deck a review of missed words will hold.
pub const REVIEW_DECK_CAP: usize = 20;

/// Where a session draws its words from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckSource {
    /// Fresh quiz over one category, or the whole catalog for `None`.
    Category(Option<Category>),
    /// Re-quiz of the missed words.
    Review,
}

impl DeckSource {
    #[must_use]
    pub fn all_categories() -> Self {
        Self::Category(None)
    }

    #[must_use]
    pub fn cap(self) -> usize {
        match self {
            DeckSource::Category(_) => QUIZ_DECK_CAP,
            DeckSource::Review => REVIEW_DECK_CAP,
        }
    }

    /// Screen shown while this kind of session is running.
    #[must_use]
    pub fn mode(self) -> AppMode {
        match self {
            DeckSource::Category(_) => AppMode::Quiz,
            DeckSource::Review => AppMode::Review,
        }
    }
}

/// Picks and orders the words for one session.
pub struct DeckBuilder<'a> {
    catalog: &'a Catalog,
}

impl<'a> DeckBuilder<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Every catalog entry eligible for `source`, in catalog order.
    ///
    /// Review candidates are the entries whose id is in `missed`; ids that are
    /// no longer in the catalog are ignored.
    #[must_use]
    pub fn candidates(&self, source: DeckSource, missed: &HashSet<WordId>) -> Vec<WordEntry> {
        self.catalog
            .all()
            .iter()
            .filter(|word| match source {
                DeckSource::Category(Some(category)) => word.category() == category,
                DeckSource::Category(None) => true,
                DeckSource::Review => missed.contains(word.id()),
            })
            .cloned()
            .collect()
    }

    /// Shuffle the candidates uniformly and keep at most `source.cap()` of them.
    pub fn build<R: Rng + ?Sized>(
        &self,
        source: DeckSource,
        missed: &HashSet<WordId>,
        rng: &mut R,
    ) -> Vec<WordEntry> {
        let mut deck = self.candidates(source, missed);
        let pool = deck.len();
        deck.as_mut_slice().shuffle(rng);
        deck.truncate(source.cap());
        debug!("built {source:?} deck with {} of {pool} candidates", deck.len());
        deck
    }
}
