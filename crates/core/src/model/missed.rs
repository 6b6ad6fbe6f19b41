use std::collections::HashSet;

use crate::model::WordId;

/// Words whose most recent answer was wrong.
///
/// Keeps first-insertion order so the persisted list is stable between saves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissedSet {
    ids: Vec<WordId>,
}

impl MissedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a persisted list, dropping duplicates.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = WordId>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.insert(id);
        }
        set
    }

    #[must_use]
    pub fn contains(&self, id: &WordId) -> bool {
        self.ids.contains(id)
    }

    /// Mark a word as missed. Returns `true` if the set changed.
    pub fn insert(&mut self, id: WordId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Mark a word as mastered. Returns `true` if the set changed.
    pub fn remove(&mut self, id: &WordId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }

    #[must_use]
    pub fn ids(&self) -> &[WordId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Point-in-time copy used to build a review deck.
    #[must_use]
    pub fn snapshot(&self) -> HashSet<WordId> {
        self.ids.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove_report_changes() {
        let mut set = MissedSet::new();
        assert!(set.insert(WordId::new("w1")));
        assert!(!set.insert(WordId::new("w1")));
        assert_eq!(set.len(), 1);

        assert!(set.remove(&WordId::new("w1")));
        assert!(!set.remove(&WordId::new("w1")));
        assert!(set.is_empty());
    }

    #[test]
    fn from_ids_dedupes_and_keeps_order() {
        let set = MissedSet::from_ids(["b", "a", "b", "c"].map(WordId::new));
        let ids: Vec<&str> = set.ids().iter().map(WordId::as_str).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn snapshot_is_detached_from_later_mutations() {
        let mut set = MissedSet::from_ids([WordId::new("w1")]);
        let snapshot = set.snapshot();
        set.remove(&WordId::new("w1"));
        set.insert(WordId::new("w2"));
        assert!(snapshot.contains("w1"));
        assert!(!snapshot.contains("w2"));
    }
}
