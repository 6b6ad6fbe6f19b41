use std::collections::HashSet;

use thiserror::Error;

use crate::model::{Category, Gender, WordEntry, WordId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("word id cannot be empty")]
    EmptyId,

    #[error("duplicate word id: {0}")]
    DuplicateId(WordId),

    #[error("word {0} has empty text or translation")]
    EmptyText(WordId),
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Read-only vocabulary the quiz draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    words: Vec<WordEntry>,
}

impl Catalog {
    /// Build a catalog from arbitrary entries.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if an id is blank or repeated, or a word has no text.
    pub fn new(words: Vec<WordEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(words.len());
        for word in &words {
            if word.id().as_str().trim().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if word.source_text().trim().is_empty() || word.translation().trim().is_empty() {
                return Err(CatalogError::EmptyText(word.id().clone()));
            }
            if !seen.insert(word.id().clone()) {
                return Err(CatalogError::DuplicateId(word.id().clone()));
            }
        }
        Ok(Self { words })
    }

    /// The embedded French noun list.
    #[must_use]
    pub fn builtin() -> Self {
        let words = BUILTIN
            .iter()
            .map(|&(french, english, gender, category, example)| {
                let entry = WordEntry::new(french, french, english, gender, category);
                match example {
                    Some(example) => entry.with_example(example),
                    None => entry,
                }
            })
            .collect();
        Self { words }
    }

    #[must_use]
    pub fn all(&self) -> &[WordEntry] {
        &self.words
    }

    #[must_use]
    pub fn get(&self, id: &WordId) -> Option<&WordEntry> {
        self.words.iter().find(|word| word.id() == id)
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &WordEntry> {
        self.words
            .iter()
            .filter(move |word| word.category() == category)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

use Category::{Common, Exceptions, Home, Skiing, Work};
use Gender::{Feminine as F, Masculine as M};

type Row = (&'static str, &'static str, Gender, Category, Option<&'static str>);

// French text doubles as the id; it is unique across the list.
const BUILTIN: &[Row] = &[
    // Common
    ("livre", "book", M, Common, Some("J'ai lu un livre passionnant.")),
    ("voiture", "car", F, Common, None),
    ("jour", "day", M, Common, None),
    ("nuit", "night", F, Common, Some("Bonne nuit, à demain !")),
    ("pays", "country", M, Common, None),
    ("ville", "city", F, Common, None),
    ("monde", "world", M, Common, None),
    ("vie", "life", F, Common, None),
    ("problème", "problem", M, Common, Some("Ce n'est pas un problème.")),
    ("question", "question", F, Common, None),
    ("arbre", "tree", M, Common, None),
    ("fleur", "flower", F, Common, None),
    // Home
    ("maison", "house", F, Home, Some("La maison est au bout de la rue.")),
    ("cuisine", "kitchen", F, Home, None),
    ("salon", "living room", M, Home, None),
    ("chambre", "bedroom", F, Home, None),
    ("lit", "bed", M, Home, None),
    ("table", "table", F, Home, None),
    ("chaise", "chair", F, Home, None),
    ("fauteuil", "armchair", M, Home, None),
    ("fenêtre", "window", F, Home, Some("Ouvre la fenêtre, s'il te plaît.")),
    ("miroir", "mirror", M, Home, None),
    ("canapé", "sofa", M, Home, None),
    ("porte", "door", F, Home, None),
    ("réfrigérateur", "fridge", M, Home, None),
    // Work
    ("bureau", "office", M, Work, Some("Je suis au bureau jusqu'à six heures.")),
    ("réunion", "meeting", F, Work, None),
    ("ordinateur", "computer", M, Work, None),
    ("entreprise", "company", F, Work, None),
    ("salaire", "salary", M, Work, None),
    ("équipe", "team", F, Work, None),
    ("projet", "project", M, Work, None),
    ("stylo", "pen", M, Work, None),
    ("tâche", "task", F, Work, None),
    ("dossier", "file", M, Work, None),
    ("courriel", "email", M, Work, None),
    ("imprimante", "printer", F, Work, None),
    // Skiing
    ("ski", "ski", M, Skiing, None),
    ("piste", "slope", F, Skiing, Some("La piste noire est très raide.")),
    ("neige", "snow", F, Skiing, None),
    ("montagne", "mountain", F, Skiing, None),
    ("télésiège", "chairlift", M, Skiing, None),
    ("bâton", "ski pole", M, Skiing, None),
    ("chaussure", "boot", F, Skiing, None),
    ("casque", "helmet", M, Skiing, None),
    ("station", "resort", F, Skiing, None),
    ("forfait", "lift pass", M, Skiing, None),
    ("moniteur", "instructor", M, Skiing, None),
    ("avalanche", "avalanche", F, Skiing, None),
    // Exceptions: endings that suggest the other gender
    ("musée", "museum", M, Exceptions, Some("Le musée est fermé le lundi.")),
    ("lycée", "high school", M, Exceptions, None),
    ("silence", "silence", M, Exceptions, None),
    ("squelette", "skeleton", M, Exceptions, None),
    ("modèle", "model", M, Exceptions, None),
    ("plage", "beach", F, Exceptions, Some("On va à la plage cet après-midi.")),
    ("page", "page", F, Exceptions, None),
    ("image", "picture", F, Exceptions, None),
    ("eau", "water", F, Exceptions, None),
    ("peau", "skin", F, Exceptions, None),
];
