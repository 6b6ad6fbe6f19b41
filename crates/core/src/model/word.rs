use crate::model::{Category, Gender, WordId};

/// Immutable vocabulary record from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    id: WordId,
    source_text: String,
    translation: String,
    gender: Gender,
    category: Category,
    example: Option<String>,
    aspirated_h: bool,
}

impl WordEntry {
    #[must_use]
    pub fn new(
        id: impl Into<WordId>,
        source_text: impl Into<String>,
        translation: impl Into<String>,
        gender: Gender,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            source_text: source_text.into(),
            translation: translation.into(),
            gender,
            category,
            example: None,
            aspirated_h: false,
        }
    }

    #[must_use]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Mark a leading `h` as aspirated, which blocks elision (`le hockey`).
    #[must_use]
    pub fn with_aspirated_h(mut self) -> Self {
        self.aspirated_h = true;
        self
    }

    #[must_use]
    pub fn id(&self) -> &WordId {
        &self.id
    }

    /// The French noun, without article.
    #[must_use]
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// English gloss.
    #[must_use]
    pub fn translation(&self) -> &str {
        &self.translation
    }

    #[must_use]
    pub fn gender(&self) -> Gender {
        self.gender
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    /// The noun with its definite article, eliding before a vowel or mute h.
    #[must_use]
    pub fn with_article(&self) -> String {
        let first = self
            .source_text
            .chars()
            .next()
            .and_then(|c| c.to_lowercase().next());
        let elides = match first {
            Some('h') => !self.aspirated_h,
            Some(c) => "aâàeéèêiîoôuû".contains(c),
            None => false,
        };
        if elides {
            format!("l'{}", self.source_text)
        } else {
            format!("{} {}", self.gender.article(), self.source_text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_is_elided_before_vowels() {
        let eau = WordEntry::new("eau", "eau", "water", Gender::Feminine, Category::Exceptions);
        let lit = WordEntry::new("lit", "lit", "bed", Gender::Masculine, Category::Home);
        assert_eq!(eau.with_article(), "l'eau");
        assert_eq!(lit.with_article(), "le lit");
    }

    #[test]
    fn aspirated_h_keeps_the_article() {
        let homme = WordEntry::new("homme", "homme", "man", Gender::Masculine, Category::Common);
        let hache = WordEntry::new("hache", "hache", "axe", Gender::Feminine, Category::Home)
            .with_aspirated_h();
        let hockey = WordEntry::new("hockey", "hockey", "hockey", Gender::Masculine, Category::Skiing)
            .with_aspirated_h();
        assert_eq!(homme.with_article(), "l'homme");
        assert_eq!(hache.with_article(), "la hache");
        assert_eq!(hockey.with_article(), "le hockey");
    }

    #[test]
    fn example_is_optional() {
        let plain = WordEntry::new("lit", "lit", "bed", Gender::Masculine, Category::Home);
        assert_eq!(plain.example(), None);
        let with = plain.with_example("Le lit est grand.");
        assert_eq!(with.example(), Some("Le lit est grand."));
    }
}
