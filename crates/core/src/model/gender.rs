use std::fmt;
use std::str::FromStr;

use thiserror::Error;

//
// ─── GENDER ────────────────────────────────────────────────────────────────────
//

/// Grammatical gender of a French noun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Masculine,
    Feminine,
}

impl Gender {
    /// Definite article used in front of the noun.
    #[must_use]
    pub fn article(self) -> &'static str {
        match self {
            Gender::Masculine => "le",
            Gender::Feminine => "la",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Masculine => "masculine",
            Gender::Feminine => "feminine",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown gender: {raw}")]
pub struct ParseGenderError {
    raw: String,
}

impl FromStr for Gender {
    type Err = ParseGenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "masculine" | "le" | "un" => Ok(Gender::Masculine),
            "f" | "feminine" | "la" | "une" => Ok(Gender::Feminine),
            _ => Err(ParseGenderError { raw: s.to_owned() }),
        }
    }
}

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// Thematic group a word belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Common,
    Home,
    Work,
    Skiing,
    Exceptions,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Common,
        Category::Home,
        Category::Work,
        Category::Skiing,
        Category::Exceptions,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Common => "Common",
            Category::Home => "Home",
            Category::Work => "Work",
            Category::Skiing => "Skiing",
            Category::Exceptions => "Exceptions",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown category: {raw}")]
pub struct ParseCategoryError {
    raw: String,
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseCategoryError { raw: s.to_owned() })
    }
}
