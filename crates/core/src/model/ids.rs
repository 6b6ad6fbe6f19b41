use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a catalog word.
///
/// Persisted as a bare JSON string inside the missed-words list.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(String);

impl WordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WordId({})", self.0)
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for WordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Error type for parsing a `WordId` from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError;

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("word id cannot be empty")
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for WordId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError);
        }
        Ok(Self::new(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_id_display_is_raw_value() {
        assert_eq!(WordId::new("maison").to_string(), "maison");
    }

    #[test]
    fn word_id_from_str_trims() {
        let id: WordId = "  lit ".parse().unwrap();
        assert_eq!(id, WordId::new("lit"));
    }

    #[test]
    fn word_id_from_str_rejects_blank() {
        assert!("   ".parse::<WordId>().is_err());
    }

    #[test]
    fn word_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&vec![WordId::new("w1")]).unwrap();
        assert_eq!(json, r#"["w1"]"#);
    }
}
