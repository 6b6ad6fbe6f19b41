#![forbid(unsafe_code)]

pub mod missed_words;
pub mod repository;
pub mod sqlite;

pub use missed_words::{MISSED_WORDS_KEY, MissedWordsStore};
pub use repository::{InMemoryRepository, KeyValueRepository, Storage, StorageError};
