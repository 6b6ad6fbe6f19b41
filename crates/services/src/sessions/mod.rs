mod plan;
mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{DeckBuilder, DeckSource, QUIZ_DECK_CAP, REVIEW_DECK_CAP};
pub use progress::{SessionProgress, SessionStats};
pub use service::{AnswerOutcome, AnswerRecord, QuizSession};
pub use workflow::SessionLoopService;
