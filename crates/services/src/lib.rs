#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod explain;
pub mod sessions;

pub use leoula_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use error::{AppServicesError, ExplanationError, SessionError};
pub use explain::{ExplanationProvider, ExplanationService, ExplanationTracker};
pub use sessions::{
    AnswerOutcome, AnswerRecord, DeckBuilder, DeckSource, QuizSession, SessionLoopService,
    SessionProgress, SessionStats,
};
