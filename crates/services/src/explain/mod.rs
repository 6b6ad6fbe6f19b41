mod service;
mod tracker;

use async_trait::async_trait;

use leoula_core::model::WordEntry;

pub use service::{
    ExplanationService, FAILURE_MESSAGE, MISSING_KEY_MESSAGE, NO_EXPLANATION_MESSAGE,
    build_prompt, settings_from_env,
};
pub use tracker::{ExplanationState, ExplanationTracker};

/// Produces a short "why is this word masculine/feminine" note.
///
/// Implementations never fail: every error is folded into display text.
#[async_trait]
pub trait ExplanationProvider: Send + Sync {
    async fn explain(&self, word: &WordEntry) -> String;
}
