use std::env;
use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use leoula_core::model::{
    ExplainerSettings, ExplainerSettingsDraft, ExplainerSettingsError, WordEntry,
};

use super::ExplanationProvider;
use crate::error::ExplanationError;

pub const MISSING_KEY_MESSAGE: &str = "API Key missing. Cannot generate explanation.";
pub const NO_EXPLANATION_MESSAGE: &str = "No explanation available.";
pub const FAILURE_MESSAGE: &str = "Could not load explanation at this time.";

/// Read explainer settings from `LEOULA_AI_*` environment variables.
///
/// # Errors
///
/// Returns `ExplainerSettingsError` for an unparsable base URL or a zero timeout.
/// A timeout that is not a number is ignored in favour of the default.
pub fn settings_from_env() -> Result<ExplainerSettings, ExplainerSettingsError> {
    ExplainerSettingsDraft {
        api_key: env::var("LEOULA_AI_API_KEY").ok(),
        model: env::var("LEOULA_AI_MODEL").ok(),
        base_url: env::var("LEOULA_AI_BASE_URL").ok(),
        timeout_secs: env::var("LEOULA_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse().ok()),
    }
    .validate()
}

/// Prompt sent for `word`. Asks for markdown-style emphasis the terminal renders.
#[must_use]
pub fn build_prompt(word: &WordEntry) -> String {
    format!(
        "The French word \"{french}\" ({english}) is {gender}.\n\
         Explain briefly why it has this gender (a rule, pattern, or ending like -e or -tion) \
         or give a very short mnemonic.\n\
         Then give one simple French sentence using the word correctly.\n\
         \n\
         Formatting rules:\n\
         - Use **bold** for the French word and key grammar terms.\n\
         - Use *italics* for the example sentence.\n\
         - Keep it under 50 words.",
        french = word.source_text(),
        english = word.translation(),
        gender = word.gender(),
    )
}

/// Chat-completions client for word explanations.
#[derive(Clone)]
pub struct ExplanationService {
    client: Client,
    settings: ExplainerSettings,
}

impl ExplanationService {
    /// # Errors
    ///
    /// Returns `ExplanationError::Http` if the HTTP client cannot be built.
    pub fn new(settings: ExplainerSettings) -> Result<Self, ExplanationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs()))
            .build()?;
        Ok(Self { client, settings })
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.settings.is_configured()
    }

    /// Ask the backend to explain `word`.
    ///
    /// # Errors
    ///
    /// Returns `ExplanationError` when no key is configured, the request fails or
    /// times out, the status is not 2xx, or the reply has no content.
    pub async fn generate(&self, word: &WordEntry) -> Result<String, ExplanationError> {
        let api_key = self
            .settings
            .api_key()
            .ok_or(ExplanationError::Disabled)?;

        let url = format!(
            "{}/chat/completions",
            self.settings.base_url().trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: self.settings.model().to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(word),
            }],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExplanationError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(ExplanationError::EmptyResponse)?;

        Ok(content)
    }
}

#[async_trait]
impl ExplanationProvider for ExplanationService {
    async fn explain(&self, word: &WordEntry) -> String {
        match self.generate(word).await {
            Ok(text) => text,
            Err(ExplanationError::Disabled) => MISSING_KEY_MESSAGE.to_string(),
            Err(ExplanationError::EmptyResponse) => NO_EXPLANATION_MESSAGE.to_string(),
            Err(err) => {
                error!("explanation request for {} failed: {err}", word.id());
                FAILURE_MESSAGE.to_string()
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
