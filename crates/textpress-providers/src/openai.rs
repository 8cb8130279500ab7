// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grammar correction through an Azure OpenAI chat-completions deployment.

use async_trait::async_trait;
use serde::Deserialize;
use textpress_core::config::OpenAiConfig;
use tracing::{debug, instrument};

use crate::error::{ProviderError, status_error};
use crate::traits::GrammarCapability;

const SYSTEM_PROMPT: &str = "You are a professional text editor. Correct grammar, spelling \
                             and improve the text while preserving its original meaning.";

const TEMPERATURE: f32 = 0.0;
const MAX_TOKENS: u32 = 2000;

/// Calls `{endpoint}/openai/deployments/{deployment}/chat/completions`.
pub struct AzureOpenAiCorrector {
    client: reqwest::Client,
    url: String,
    api_key: String,
    api_version: String,
}

impl AzureOpenAiCorrector {
    /// Build a corrector from configuration.
    ///
    /// Returns `Unavailable` when the endpoint or key is missing.
    pub fn from_config(config: &OpenAiConfig) -> Result<Self, ProviderError> {
        let (Some(endpoint), Some(api_key)) = (&config.endpoint, &config.api_key) else {
            return Err(ProviderError::Unavailable("Azure OpenAI"));
        };
        if !config.is_configured() {
            return Err(ProviderError::Unavailable("Azure OpenAI"));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            url: format!(
                "{}/openai/deployments/{}/chat/completions",
                endpoint.trim_end_matches('/'),
                config.deployment
            ),
            api_key: api_key.clone(),
            api_version: config.api_version.clone(),
        })
    }
}

/// User message wrapping the text to correct.
fn user_prompt(text: &str) -> String {
    format!("Please correct the following text:\n\n{text}")
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Pull the first choice's content out of a chat-completions body.
fn parse_completion(body: &str) -> Result<String, ProviderError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let corrected = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if corrected.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(corrected)
}

#[async_trait]
impl GrammarCapability for AzureOpenAiCorrector {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn correct(&self, text: &str) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user",   "content": user_prompt(text) }
            ],
            "temperature": TEMPERATURE,
            "max_tokens":  MAX_TOKENS
        });

        let response = self
            .client
            .post(&self.url)
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let raw = response.text().await?;
        let corrected = parse_completion(&raw)?;
        debug!(chars = corrected.len(), "grammar correction received");
        Ok(corrected)
    }
}
