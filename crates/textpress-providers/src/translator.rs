// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Translation through the Azure Translator Text v3 REST API.

use async_trait::async_trait;
use serde::Deserialize;
use textpress_core::config::TranslatorConfig;
use tracing::{debug, instrument};

use crate::error::{ProviderError, status_error};
use crate::traits::TranslationCapability;

const API_VERSION: &str = "3.0";

/// Calls `POST {endpoint}/translate?api-version=3.0&to={lang}`.
pub struct AzureTranslator {
    client: reqwest::Client,
    url: String,
    api_key: String,
    region: String,
}

impl AzureTranslator {
    pub fn from_config(config: &TranslatorConfig) -> Result<Self, ProviderError> {
        let api_key = match &config.api_key {
            Some(key) if config.is_configured() => key.clone(),
            _ => return Err(ProviderError::Unavailable("Azure Translator")),
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            url: format!("{}/translate", config.endpoint.trim_end_matches('/')),
            api_key,
            region: config.region.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TranslateItem {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

/// First translation of the first input item.
fn parse_translation(body: &str) -> Result<String, ProviderError> {
    let items: Vec<TranslateItem> =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    items
        .into_iter()
        .next()
        .and_then(|item| item.translations.into_iter().next())
        .map(|translation| translation.text)
        .ok_or(ProviderError::EmptyResponse)
}

#[async_trait]
impl TranslationCapability for AzureTranslator {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        let body = serde_json::json!([{ "text": text }]);

        let response = self
            .client
            .post(&self.url)
            .query(&[("api-version", API_VERSION), ("to", target_language)])
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Ocp-Apim-Subscription-Region", &self.region)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let raw = response.text().await?;
        let translated = parse_translation(&raw)?;
        debug!(chars = translated.len(), "translation received");
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_translate_url() {
        let config = TranslatorConfig {
            api_key: Some("key".into()),
            endpoint: "https://api.cognitive.microsofttranslator.com/".into(),
            ..TranslatorConfig::default()
        };
        let translator = AzureTranslator::from_config(&config).unwrap();
        assert_eq!(
            translator.url,
            "https://api.cognitive.microsofttranslator.com/translate"
        );
        assert_eq!(translator.region, "global");
    }

    #[test]
    fn missing_key_is_unavailable() {
        assert!(matches!(
            AzureTranslator::from_config(&TranslatorConfig::default()),
            Err(ProviderError::Unavailable(_))
        ));
    }

    #[test]
    fn parses_first_translation() {
        let body = r#"[{"detectedLanguage":{"language":"en","score":1.0},
                        "translations":[{"text":"Bonjour le monde","to":"fr"}]}]"#;
        assert_eq!(parse_translation(body).unwrap(), "Bonjour le monde");
    }

    #[test]
    fn empty_translation_list_is_empty_response() {
        assert!(matches!(
            parse_translation("[]"),
            Err(ProviderError::EmptyResponse)
        ));
        assert!(matches!(
            parse_translation(r#"[{"translations":[]}]"#),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn error_object_is_parse_error() {
        let body = r#"{"error":{"code":401000,"message":"invalid key"}}"#;
        assert!(matches!(parse_translation(body), Err(ProviderError::Parse(_))));
    }
}
