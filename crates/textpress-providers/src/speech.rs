// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text-to-speech through the Azure Speech REST endpoint.
//
// The request body is SSML naming a neural voice; the response body is the
// finished RIFF/WAVE file, which is written straight to the caller's path.

use std::path::Path;

use async_trait::async_trait;
use quick_xml::escape::escape;
use textpress_core::config::SpeechConfig;
use tracing::{debug, instrument, warn};

use crate::error::ProviderError;
use crate::traits::{SpeechCapability, SynthesisStatus};

const OUTPUT_FORMAT: &str = "riff-24khz-16bit-mono-pcm";

/// Default neural voice per locale. Bare language codes resolve through the
/// first entry with a matching primary subtag.
const DEFAULT_VOICES: &[(&str, &str)] = &[
    ("en-US", "en-US-JennyNeural"),
    ("en-GB", "en-GB-SoniaNeural"),
    ("es-ES", "es-ES-ElviraNeural"),
    ("fr-FR", "fr-FR-DeniseNeural"),
    ("de-DE", "de-DE-KatjaNeural"),
    ("it-IT", "it-IT-ElsaNeural"),
    ("pt-BR", "pt-BR-FranciscaNeural"),
    ("nl-NL", "nl-NL-ColetteNeural"),
    ("ru-RU", "ru-RU-SvetlanaNeural"),
    ("ja-JP", "ja-JP-NanamiNeural"),
    ("ko-KR", "ko-KR-SunHiNeural"),
    ("zh-CN", "zh-CN-XiaoxiaoNeural"),
    ("ar-SA", "ar-SA-ZariyahNeural"),
    ("hi-IN", "hi-IN-SwaraNeural"),
];

/// Look up the default voice for `language`.
pub fn default_voice(language: &str) -> Option<&'static str> {
    let language = language.trim();
    if let Some((_, voice)) = DEFAULT_VOICES
        .iter()
        .find(|(locale, _)| locale.eq_ignore_ascii_case(language))
    {
        return Some(*voice);
    }

    let primary = language.split(['-', '_']).next()?;
    DEFAULT_VOICES
        .iter()
        .find(|(locale, _)| {
            locale
                .split('-')
                .next()
                .is_some_and(|p| p.eq_ignore_ascii_case(primary))
        })
        .map(|(_, voice)| *voice)
}

/// SSML document speaking `text` with `voice`.
fn build_ssml(text: &str, language: &str, voice: &str) -> String {
    format!(
        "<speak version=\"1.0\" xmlns=\"http://www.w3.org/2001/10/synthesis\" xml:lang=\"{}\">\
         <voice name=\"{}\">{}</voice></speak>",
        escape(language),
        escape(voice),
        escape(text)
    )
}

/// Calls `https://{region}.tts.speech.microsoft.com/cognitiveservices/v1`.
pub struct AzureSpeechSynthesizer {
    client: reqwest::Client,
    url: String,
    api_key: String,
    voice_override: Option<String>,
}

impl AzureSpeechSynthesizer {
    pub fn from_config(config: &SpeechConfig) -> Result<Self, ProviderError> {
        let (Some(api_key), Some(region)) = (&config.api_key, &config.region) else {
            return Err(ProviderError::Unavailable("Azure Speech"));
        };
        if !config.is_configured() {
            return Err(ProviderError::Unavailable("Azure Speech"));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            url: format!(
                "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                region.trim()
            ),
            api_key: api_key.clone(),
            voice_override: config.voice.clone().filter(|v| !v.trim().is_empty()),
        })
    }

    fn voice_for(&self, language: &str) -> Option<String> {
        self.voice_override
            .clone()
            .or_else(|| default_voice(language).map(str::to_string))
    }
}

#[async_trait]
impl SpeechCapability for AzureSpeechSynthesizer {
    #[instrument(skip(self, text, output), fields(text_len = text.len()))]
    async fn synthesize_to_file(
        &self,
        text: &str,
        language: &str,
        output: &Path,
    ) -> Result<SynthesisStatus, ProviderError> {
        let Some(voice) = self.voice_for(language) else {
            return Ok(SynthesisStatus::Canceled {
                reason: format!("Canceled: no voice available for language '{language}'"),
            });
        };

        let response = self
            .client
            .post(&self.url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .header(reqwest::header::USER_AGENT, "textpress")
            .body(build_ssml(text, language, &voice))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "speech service refused request");
            return Ok(SynthesisStatus::Canceled {
                reason: format!("Canceled: HTTP {}", status.as_u16()),
            });
        }

        let audio = response.bytes().await?;
        tokio::fs::write(output, &audio)
            .await
            .map_err(|e| ProviderError::Request(format!("failed to write audio: {e}")))?;

        debug!(bytes = audio.len(), voice = %voice, "speech audio written");
        Ok(SynthesisStatus::Completed)
    }
}
