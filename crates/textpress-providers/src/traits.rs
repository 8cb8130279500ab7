// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capability traits for the external services the pipeline depends on.
//
// Implementors must be `Send + Sync` so they can be shared across request
// tasks as `Arc<dyn ...>`.

use std::path::Path;

use async_trait::async_trait;

use crate::error::ProviderError;

/// Rewrites text with corrected grammar and spelling.
#[async_trait]
pub trait GrammarCapability: Send + Sync {
    async fn correct(&self, text: &str) -> Result<String, ProviderError>;
}

/// Translates text into a target language (BCP 47 code such as `fr`).
#[async_trait]
pub trait TranslationCapability: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError>;
}

/// How a synthesis run finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisStatus {
    /// Audio was written to the output path.
    Completed,
    /// The service declined or aborted; the output path holds nothing usable.
    Canceled { reason: String },
}

/// Speaks text into a WAV file.
#[async_trait]
pub trait SpeechCapability: Send + Sync {
    /// Synthesize `text` in `language` (a locale such as `en-US`) and write
    /// the audio to `output`.
    ///
    /// `Err` is reserved for transport failures; a service-side refusal is
    /// reported as `Ok(SynthesisStatus::Canceled)`.
    async fn synthesize_to_file(
        &self,
        text: &str,
        language: &str,
        output: &Path,
    ) -> Result<SynthesisStatus, ProviderError>;
}
