// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub provider for deployments without cloud credentials.
//
// Every capability returns `Unavailable`. Transform stages then pass text
// through unchanged; speech synthesis fails loud.

use std::path::Path;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::traits::*;

/// No-op provider wired in place of any unconfigured service.
pub struct StubProvider;

#[async_trait]
impl GrammarCapability for StubProvider {
    async fn correct(&self, _text: &str) -> Result<String, ProviderError> {
        tracing::warn!("GrammarCapability::correct called on stub provider");
        Err(ProviderError::Unavailable("grammar correction"))
    }
}

#[async_trait]
impl TranslationCapability for StubProvider {
    async fn translate(&self, _text: &str, _target_language: &str) -> Result<String, ProviderError> {
        tracing::warn!("TranslationCapability::translate called on stub provider");
        Err(ProviderError::Unavailable("translation"))
    }
}

#[async_trait]
impl SpeechCapability for StubProvider {
    async fn synthesize_to_file(
        &self,
        _text: &str,
        _language: &str,
        _output: &Path,
    ) -> Result<SynthesisStatus, ProviderError> {
        tracing::warn!("SpeechCapability::synthesize_to_file called on stub provider");
        Err(ProviderError::Unavailable("speech synthesis"))
    }
}
