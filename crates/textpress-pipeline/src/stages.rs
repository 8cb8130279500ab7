// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fail-soft transform stages.
//
// A stage wraps one external capability and always returns text. Any failure
// of the capability (transport, auth, quota, bad response, timeout) is logged
// and the stage's input comes back unchanged.

use std::sync::Arc;
use std::time::Duration;

use textpress_providers::{GrammarCapability, TranslationCapability};
use tracing::{debug, warn};

/// Grammar and spelling correction.
#[derive(Clone)]
pub struct GrammarCorrector {
    capability: Arc<dyn GrammarCapability>,
    timeout: Duration,
}

impl GrammarCorrector {
    pub fn new(capability: Arc<dyn GrammarCapability>, timeout: Duration) -> Self {
        Self {
            capability,
            timeout,
        }
    }

    /// Corrected text, or `text` itself if correction failed.
    pub async fn apply(&self, text: &str) -> String {
        match tokio::time::timeout(self.timeout, self.capability.correct(text)).await {
            Ok(Ok(corrected)) => {
                debug!(chars = corrected.len(), "grammar correction applied");
                corrected
            }
            Ok(Err(e)) => {
                warn!(error = %e, "grammar correction failed, keeping input text");
                text.to_string()
            }
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "grammar correction timed out, keeping input text");
                text.to_string()
            }
        }
    }
}

/// Translation into a target language.
#[derive(Clone)]
pub struct Translator {
    capability: Arc<dyn TranslationCapability>,
    timeout: Duration,
}

impl Translator {
    pub fn new(capability: Arc<dyn TranslationCapability>, timeout: Duration) -> Self {
        Self {
            capability,
            timeout,
        }
    }

    /// Translated text, or `text` itself if translation failed.
    pub async fn apply(&self, text: &str, target_language: &str) -> String {
        let call = self.capability.translate(text, target_language);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(translated)) => {
                debug!(target_language, chars = translated.len(), "translation applied");
                translated
            }
            Ok(Err(e)) => {
                warn!(target_language, error = %e, "translation failed, keeping input text");
                text.to_string()
            }
            Err(_) => {
                warn!(target_language, timeout_secs = self.timeout.as_secs(), "translation timed out, keeping input text");
                text.to_string()
            }
        }
    }
}
