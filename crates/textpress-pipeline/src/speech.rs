// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Speech export.
//
// The speech capability writes audio to a file, so each request stages a
// temporary `.wav` file, reads it back once synthesis completes, and drops it
// on every exit path.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use textpress_core::error::{Result, TextpressError};
use textpress_core::types::ExportArtifact;
use textpress_providers::{SpeechCapability, SynthesisStatus};
use tracing::{debug, error, instrument};

/// Language used when the caller does not name one.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Turns text into a downloadable WAV artifact.
#[derive(Clone)]
pub struct SpeechSynthesizer {
    capability: Arc<dyn SpeechCapability>,
    timeout: Duration,
}

impl SpeechSynthesizer {
    pub fn new(capability: Arc<dyn SpeechCapability>, timeout: Duration) -> Self {
        Self {
            capability,
            timeout,
        }
    }

    /// Speak `text` in `language` (default `en-US`).
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn synthesize(&self, text: &str, language: Option<&str>) -> Result<ExportArtifact> {
        let language = language
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE);

        // Removed when `staging` drops, whichever way this function returns.
        let staging = tempfile::Builder::new()
            .prefix("textpress-speech-")
            .suffix(".wav")
            .tempfile()?;

        let call = self
            .capability
            .synthesize_to_file(text, language, staging.path());

        let status = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                error!(error = %e, "speech synthesis call failed");
                return Err(TextpressError::SynthesisFailure(e.to_string()));
            }
            Err(_) => {
                error!(timeout_secs = self.timeout.as_secs(), "speech synthesis timed out");
                return Err(TextpressError::SynthesisFailure(format!(
                    "timed out after {}s",
                    self.timeout.as_secs()
                )));
            }
        };

        if let SynthesisStatus::Canceled { reason } = status {
            error!(%reason, "speech synthesis did not complete");
            return Err(TextpressError::SynthesisFailure(reason));
        }

        let bytes = tokio::fs::read(staging.path()).await?;
        validate_wav(&bytes)?;

        debug!(bytes = bytes.len(), language, "speech audio ready");
        Ok(ExportArtifact::wav(bytes))
    }
}

/// Reject anything that is not a readable RIFF/WAVE stream.
fn validate_wav(bytes: &[u8]) -> Result<()> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| TextpressError::SynthesisFailure(format!("invalid WAV audio: {e}")))?;

    let spec = reader.spec();
    debug!(
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        samples = reader.len(),
        "WAV header read"
    );
    Ok(())
}
