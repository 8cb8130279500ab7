// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Textpress pipeline.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TextpressError};

/// Unique identifier for a processing result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultId(pub Uuid);

impl ResultId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ResultId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ResultId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared format of an uploaded document.
///
/// `Doc` is recognised only so that it can be rejected with a helpful
/// message; every other unknown extension never becomes a `DocumentFormat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Txt,
    Docx,
    Pdf,
    /// Legacy binary Word format (always rejected).
    Doc,
}

impl DocumentFormat {
    /// Infer the format from a file extension (with or without leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "txt" => Some(Self::Txt),
            "docx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            _ => None,
        }
    }

    /// Infer the format from the extension after the last dot of a filename.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        Self::from_extension(ext)
    }
}

/// An uploaded document, alive only for the duration of one extraction.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub format: DocumentFormat,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(format: DocumentFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }
}

/// Per-request configuration of the transform chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingRequest {
    pub original_text: String,
    #[serde(default)]
    pub apply_grammar_correction: bool,
    #[serde(default)]
    pub apply_translation: bool,
    #[serde(default)]
    pub target_language: Option<String>,
}

impl ProcessingRequest {
    /// A request that applies no transforms.
    pub fn passthrough(original_text: impl Into<String>) -> Self {
        Self {
            original_text: original_text.into(),
            apply_grammar_correction: false,
            apply_translation: false,
            target_language: None,
        }
    }

    pub fn with_grammar_correction(mut self) -> Self {
        self.apply_grammar_correction = true;
        self
    }

    pub fn with_translation(mut self, target_language: impl Into<String>) -> Self {
        self.apply_translation = true;
        self.target_language = Some(target_language.into());
        self
    }

    /// Check the target-language invariant and normalise the request.
    ///
    /// A translation request must name a non-blank target language. When
    /// translation is off, any supplied target language is dropped.
    pub fn validate(mut self) -> Result<Self> {
        if self.apply_translation {
            let target = self
                .target_language
                .as_deref()
                .map(str::trim)
                .filter(|lang| !lang.is_empty())
                .ok_or_else(|| {
                    TextpressError::InvalidRequest(
                        "translation requested without a target language".into(),
                    )
                })?;
            self.target_language = Some(target.to_string());
        } else {
            self.target_language = None;
        }
        Ok(self)
    }
}

/// The immutable outcome of one processing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub id: ResultId,
    pub original_text: String,
    pub processed_text: String,
    pub apply_grammar_correction: bool,
    pub apply_translation: bool,
    pub target_language: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProcessingResult {
    /// Build a fresh result for `request` with a new id and timestamp.
    ///
    /// The timestamp is truncated to microseconds, the precision at which
    /// the history store persists it.
    pub fn new(request: &ProcessingRequest, processed_text: String) -> Self {
        Self {
            id: ResultId::new(),
            original_text: request.original_text.clone(),
            processed_text,
            apply_grammar_correction: request.apply_grammar_correction,
            apply_translation: request.apply_translation,
            target_language: request.target_language.clone(),
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}

/// Orchestrator states, in the order a request passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    Received,
    Extracted,
    Corrected,
    Translated,
    Persisted,
    Responded,
}

/// Kinds of downloadable export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    Pdf,
    Wav,
}

impl ArtifactKind {
    /// MIME type for the Content-Type header.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Wav => "audio/wav",
        }
    }

    /// Fixed download filename.
    pub fn filename(&self) -> &'static str {
        match self {
            Self::Pdf => "processed_text.pdf",
            Self::Wav => "speech_output.wav",
        }
    }
}

/// A rendered export, never persisted.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub kind: ArtifactKind,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self {
            kind: ArtifactKind::Pdf,
            bytes,
        }
    }

    pub fn wav(bytes: Vec<u8>) -> Self {
        Self {
            kind: ArtifactKind::Wav,
            bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_filename() {
        assert_eq!(
            DocumentFormat::from_filename("notes.TXT"),
            Some(DocumentFormat::Txt)
        );
        assert_eq!(
            DocumentFormat::from_filename("report.final.docx"),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(
            DocumentFormat::from_filename("legacy.doc"),
            Some(DocumentFormat::Doc)
        );
        assert_eq!(DocumentFormat::from_filename("image.png"), None);
        assert_eq!(DocumentFormat::from_filename("README"), None);
    }

    #[test]
    fn format_from_extension_tolerates_dot() {
        assert_eq!(
            DocumentFormat::from_extension(".pdf"),
            Some(DocumentFormat::Pdf)
        );
    }

    #[test]
    fn translation_without_language_is_rejected() {
        let request = ProcessingRequest {
            original_text: "hello".into(),
            apply_grammar_correction: false,
            apply_translation: true,
            target_language: Some("".into()),
        };
        assert!(matches!(
            request.validate(),
            Err(TextpressError::InvalidRequest(_))
        ));

        let request = ProcessingRequest {
            target_language: None,
            ..ProcessingRequest::passthrough("hello")
        };
        let request = ProcessingRequest {
            apply_translation: true,
            ..request
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn target_dropped_when_not_translating() {
        let request = ProcessingRequest {
            target_language: Some("de".into()),
            ..ProcessingRequest::passthrough("hello")
        };
        let validated = request.validate().unwrap();
        assert_eq!(validated.target_language, None);
    }

    #[test]
    fn target_is_trimmed() {
        let validated = ProcessingRequest::passthrough("hello")
            .with_translation("  fr ")
            .validate()
            .unwrap();
        assert_eq!(validated.target_language.as_deref(), Some("fr"));
    }

    #[test]
    fn results_get_fresh_ids() {
        let request = ProcessingRequest::passthrough("same");
        let a = ProcessingResult::new(&request, "same".into());
        let b = ProcessingResult::new(&request, "same".into());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn result_id_serializes_as_plain_uuid() {
        let id = ResultId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.0));
    }

    #[test]
    fn artifact_metadata() {
        assert_eq!(ArtifactKind::Pdf.mime_type(), "application/pdf");
        assert_eq!(ArtifactKind::Wav.filename(), "speech_output.wav");
    }
}
