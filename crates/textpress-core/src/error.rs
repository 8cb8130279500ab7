// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Textpress.
//
// Only fail-loud operations produce these errors. Grammar correction and
// translation never surface an error to the caller.

use thiserror::Error;

/// Top-level error type for all Textpress operations.
#[derive(Debug, Error)]
pub enum TextpressError {
    // -- Extraction errors --
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("file is not valid UTF-8 text: {0}")]
    InvalidEncoding(String),

    #[error("text extraction failed: {0}")]
    ExtractionFailure(String),

    // -- Pipeline errors --
    #[error("invalid processing request: {0}")]
    InvalidRequest(String),

    #[error("history store error: {0}")]
    PersistenceFailure(String),

    // -- Export errors --
    #[error("speech synthesis failed: {0}")]
    SynthesisFailure(String),

    #[error("PDF generation failed: {0}")]
    RenderFailure(String),

    // -- Ambient --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Which side of the request/response boundary an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The caller sent something we cannot accept; resubmitting unchanged
    /// will fail again.
    ClientError,
    /// Something on our side (store, provider, disk) failed.
    ServerError,
}

impl TextpressError {
    /// Classify this error for the HTTP surface.
    pub fn class(&self) -> FailurePolicy {
        match self {
            Self::UnsupportedFormat(_)
            | Self::InvalidEncoding(_)
            | Self::InvalidRequest(_)
            | Self::Serialization(_) => FailurePolicy::ClientError,
            Self::ExtractionFailure(_)
            | Self::PersistenceFailure(_)
            | Self::SynthesisFailure(_)
            | Self::RenderFailure(_)
            | Self::Config(_)
            | Self::Io(_) => FailurePolicy::ServerError,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TextpressError>;
