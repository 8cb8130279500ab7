// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the JSON error envelope.
//
// Every fail-loud error is mapped to a plain sentence, a concrete suggestion,
// and the HTTP status the route layer should answer with.

use crate::error::{FailurePolicy, TextpressError};

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try next.
    pub suggestion: String,
    /// HTTP status code for the response.
    pub status: u16,
}

impl HumanError {
    /// Single string for the `error` field of the envelope.
    pub fn envelope_text(&self) -> String {
        if self.suggestion.is_empty() {
            self.message.clone()
        } else {
            format!("{} {}", self.message, self.suggestion)
        }
    }
}

/// Convert a `TextpressError` into a `HumanError`.
pub fn humanize_error(err: &TextpressError) -> HumanError {
    let status = match err.class() {
        FailurePolicy::ClientError => 400,
        FailurePolicy::ServerError => 500,
    };

    let (message, suggestion) = match err {
        // -- Extraction --
        // The detail already tells the user what to upload instead.
        TextpressError::UnsupportedFormat(detail) => (detail.clone(), String::new()),

        TextpressError::InvalidEncoding(_) => (
            "This text file isn't UTF-8 encoded.".to_string(),
            "Save the file with UTF-8 encoding and upload it again.".to_string(),
        ),

        TextpressError::ExtractionFailure(detail) => (
            "We couldn't read the text in this file.".to_string(),
            format!("The file may be damaged or protected. ({detail})"),
        ),

        // -- Pipeline --
        TextpressError::InvalidRequest(detail) => (
            "The request is incomplete.".to_string(),
            format!("Check the options and try again. ({detail})"),
        ),

        TextpressError::PersistenceFailure(_) => (
            "Your result couldn't be saved to history.".to_string(),
            "Nothing was saved. Please submit the text again.".to_string(),
        ),

        // -- Export --
        TextpressError::SynthesisFailure(detail) => (
            format!("Speech synthesis failed: {detail}"),
            "Check the selected language and try again.".to_string(),
        ),

        TextpressError::RenderFailure(_) => (
            "The PDF couldn't be created.".to_string(),
            "Try again with shorter text.".to_string(),
        ),

        // -- Ambient --
        TextpressError::Config(_) => (
            "The service is not configured correctly.".to_string(),
            String::new(),
        ),

        TextpressError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                (
                    "The service doesn't have permission to use its data directory.".to_string(),
                    String::new(),
                )
            } else {
                (
                    "There was a problem reading or writing a file.".to_string(),
                    "Try again. If this keeps happening, the disk may be full.".to_string(),
                )
            }
        }

        TextpressError::Serialization(_) => (
            "The request body isn't valid JSON.".to_string(),
            String::new(),
        ),
    };

    HumanError {
        message,
        suggestion,
        status,
    }
}
