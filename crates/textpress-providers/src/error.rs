// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Errors raised by provider calls.
//
// These never reach an HTTP client directly: transform stages swallow them
// and the speech exporter converts them into `SynthesisFailure`.

use thiserror::Error;

/// Errors that can occur while calling an external capability.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("provider request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be parsed as expected JSON.
    #[error("failed to parse provider response: {0}")]
    Parse(String),

    /// The response parsed but carried no usable text.
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// No credentials are configured for this capability.
    #[error("{0} is not configured")]
    Unavailable(&'static str),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Request(e.to_string())
        }
    }
}

/// Longest slice of an error body kept for logging.
const MAX_ERROR_BODY: usize = 512;

/// Read a failed response into a `Status` error.
pub(crate) async fn status_error(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    ProviderError::Status { status, body }
}
