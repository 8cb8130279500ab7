// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document extractor — dispatch an uploaded document to the reader for its
// declared format and return plain text.

use textpress_core::error::{Result, TextpressError};
use textpress_core::{DocumentFormat, UploadedDocument};
use tracing::{debug, instrument};

use crate::docx::DocxReader;
use crate::pdf::reader::PdfReader;

/// Guidance returned for legacy `.doc` uploads.
pub const DOC_REJECTION: &str =
    ".doc files require additional processing. Please convert to .docx or .txt";

/// Returned for any extension outside the supported set.
pub const UNSUPPORTED_TYPE: &str = "Unsupported file type";

/// Converts uploaded documents into plain text. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the text of an uploaded document.
    pub fn extract(&self, document: &UploadedDocument) -> Result<String> {
        self.extract_bytes(&document.bytes, document.format)
    }

    /// Extract text from `bytes` interpreted as `format`.
    #[instrument(skip(self, bytes), fields(bytes_len = bytes.len()))]
    pub fn extract_bytes(&self, bytes: &[u8], format: DocumentFormat) -> Result<String> {
        let text = match format {
            DocumentFormat::Txt => String::from_utf8(bytes.to_vec())
                .map_err(|e| TextpressError::InvalidEncoding(e.utf8_error().to_string()))?,
            DocumentFormat::Docx => DocxReader::read_text(bytes)?,
            DocumentFormat::Pdf => PdfReader::from_bytes(bytes)?.extract_text(),
            DocumentFormat::Doc => {
                return Err(TextpressError::UnsupportedFormat(DOC_REJECTION.into()));
            }
        };

        debug!(chars = text.chars().count(), "Text extracted");
        Ok(text)
    }

    /// Resolve the format from `filename` and extract.
    ///
    /// An unrecognised extension is rejected before any parsing is attempted.
    pub fn extract_named(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let format = DocumentFormat::from_filename(filename)
            .ok_or_else(|| TextpressError::UnsupportedFormat(UNSUPPORTED_TYPE.into()))?;
        self.extract_bytes(bytes, format)
    }
}
