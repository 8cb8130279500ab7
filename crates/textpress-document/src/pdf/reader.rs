// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — load an uploaded PDF and pull its text out page by page
// using the `lopdf` crate.

use lopdf::Document;
use textpress_core::error::TextpressError;
use tracing::{debug, instrument, warn};

/// Reads text out of an existing PDF.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, TextpressError> {
        let document = Document::load_mem(data).map_err(|err| {
            TextpressError::ExtractionFailure(format!(
                "Error extracting text from PDF: {}",
                err
            ))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Text of a single page (1-indexed).
    ///
    /// A page without extractable text (a scanned image, an empty page, or
    /// content lopdf cannot decode) yields an empty string.
    pub fn page_text(&self, page_number: u32) -> String {
        match self.document.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(err) => {
                warn!(page_number, %err, "no extractable text on page");
                String::new()
            }
        }
    }

    /// Concatenate the text of every page in page order.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn extract_text(&self) -> String {
        // `get_pages` is a BTreeMap keyed by page number, so iteration is in
        // page order.
        let text: String = self
            .document
            .get_pages()
            .keys()
            .map(|&page_number| self.page_text(page_number))
            .collect();

        debug!(chars = text.len(), "PDF text extracted");
        text
    }
}
