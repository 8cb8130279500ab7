// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// textpress-document — Document handling for the Textpress pipeline.
//
// Provides text extraction from uploaded documents (plain text, DOCX, PDF)
// and the PDF renderer used for exports (greedy word wrap, page layout).

pub mod docx;
pub mod extract;
pub mod pdf;

// Re-export the primary structs so callers can use `textpress_document::DocumentExtractor` etc.
pub use docx::DocxReader;
pub use extract::DocumentExtractor;
pub use pdf::layout::{wrap_lines, TextMeasure};
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfRenderer;
