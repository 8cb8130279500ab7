// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — page-by-page text extraction and rendering text to PDF.

pub mod layout;
pub mod metrics;
pub mod reader;
pub mod writer;

pub use reader::PdfReader;
pub use writer::PdfRenderer;
