// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF renderer — turn processed text into a downloadable PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.
//
// Layout: a bold title line and a generation timestamp at the top of the
// first page, followed by the body text greedily wrapped to the printable
// width. Body lines that run past the bottom margin continue on a new page.

use chrono::{DateTime, Local};
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};
use textpress_core::error::TextpressError;
use tracing::{debug, info, instrument};

use crate::pdf::layout::wrap_lines;
use crate::pdf::metrics::Helvetica;

const TITLE: &str = "Processed Text";
const TITLE_SIZE_PT: f32 = 16.0;
const STAMP_SIZE_PT: f32 = 10.0;
const BODY_SIZE_PT: f32 = 12.0;
const BODY_LEADING_PT: f32 = 14.4;
const MARGIN_PT: f32 = 72.0;

/// US Letter, 8.5 x 11 in.
const PAGE_W_PT: f32 = 612.0;
const PAGE_H_PT: f32 = 792.0;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Distance from the top edge to each element of the title block.
const TITLE_OFFSET_PT: f32 = 72.0;
const STAMP_OFFSET_PT: f32 = 90.0;
const BODY_OFFSET_PT: f32 = 120.0;

/// Renders text onto US Letter pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Width available to body text between the side margins.
    pub fn printable_width_pt(&self) -> f32 {
        PAGE_W_PT - 2.0 * MARGIN_PT
    }

    /// Wrap `text` the way the body of the PDF will be laid out.
    pub fn layout(&self, text: &str) -> Vec<String> {
        wrap_lines(text, self.printable_width_pt(), &Helvetica::new(BODY_SIZE_PT))
    }

    /// Render `text` stamped with the current local time.
    pub fn render(&self, text: &str) -> Result<Vec<u8>, TextpressError> {
        self.render_at(text, Local::now())
    }

    /// Render `text` stamped with `generated_at`.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn render_at(
        &self,
        text: &str,
        generated_at: DateTime<Local>,
    ) -> Result<Vec<u8>, TextpressError> {
        let page_w = Mm(PAGE_W_PT * MM_PER_PT);
        let page_h = Mm(PAGE_H_PT * MM_PER_PT);

        let lines = self.layout(text);
        let stamp = format!(
            "Generated on: {}",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        );

        info!(lines = lines.len(), "Rendering text PDF");

        let mut pages: Vec<PdfPage> = Vec::new();
        let mut ops: Vec<Op> = Vec::new();

        push_text(
            &mut ops,
            TITLE,
            BuiltinFont::HelveticaBold,
            TITLE_SIZE_PT,
            MARGIN_PT,
            PAGE_H_PT - TITLE_OFFSET_PT,
        );
        push_text(
            &mut ops,
            &stamp,
            BuiltinFont::Helvetica,
            STAMP_SIZE_PT,
            MARGIN_PT,
            PAGE_H_PT - STAMP_OFFSET_PT,
        );

        let mut y_pt = PAGE_H_PT - BODY_OFFSET_PT;
        for line in &lines {
            if y_pt < MARGIN_PT {
                pages.push(PdfPage::new(page_w, page_h, std::mem::take(&mut ops)));
                y_pt = PAGE_H_PT - MARGIN_PT;
            }

            // Blank lines only advance the cursor.
            if !line.is_empty() {
                push_text(
                    &mut ops,
                    line,
                    BuiltinFont::Helvetica,
                    BODY_SIZE_PT,
                    MARGIN_PT,
                    y_pt,
                );
            }
            y_pt -= BODY_LEADING_PT;
        }
        pages.push(PdfPage::new(page_w, page_h, ops));

        let mut doc = PdfDocument::new(TITLE);
        doc.with_pages(pages);

        debug!(pages = doc.pages.len(), "Text layout complete");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

        if output.is_empty() {
            return Err(TextpressError::RenderFailure(
                "printpdf produced no output".into(),
            ));
        }
        Ok(output)
    }
}

/// Append one positioned line of text in a built-in font.
fn push_text(ops: &mut Vec<Op>, text: &str, font: BuiltinFont, size_pt: f32, x_pt: f32, y_pt: f32) {
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(x_pt),
            y: Pt(y_pt),
        },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(size_pt),
        font: font.clone(),
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(text.to_string())],
        font,
    });
    ops.push(Op::EndTextSection);
}
