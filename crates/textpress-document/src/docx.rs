// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX reader — plain text from the main body of a Word document.
//
// A .docx file is a ZIP archive; the body lives in `word/document.xml` as
// WordprocessingML. Text sits in `<w:t>` elements inside runs (`<w:r>`),
// which sit inside paragraphs (`<w:p>`). Formatting is ignored.

use std::io::{Cursor, Read, Seek};

use quick_xml::Reader;
use quick_xml::events::Event;
use textpress_core::error::TextpressError;
use tracing::{debug, instrument};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

/// Separator placed between paragraphs in the extracted text.
const PARAGRAPH_BREAK: &str = "\n\n";

/// Reads the body text of DOCX files.
pub struct DocxReader;

impl DocxReader {
    /// Extract the text of every paragraph, in document order.
    ///
    /// Paragraphs are separated by a blank line; `<w:tab/>` becomes a tab and
    /// `<w:br/>`/`<w:cr/>` become newlines. Leading and trailing whitespace
    /// of the whole result is trimmed.
    #[instrument(skip_all, fields(bytes_len = bytes.len()))]
    pub fn read_text(bytes: &[u8]) -> Result<String, TextpressError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            TextpressError::ExtractionFailure(format!("Failed to open DOCX archive: {e}"))
        })?;

        let xml = read_part(&mut archive, DOCUMENT_PART)?;
        let paragraphs = parse_paragraphs(&xml)?;

        debug!(paragraphs = paragraphs.len(), "DOCX body parsed");

        Ok(paragraphs.join(PARAGRAPH_BREAK).trim().to_string())
    }
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, TextpressError> {
    let mut file = archive.by_name(name).map_err(|e| {
        TextpressError::ExtractionFailure(format!("DOCX is missing {name}: {e}"))
    })?;

    let mut content = String::new();
    file.read_to_string(&mut content).map_err(|e| {
        TextpressError::ExtractionFailure(format!("Failed to read {name}: {e}"))
    })?;
    Ok(content)
}

fn parse_paragraphs(xml: &str) -> Result<Vec<String>, TextpressError> {
    // Whitespace inside <w:t xml:space="preserve"> is significant, so text
    // events are not trimmed.
    let mut reader = Reader::from_str(xml);

    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => current.clear(),
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                b"r" => in_run = false,
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                // <w:p/> is an empty paragraph.
                b"p" => paragraphs.push(String::new()),
                b"tab" if in_run => current.push('\t'),
                b"br" | b"cr" if in_run => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_run && in_text {
                    let text = e.unescape().map_err(|err| {
                        TextpressError::ExtractionFailure(format!("DOCX XML parse error: {err}"))
                    })?;
                    current.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(TextpressError::ExtractionFailure(format!(
                    "DOCX XML parse error: {e}"
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}
