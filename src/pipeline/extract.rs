//! Plain-text extraction from PDF and DOCX documents.
//!
//! The extractor only borrows the document's byte buffer, so the caller can
//! hand the same bytes to the highlighter afterwards.
//!
//! ## PDF
//! Each page's text layer is read through pdfium and appended in page order,
//! each page followed by `\n`. The parsed document is dropped before
//! returning, on error paths too.
//!
//! ## DOCX
//! A DOCX file is a zip archive; the body lives in `word/document.xml`.
//! Text comes from `<w:t>` runs. Paragraph ends and `<w:br/>`/`<w:cr/>` become
//! `\n`, `<w:tab/>` becomes `\t`. Header parts are emitted before the body and
//! footer parts after it.

use crate::config::{AnalyzerConfig, MalformedPolicy};
use crate::document::{Document, DocumentFormat};
use crate::error::AtsError;
use pdfium_render::prelude::*;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use tracing::{debug, warn};
use zip::ZipArchive;

const DOCX_BODY: &str = "word/document.xml";

/// Turns documents into plain text, applying the configured
/// [`MalformedPolicy`].
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    policy: MalformedPolicy,
    password: Option<String>,
}

impl TextExtractor {
    pub fn new(policy: MalformedPolicy, password: Option<String>) -> Self {
        Self { policy, password }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.malformed, config.password.clone())
    }

    /// Extract the text of `document`.
    ///
    /// `pdfium` is only needed for PDF documents; passing `None` for a PDF
    /// fails with [`AtsError::PdfiumBindingFailed`].
    ///
    /// # Errors
    /// [`AtsError::MalformedDocument`] under [`MalformedPolicy::Fail`] when the
    /// bytes cannot be parsed.
    pub fn extract(&self, pdfium: Option<&Pdfium>, document: &Document) -> Result<String, AtsError> {
        let result = match document.format {
            DocumentFormat::Pdf => {
                let pdfium = pdfium.ok_or_else(|| {
                    AtsError::PdfiumBindingFailed("pdfium is not bound".to_string())
                })?;
                extract_pdf(pdfium, &document.name, &document.bytes, self.password.as_deref())
            }
            DocumentFormat::Docx => extract_docx(&document.name, &document.bytes),
        };

        match result {
            Ok(text) => {
                debug!("Extracted {} chars from '{}'", text.len(), document.name);
                Ok(text)
            }
            Err(e @ AtsError::MalformedDocument { .. })
                if self.policy == MalformedPolicy::TreatAsEmpty =>
            {
                warn!("{e}; treating '{}' as empty", document.name);
                Ok(String::new())
            }
            Err(e) => Err(e),
        }
    }
}

fn malformed(name: &str, format: DocumentFormat, detail: impl Into<String>) -> AtsError {
    AtsError::MalformedDocument {
        name: name.to_string(),
        format: format.to_string(),
        detail: detail.into(),
    }
}

// ── PDF ──────────────────────────────────────────────────────────────────

/// Text of every page in order, each followed by `\n`.
pub fn extract_pdf(
    pdfium: &Pdfium,
    name: &str,
    bytes: &[u8],
    password: Option<&str>,
) -> Result<String, AtsError> {
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, password)
        .map_err(|e| malformed(name, DocumentFormat::Pdf, load_failure_detail(&e, password)))?;

    let mut text = String::new();
    for (index, page) in document.pages().iter().enumerate() {
        let page_text = page.text().map_err(|e| {
            malformed(name, DocumentFormat::Pdf, format!("page {}: {:?}", index + 1, e))
        })?;
        text.push_str(&page_text.all());
        text.push('\n');
    }
    Ok(text)
}

pub(crate) fn load_failure_detail(error: &PdfiumError, password: Option<&str>) -> String {
    let detail = format!("{:?}", error);
    if detail.contains("Password") || detail.contains("password") {
        if password.is_some() {
            "wrong password".to_string()
        } else {
            "password required".to_string()
        }
    } else {
        detail
    }
}

// ── DOCX ─────────────────────────────────────────────────────────────────

/// Text of headers, body and footers of a DOCX byte buffer.
pub fn extract_docx(name: &str, bytes: &[u8]) -> Result<String, AtsError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| malformed(name, DocumentFormat::Docx, format!("not a zip archive: {e}")))?;

    let mut headers: Vec<String> = Vec::new();
    let mut footers: Vec<String> = Vec::new();
    for part in archive.file_names() {
        if is_part(part, "word/header") {
            headers.push(part.to_string());
        } else if is_part(part, "word/footer") {
            footers.push(part.to_string());
        }
    }
    headers.sort();
    footers.sort();

    if archive.by_name(DOCX_BODY).is_err() {
        return Err(malformed(name, DocumentFormat::Docx, format!("missing {DOCX_BODY}")));
    }

    let mut text = String::new();
    let parts = headers
        .iter()
        .map(String::as_str)
        .chain([DOCX_BODY])
        .chain(footers.iter().map(String::as_str));
    for part in parts {
        let xml = read_part(&mut archive, part)
            .map_err(|detail| malformed(name, DocumentFormat::Docx, detail))?;
        let part_text = wordprocessing_text(&xml)
            .map_err(|detail| malformed(name, DocumentFormat::Docx, format!("{part}: {detail}")))?;
        text.push_str(&part_text);
    }
    Ok(text)
}

fn is_part(name: &str, prefix: &str) -> bool {
    name.starts_with(prefix) && name.ends_with(".xml")
}

fn read_part(archive: &mut ZipArchive<Cursor<&[u8]>>, part: &str) -> Result<String, String> {
    let mut file = archive
        .by_name(part)
        .map_err(|e| format!("failed to open {part}: {e}"))?;
    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .map_err(|e| format!("failed to read {part}: {e}"))?;
    Ok(xml)
}

/// Text content of a WordprocessingML part.
fn wordprocessing_text(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_run_text = true;
                }
            }
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_run_text => {
                let unescaped = t
                    .unescape()
                    .map_err(|e| format!("bad text at {}: {e}", reader.buffer_position()))?;
                text.push_str(&unescaped);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("XML error at {}: {e}", reader.buffer_position())),
        }
    }
    Ok(text)
}
