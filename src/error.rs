//! Error types for the resume-ats library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`AtsError`] — **Fatal** for one document: the analysis of that document
//!   cannot proceed (unsupported extension, unreadable bytes, pdfium missing).
//!   Returned as `Err(AtsError)` from the `analyze*` and `extract*` functions.
//!   Batch ranking records these per document and carries on.
//!
//! * [`HighlightError`] — **Non-fatal**: locating or marking one keyword on
//!   one page failed, but every other (page, keyword) pair is fine. Stored
//!   inside [`crate::output::KeywordOutcome`] so callers can inspect partial
//!   success instead of losing the whole highlighted PDF to one bad lookup.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the resume-ats library.
#[derive(Debug, Error)]
pub enum AtsError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The declared extension is not one of the handled formats.
    #[error("Unsupported format '{extension}' for '{name}'\nOnly .pdf and .docx files can be analysed.")]
    UnsupportedFormat { name: String, extension: String },

    /// The extraction library could not parse the byte buffer.
    #[error("Document '{name}' is not a readable {format}: {detail}")]
    MalformedDocument {
        name: String,
        format: String,
        detail: String,
    },

    /// Reading an input file from disk failed.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Highlight errors ──────────────────────────────────────────────────
    /// The PDF could not be opened or re-serialised for highlighting.
    ///
    /// Per-keyword lookup failures never surface here; see [`HighlightError`].
    #[error("Highlighting failed for '{name}': {detail}")]
    HighlightFailed { name: String, detail: String },

    // ── Lexicon errors ────────────────────────────────────────────────────
    /// A WordNet dictionary directory could not be loaded.
    #[error("Failed to load lexical database from '{path}': {detail}")]
    LexiconLoad { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDF text extraction and highlighting need the pdfium shared library.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (or its directory).\n\
  • Or place libpdfium next to the working directory.\n\
  • Or install it on the system library search path.\n"
    )]
    PdfiumBindingFailed(String),
}

impl AtsError {
    /// Short machine-friendly label, used in ranking reports and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            AtsError::UnsupportedFormat { .. } => "unsupported_format",
            AtsError::MalformedDocument { .. } => "malformed_document",
            AtsError::Io { .. } => "io",
            AtsError::HighlightFailed { .. } => "highlight_failed",
            AtsError::LexiconLoad { .. } => "lexicon_load",
            AtsError::InvalidConfig(_) => "invalid_config",
            AtsError::PdfiumBindingFailed(_) => "pdfium_binding",
        }
    }
}

/// A non-fatal error for a single (page, keyword) pair.
///
/// Stored in [`crate::output::KeywordOutcome::errors`]. Highlighting of the
/// remaining keywords and pages continues regardless.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum HighlightError {
    /// The exact-substring search over the page text layout failed.
    #[error("Page {page}: search for '{keyword}' failed: {detail}")]
    Search {
        page: usize,
        keyword: String,
        detail: String,
    },

    /// The page's word tokens could not be read.
    #[error("Page {page}: word scan for '{keyword}' failed: {detail}")]
    WordScan {
        page: usize,
        keyword: String,
        detail: String,
    },

    /// Creating a highlight annotation failed.
    #[error("Page {page}: could not annotate '{keyword}': {detail}")]
    Annotate {
        page: usize,
        keyword: String,
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_display() {
        let e = AtsError::UnsupportedFormat {
            name: "resume.txt".into(),
            extension: "txt".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("'txt'"), "got: {msg}");
        assert!(msg.contains("resume.txt"));
    }

    #[test]
    fn malformed_document_display() {
        let e = AtsError::MalformedDocument {
            name: "cv.docx".into(),
            format: "docx".into(),
            detail: "invalid Zip archive".into(),
        };
        assert!(e.to_string().contains("not a readable docx"));
        assert_eq!(e.kind(), "malformed_document");
    }

    #[test]
    fn highlight_error_display_mentions_page_and_keyword() {
        let e = HighlightError::Search {
            page: 3,
            keyword: "python".into(),
            detail: "boom".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Page 3"));
        assert!(msg.contains("'python'"));
    }

    #[test]
    fn every_kind_is_distinct() {
        let errors = [
            AtsError::UnsupportedFormat {
                name: "a".into(),
                extension: "txt".into(),
            },
            AtsError::MalformedDocument {
                name: "a".into(),
                format: "pdf".into(),
                detail: "x".into(),
            },
            AtsError::Io {
                path: PathBuf::from("a"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "x"),
            },
            AtsError::HighlightFailed {
                name: "a".into(),
                detail: "x".into(),
            },
            AtsError::LexiconLoad {
                path: PathBuf::from("a"),
                detail: "x".into(),
            },
            AtsError::InvalidConfig("x".into()),
            AtsError::PdfiumBindingFailed("x".into()),
        ];
        let kinds: std::collections::BTreeSet<&str> = errors.iter().map(AtsError::kind).collect();
        assert_eq!(kinds.len(), errors.len());
        assert!(!kinds.contains("internal"));
    }

    #[test]
    fn binding_error_mentions_env_var() {
        let e = AtsError::PdfiumBindingFailed("not found".into());
        assert!(e.to_string().contains("PDFIUM_LIB_PATH"));
    }
}
