//! Result types returned by the analyzer.
//!
//! All of them derive `Serialize` for `--json` output. Highlighted PDF bytes
//! are skipped during serialisation; callers write them to disk instead.

use crate::document::DocumentFormat;
use crate::error::{AtsError, HighlightError};
use crate::pipeline::score::MatchResult;
use serde::Serialize;

/// Outcome of locating and marking one keyword on one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordOutcome {
    /// 1-based page number.
    pub page: usize,
    pub keyword: String,
    /// Regions found by the exact-substring search.
    pub exact_hits: usize,
    /// Word tokens whose lowercase form equals the keyword.
    pub word_hits: usize,
    /// Annotations actually written for this pair.
    pub annotations: usize,
    /// Non-fatal failures for this pair. Empty on full success.
    pub errors: Vec<HighlightError>,
}

impl KeywordOutcome {
    pub(crate) fn new(page: usize, keyword: &str) -> Self {
        Self {
            page,
            keyword: keyword.to_string(),
            exact_hits: 0,
            word_hits: 0,
            annotations: 0,
            errors: Vec::new(),
        }
    }

    /// Regions located by both passes together.
    pub fn hits(&self) -> usize {
        self.exact_hits + self.word_hits
    }
}

/// A highlighted PDF and the per-(page, keyword) outcomes that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct HighlightReport {
    /// The re-serialised document. The input buffer is never modified.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub pages: usize,
    pub outcomes: Vec<KeywordOutcome>,
}

impl HighlightReport {
    /// Total annotations written across all pages.
    pub fn annotation_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.annotations).sum()
    }

    /// Every non-fatal error, in page then keyword order.
    pub fn errors(&self) -> impl Iterator<Item = &HighlightError> {
        self.outcomes.iter().flat_map(|o| o.errors.iter())
    }

    pub fn is_clean(&self) -> bool {
        self.errors().next().is_none()
    }
}

/// Result of analysing one document against one job description.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub name: String,
    pub format: DocumentFormat,
    /// Characters of extracted text.
    pub text_chars: usize,
    pub score: MatchResult,
    /// Present for PDF documents when highlighting is enabled and there is
    /// at least one matched keyword.
    pub highlight: Option<HighlightReport>,
    pub duration_ms: u64,
}

/// One successfully analysed document in a ranking.
#[derive(Debug, Clone, Serialize)]
pub struct RankedDocument {
    /// 1-based position, highest weighted score first.
    pub rank: usize,
    #[serde(flatten)]
    pub analysis: Analysis,
}

/// A document that could not be analysed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    pub name: String,
    /// Short label from [`AtsError::kind`].
    pub kind: String,
    pub message: String,
}

impl DocumentFailure {
    pub fn from_error(name: impl Into<String>, error: &AtsError) -> Self {
        Self {
            name: name.into(),
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// Several documents ranked against one job description.
#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    /// Number of keywords extracted from the job description.
    pub job_keywords: usize,
    pub entries: Vec<RankedDocument>,
    pub failures: Vec<DocumentFailure>,
}

impl RankingReport {
    pub fn best(&self) -> Option<&RankedDocument> {
        self.entries.first()
    }
}
