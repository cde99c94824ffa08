//! # resume-ats
//!
//! Score how well a resume matches a job description, the way an Applicant
//! Tracking System would, and mark the matching terms in the resume PDF.
//!
//! ## Why this crate?
//!
//! Keyword screening is crude but predictable: a job description becomes a
//! set of significant words, and a resume scores by how many of them it
//! contains. This crate makes that process explicit and reproducible:
//! deterministic normalisation, synonym-aware matching through a lexical
//! database, an integer score with a documented tie-break, and a highlighted
//! copy of the PDF showing exactly which words counted.
//!
//! ## Pipeline Overview
//!
//! ```text
//! resume (PDF / DOCX)
//!  │
//!  ├─ 1. Extract    page text via pdfium, or DOCX runs via zip + XML
//!  ├─ 2. Keywords   lowercase, strip punctuation, drop stopwords, dedupe
//!  ├─ 3. Match      direct, then synonyms (WordNet-style synsets, LRU memo)
//!  ├─ 4. Score      ats = ⌊100·matched/jd⌋, weighted = ats + 2·priority (≤100)
//!  └─ 5. Highlight  exact search + word scan → new PDF with annotations
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resume_ats::{Analyzer, AnalyzerConfig, Document};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let analyzer = Analyzer::new(AnalyzerConfig::default())?;
//!     let resume = Document::from_path("resume.pdf")?;
//!     let analysis = analyzer.analyze(&resume, "Senior Python developer, AWS and SQL")?;
//!     println!("ATS {}%, weighted {}%", analysis.score.ats, analysis.score.weighted);
//!     println!("missing: {:?}", analysis.score.missing);
//!     if let Some(report) = &analysis.highlight {
//!         resume_ats::write_highlighted_pdf(report, "resume.highlighted.pdf")?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Scoring alone needs neither pdfium nor a document:
//!
//! ```rust
//! use resume_ats::ScoreEngine;
//!
//! let engine = ScoreEngine::with_database(None, 0);
//! let result = engine.score("I know Python and SQL", "Python SQL AWS");
//! assert_eq!((result.ats, result.weighted), (66, 70));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ats-check` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! resume-ats = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDF support
//!
//! PDF extraction and highlighting use the pdfium shared library, located
//! through `PDFIUM_LIB_PATH`, the working directory, or the system library
//! path (see [`pdfium`]). DOCX documents and scoring work without it.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod document;
pub mod error;
pub mod lexicon;
pub mod output;
pub mod pdfium;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze_file, write_highlighted_pdf, Analyzer};
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder, HighlightColor, MalformedPolicy, SynonymSource};
pub use document::{Document, DocumentFormat};
pub use error::{AtsError, HighlightError};
pub use lexicon::{LexicalDatabase, PartOfSpeech, Synset, SynsetTable};
pub use output::{Analysis, DocumentFailure, HighlightReport, KeywordOutcome, RankedDocument, RankingReport};
pub use pipeline::extract::TextExtractor;
pub use pipeline::highlight::PdfHighlighter;
pub use pipeline::keywords::{extract_keywords, normalize, KeywordSet, STOPWORDS};
pub use pipeline::score::{MatchResult, ScoreEngine, PRIORITY_TERMS};
pub use pipeline::synonyms::{CacheStats, SynonymResolver};
pub use progress::{NoopProgressCallback, RankingProgress, RankingProgressCallback};
