//! Pipeline stages for resume analysis.
//!
//! Each submodule implements exactly one step, and each is usable on its
//! own: the scorer needs no PDF library, and the highlighter needs no
//! scorer.
//!
//! ## Data Flow
//!
//! ```text
//!            ┌──────────┐   text   ┌──────────┐  keywords  ┌───────┐
//! Document ─▶│ extract  │────────▶│ keywords │──────────▶│ score │──▶ MatchResult
//!  (bytes)   └──────────┘          └──────────┘            └───┬───┘
//!      │                                                      │ synonyms_of
//!      │                                            ┌─────────┴─────────┐
//!      │                                            │ synonyms (LRU)    │
//!      │                                            │  └▶ LexicalDatabase│
//!      │                                            └───────────────────┘
//!      │           matched keywords
//!      └─────────────────────────────▶ highlight ──▶ HighlightReport (new PDF bytes)
//! ```
//!
//! 1. [`extract`]   — PDF (pdfium) or DOCX (zip + XML) to plain text
//! 2. [`keywords`]  — normalise, tokenise, drop stopwords, deduplicate
//! 3. [`synonyms`]  — memoised word → synonym set lookup
//! 4. [`score`]     — direct and synonym matching, ATS and weighted scores
//! 5. [`highlight`] — exact search plus word scan, one annotation per region

pub mod extract;
pub mod highlight;
pub mod keywords;
pub mod score;
pub mod synonyms;
