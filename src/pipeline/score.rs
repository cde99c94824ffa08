//! Resume vs. job-description scoring.
//!
//! ```text
//!  resume text ──extract_keywords──▶ resume_kw ─┐
//!                                               ├─▶ per JD word: direct? synonym? missing
//!  JD text ─────extract_keywords──▶ jd_kw ──────┘
//!
//!  ats      = ⌊100 · |matched| / |jd_kw|⌋      (0 when jd_kw is empty)
//!  weighted = min(ats + 2 · |matched ∩ PRIORITY_TERMS|, 100)
//! ```

use crate::config::AnalyzerConfig;
use crate::error::AtsError;
use crate::lexicon::{self, LexicalDatabase};
use crate::pipeline::keywords::{extract_keywords, KeywordSet};
use crate::pipeline::synonyms::{CacheStats, SynonymResolver};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// High-value technical terms that earn a bonus in the weighted score.
pub const PRIORITY_TERMS: &[&str] = &[
    "python", "java", "sql", "aws", "react", "node", "mongodb", "docker",
];

/// Points added to the weighted score per matched priority term.
pub const PRIORITY_BONUS: u32 = 2;

/// Outcome of scoring one resume against one job description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Percentage of JD keywords found, truncated. `0..=100`.
    pub ats: u8,
    /// `ats` plus the priority bonus, capped at 100.
    pub weighted: u8,
    /// JD keywords found directly or through a synonym.
    pub matched: KeywordSet,
    /// JD keywords not found.
    pub missing: KeywordSet,
    /// The subset of `matched` found only through a synonym.
    pub synonym_matched: KeywordSet,
}

impl MatchResult {
    fn empty() -> Self {
        Self {
            ats: 0,
            weighted: 0,
            matched: KeywordSet::new(),
            missing: KeywordSet::new(),
            synonym_matched: KeywordSet::new(),
        }
    }
}

/// Whether `word` is one of [`PRIORITY_TERMS`].
pub fn is_priority_term(word: &str) -> bool {
    PRIORITY_TERMS.contains(&word)
}

/// Scores keyword sets, resolving synonyms through an owned, memoised
/// [`SynonymResolver`].
#[derive(Debug)]
pub struct ScoreEngine {
    synonyms: SynonymResolver,
}

impl ScoreEngine {
    /// Build an engine with the synonym source and cache capacity from `config`.
    ///
    /// # Errors
    /// [`AtsError::LexiconLoad`] when a configured WordNet directory cannot be read.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AtsError> {
        let database = lexicon::load(&config.synonyms)?;
        Ok(Self::with_database(database, config.synonym_cache_capacity))
    }

    /// Build an engine over an explicit database (or none).
    pub fn with_database(database: Option<Arc<dyn LexicalDatabase>>, cache_capacity: usize) -> Self {
        Self {
            synonyms: SynonymResolver::new(database, cache_capacity),
        }
    }

    /// Score raw resume text against raw job-description text.
    pub fn score(&self, resume_text: &str, jd_text: &str) -> MatchResult {
        let resume_kw = extract_keywords(resume_text);
        let jd_kw = extract_keywords(jd_text);
        self.score_keywords(&resume_kw, &jd_kw)
    }

    /// Score pre-extracted keyword sets.
    pub fn score_keywords(&self, resume_kw: &KeywordSet, jd_kw: &KeywordSet) -> MatchResult {
        if jd_kw.is_empty() {
            return MatchResult::empty();
        }

        let mut result = MatchResult::empty();
        for word in jd_kw {
            if resume_kw.contains(word) {
                result.matched.insert(word.clone());
            } else if self.synonym_hit(word, resume_kw) {
                result.matched.insert(word.clone());
                result.synonym_matched.insert(word.clone());
            } else {
                result.missing.insert(word.clone());
            }
        }

        // |matched| <= |jd_kw|, so the quotient fits in 0..=100.
        let ats = (100 * result.matched.len() / jd_kw.len()) as u32;
        let priority = result.matched.iter().filter(|w| is_priority_term(w)).count() as u32;
        let weighted = (ats + PRIORITY_BONUS * priority).min(100);

        result.ats = ats as u8;
        result.weighted = weighted as u8;
        debug!(
            "scored: {}/{} matched ({} via synonyms), ats={} weighted={}",
            result.matched.len(),
            jd_kw.len(),
            result.synonym_matched.len(),
            result.ats,
            result.weighted
        );
        result
    }

    /// Synonym cache counters.
    pub fn synonym_stats(&self) -> CacheStats {
        self.synonyms.stats()
    }

    /// The memoised resolver used for synonym matches.
    pub fn synonyms(&self) -> &SynonymResolver {
        &self.synonyms
    }

    fn synonym_hit(&self, word: &str, resume_kw: &KeywordSet) -> bool {
        if !self.synonyms.is_enabled() {
            return false;
        }
        self.synonyms
            .synonyms_of(word)
            .iter()
            .any(|syn| resume_kw.contains(syn))
    }
}
