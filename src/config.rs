//! Configuration types for resume analysis.
//!
//! Every knob lives in [`AnalyzerConfig`], built via its
//! [`AnalyzerConfigBuilder`]. The scoring rules themselves (stopwords,
//! priority terms, bonus) are fixed constants and deliberately not here.

use crate::error::AtsError;
use crate::progress::{RankingProgressCallback, RankingProgress};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default number of words kept in the synonym cache.
pub const DEFAULT_SYNONYM_CACHE_CAPACITY: usize = 500;

/// Configuration for an [`crate::Analyzer`].
///
/// # Example
/// ```rust
/// use resume_ats::{AnalyzerConfig, MalformedPolicy};
///
/// let config = AnalyzerConfig::builder()
///     .synonym_cache_capacity(1000)
///     .malformed(MalformedPolicy::TreatAsEmpty)
///     .build()
///     .unwrap();
/// assert_eq!(config.synonym_cache_capacity, 1000);
/// ```
#[derive(Clone)]
pub struct AnalyzerConfig {
    /// Where synonyms come from. Default: [`SynonymSource::Builtin`].
    pub synonyms: SynonymSource,

    /// Maximum number of words held in the synonym cache. Default: 500.
    ///
    /// Least-recently-used words are evicted once the cache is full.
    /// `0` disables eviction entirely.
    pub synonym_cache_capacity: usize,

    /// What to do when a document cannot be parsed. Default: [`MalformedPolicy::Fail`].
    pub malformed: MalformedPolicy,

    /// Produce highlighted PDF bytes for PDF inputs. Default: true.
    pub highlight: bool,

    /// Colour of the highlight annotations. Default: yellow (`#ffeb3b`).
    pub highlight_color: HighlightColor,

    /// PDF user password for encrypted resumes.
    pub password: Option<String>,

    /// Receives per-document events during [`crate::Analyzer::rank`].
    pub progress_callback: Option<RankingProgress>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            synonyms: SynonymSource::default(),
            synonym_cache_capacity: DEFAULT_SYNONYM_CACHE_CAPACITY,
            malformed: MalformedPolicy::default(),
            highlight: true,
            highlight_color: HighlightColor::default(),
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("synonyms", &self.synonyms)
            .field("synonym_cache_capacity", &self.synonym_cache_capacity)
            .field("malformed", &self.malformed)
            .field("highlight", &self.highlight)
            .field("highlight_color", &self.highlight_color)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn RankingProgressCallback>"),
            )
            .finish()
    }
}

impl AnalyzerConfig {
    /// Create a new builder for `AnalyzerConfig`.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalyzerConfig`].
#[derive(Debug)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    pub fn synonyms(mut self, source: SynonymSource) -> Self {
        self.config.synonyms = source;
        self
    }

    pub fn synonym_cache_capacity(mut self, capacity: usize) -> Self {
        self.config.synonym_cache_capacity = capacity;
        self
    }

    pub fn malformed(mut self, policy: MalformedPolicy) -> Self {
        self.config.malformed = policy;
        self
    }

    pub fn highlight(mut self, v: bool) -> Self {
        self.config.highlight = v;
        self
    }

    pub fn highlight_color(mut self, color: HighlightColor) -> Self {
        self.config.highlight_color = color;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn RankingProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalyzerConfig, AtsError> {
        let c = &self.config;
        if let SynonymSource::WordNet(ref dir) = c.synonyms {
            if dir.as_os_str().is_empty() {
                return Err(AtsError::InvalidConfig(
                    "WordNet directory must not be empty".into(),
                ));
            }
        }
        if c.highlight_color.alpha == 0 {
            return Err(AtsError::InvalidConfig(
                "Highlight colour must not be fully transparent".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Source of the lexical synonym database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynonymSource {
    /// The compact synset table compiled into the crate. (default)
    #[default]
    Builtin,
    /// A WordNet 3.x `dict/` directory containing `data.noun`, `data.verb`, …
    WordNet(PathBuf),
    /// No synonym matching: only direct keyword matches count.
    Disabled,
}

/// How a document whose bytes cannot be parsed is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MalformedPolicy {
    /// Surface [`AtsError::MalformedDocument`] for that document. (default)
    #[default]
    Fail,
    /// Log a warning and continue with empty text ("no keywords found").
    TreatAsEmpty,
}

/// RGBA colour of highlight annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl HighlightColor {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(s: &str) -> Result<Self, AtsError> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || AtsError::InvalidConfig(format!("Invalid colour '{s}': expected #rrggbb or #rrggbbaa"));
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl Default for HighlightColor {
    fn default() -> Self {
        Self::new(255, 235, 59, 255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = AnalyzerConfig::default();
        assert_eq!(c.synonyms, SynonymSource::Builtin);
        assert_eq!(c.synonym_cache_capacity, DEFAULT_SYNONYM_CACHE_CAPACITY);
        assert_eq!(c.malformed, MalformedPolicy::Fail);
        assert!(c.highlight);
        assert!(c.password.is_none());
    }

    #[test]
    fn builder_rejects_empty_wordnet_dir() {
        let err = AnalyzerConfig::builder()
            .synonyms(SynonymSource::WordNet(PathBuf::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, AtsError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_transparent_colour() {
        let err = AnalyzerConfig::builder()
            .highlight_color(HighlightColor::new(255, 0, 0, 0))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("transparent"));
    }

    #[test]
    fn debug_redacts_password() {
        let c = AnalyzerConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn colour_from_hex() {
        assert_eq!(
            HighlightColor::from_hex("#ff8000").unwrap(),
            HighlightColor::new(255, 128, 0, 255)
        );
        assert_eq!(
            HighlightColor::from_hex("00ff0080").unwrap(),
            HighlightColor::new(0, 255, 0, 128)
        );
        assert!(HighlightColor::from_hex("#fff").is_err());
        assert!(HighlightColor::from_hex("#gg0000").is_err());
    }
}
