//! Text normalisation and keyword extraction.
//!
//! Two deterministic passes turn arbitrary text into a [`KeywordSet`]:
//!
//! 1. [`normalize`] lowercases and turns every character outside
//!    `[a-z0-9\s]` into a space. Punctuation and diacritics therefore become
//!    word boundaries: `"C++/Rust"` → `"c    rust"`.
//! 2. [`extract_keywords`] splits on `\w+`, drops [`STOPWORDS`] and
//!    deduplicates.
//!
//! Every member of the result matches `^[a-z0-9]+$`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// A deduplicated, ordered set of normalised keywords.
pub type KeywordSet = BTreeSet<String>;

/// Words too common to carry any signal.
pub const STOPWORDS: &[&str] = &[
    "and", "or", "the", "a", "an", "in", "on", "with", "for", "to", "of", "is", "are",
];

static RE_NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Lowercase `text` and replace every character outside `[a-z0-9\s]` with a space.
pub fn normalize(text: &str) -> String {
    RE_NON_ALNUM
        .replace_all(&text.to_lowercase(), " ")
        .into_owned()
}

/// Whether `word` is in the fixed stopword list.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Extract the deduplicated keyword set of `text`.
///
/// Empty or whitespace-only input yields an empty set.
pub fn extract_keywords(text: &str) -> KeywordSet {
    let normalized = normalize(text);
    RE_WORD
        .find_iter(&normalized)
        .map(|m| m.as_str())
        .filter(|w| !is_stopword(w))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> KeywordSet {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn normalize_lowercases_and_blanks_punctuation() {
        assert_eq!(normalize("Node.js, C++"), "node js  c  ");
        assert_eq!(normalize("ÉCOLE"), " cole");
        assert_eq!(normalize("snake_case"), "snake case");
        assert_eq!(normalize("tab\there"), "tab\there");
    }

    #[test]
    fn extract_drops_stopwords_and_dedups() {
        let kw = extract_keywords("The Python and the SQL of Python");
        assert_eq!(kw, set(&["python", "sql"]));
    }

    #[test]
    fn punctuation_splits_tokens() {
        let kw = extract_keywords("React/Redux; AWS-Lambda");
        assert_eq!(kw, set(&["aws", "lambda", "react", "redux"]));
    }

    #[test]
    fn empty_and_blank_input_yield_empty_set() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("   \n\t ").is_empty());
        assert!(extract_keywords("and or the").is_empty());
    }

    #[test]
    fn every_keyword_is_lowercase_alnum() {
        let kw = extract_keywords("Señor Développeur — 10+ yrs in Go/Rust & C#, ÜBER-team");
        assert!(!kw.is_empty());
        for w in &kw {
            assert!(
                !w.is_empty() && w.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
                "bad keyword {w:?}"
            );
        }
    }

    #[test]
    fn extraction_is_idempotent_over_normalize() {
        let samples = [
            "Senior Python/Django Engineer (AWS, Docker) — 5+ years",
            "Ünïcödé ẞtraße; mixed CASE and_snake",
            "",
            "a an the",
        ];
        for s in samples {
            assert_eq!(extract_keywords(&normalize(s)), extract_keywords(s), "input {s:?}");
        }
    }

    #[test]
    fn digits_survive() {
        assert_eq!(extract_keywords("Python3 and ES2015"), set(&["es2015", "python3"]));
    }
}
