//! Lexical synonym databases.
//!
//! A [`LexicalDatabase`] answers one question: which synonym groups
//! (synsets) does a word belong to? Two implementations exist:
//!
//! * [`builtin::builtin`] — a compact synset table compiled into the crate,
//!   tuned for resume and job-description vocabulary. No I/O.
//! * [`wordnet::WordNet`] — loads a WordNet 3.x `dict/` directory
//!   (`data.noun`, `data.verb`, `data.adj`, `data.adv` and the optional
//!   `*.exc` exception lists).
//!
//! Both share [`SynsetTable`], which stores the synsets, indexes them per
//! part of speech, and reduces inflected words to their base forms with
//! WordNet's morphological rules ([`morphy`]) before lookup.

pub mod builtin;
pub mod morphy;
pub mod wordnet;

use crate::config::SynonymSource;
use crate::error::AtsError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Word class of a synset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 4] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
    ];

    /// Map a WordNet `ss_type` character. Adjective satellites (`s`) are adjectives.
    pub fn from_wordnet_tag(tag: &str) -> Option<Self> {
        match tag {
            "n" => Some(PartOfSpeech::Noun),
            "v" => Some(PartOfSpeech::Verb),
            "a" | "s" => Some(PartOfSpeech::Adjective),
            "r" => Some(PartOfSpeech::Adverb),
            _ => None,
        }
    }

    /// Suffix of the WordNet file names for this class (`data.noun`, `noun.exc`).
    pub fn file_suffix(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adj",
            PartOfSpeech::Adverb => "adv",
        }
    }
}

/// One synonym group. Lemmas keep the database's spelling, including `_`
/// between the words of multi-word lemmas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synset {
    pub pos: PartOfSpeech,
    pub lemmas: Vec<String>,
}

/// Source of synsets for the synonym resolver.
pub trait LexicalDatabase: Send + Sync {
    /// Every synset the word (or one of its base forms) belongs to, across
    /// all parts of speech. Unknown words yield an empty list.
    fn synsets(&self, word: &str) -> Vec<Synset>;

    /// Human-readable label for logs.
    fn name(&self) -> &str;
}

/// Synsets indexed by lowercase lemma per part of speech, plus the
/// morphological exception lists used to find base forms.
#[derive(Debug, Default)]
pub struct SynsetTable {
    label: String,
    synsets: Vec<Synset>,
    index: HashMap<PartOfSpeech, HashMap<String, Vec<usize>>>,
    exceptions: HashMap<PartOfSpeech, HashMap<String, Vec<String>>>,
}

impl SynsetTable {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Add a synset and index each of its lemmas.
    pub fn insert(&mut self, synset: Synset) {
        let id = self.synsets.len();
        let by_lemma = self.index.entry(synset.pos).or_default();
        for lemma in &synset.lemmas {
            let ids = by_lemma.entry(lemma.to_lowercase()).or_default();
            if ids.last() != Some(&id) {
                ids.push(id);
            }
        }
        self.synsets.push(synset);
    }

    /// Register an irregular inflection, e.g. `(Verb, "ran", "run")`.
    pub fn insert_exception(&mut self, pos: PartOfSpeech, inflected: &str, base: &str) {
        self.exceptions
            .entry(pos)
            .or_default()
            .entry(inflected.to_lowercase())
            .or_default()
            .push(base.to_lowercase());
    }

    pub fn len(&self) -> usize {
        self.synsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synsets.is_empty()
    }

    fn contains(&self, pos: PartOfSpeech, lemma: &str) -> bool {
        self.index
            .get(&pos)
            .is_some_and(|by_lemma| by_lemma.contains_key(lemma))
    }
}

impl LexicalDatabase for SynsetTable {
    fn synsets(&self, word: &str) -> Vec<Synset> {
        let word = word.trim().to_lowercase().replace(' ', "_");
        if word.is_empty() {
            return Vec::new();
        }

        let mut seen = Vec::new();
        for pos in PartOfSpeech::ALL {
            let exceptions = self.exceptions.get(&pos);
            let forms = morphy::base_forms(&word, pos, exceptions, |form| self.contains(pos, form));
            for form in forms {
                if let Some(ids) = self.index.get(&pos).and_then(|m| m.get(&form)) {
                    for &id in ids {
                        if !seen.contains(&id) {
                            seen.push(id);
                        }
                    }
                }
            }
        }

        seen.into_iter().map(|id| self.synsets[id].clone()).collect()
    }

    fn name(&self) -> &str {
        &self.label
    }
}

/// Build the database selected by `source`. `Disabled` yields `None`.
pub fn load(source: &SynonymSource) -> Result<Option<Arc<dyn LexicalDatabase>>, AtsError> {
    match source {
        SynonymSource::Builtin => {
            let db: Arc<dyn LexicalDatabase> = builtin::builtin();
            Ok(Some(db))
        }
        SynonymSource::WordNet(dir) => {
            let db = wordnet::WordNet::load(dir)?;
            info!("Loaded WordNet from {}: {} synsets", dir.display(), db.len());
            Ok(Some(Arc::new(db)))
        }
        SynonymSource::Disabled => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SynsetTable {
        let mut t = SynsetTable::new("test");
        t.insert(Synset {
            pos: PartOfSpeech::Noun,
            lemmas: vec!["game".into(), "gaming".into()],
        });
        t.insert(Synset {
            pos: PartOfSpeech::Noun,
            lemmas: vec!["machine_learning".into(), "ML".into()],
        });
        t.insert(Synset {
            pos: PartOfSpeech::Verb,
            lemmas: vec!["run".into(), "operate".into()],
        });
        t.insert_exception(PartOfSpeech::Verb, "ran", "run");
        t
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let t = table();
        assert_eq!(t.synsets("GAME").len(), 1);
        assert_eq!(t.synsets("ml")[0].lemmas[0], "machine_learning");
    }

    #[test]
    fn inflected_forms_reach_base_synsets() {
        let t = table();
        assert_eq!(t.synsets("games").len(), 1, "regular noun plural");
        assert_eq!(t.synsets("operating")[0].lemmas, vec!["run", "operate"]);
        assert_eq!(t.synsets("runs")[0].lemmas, vec!["run", "operate"]);
        assert_eq!(t.synsets("ran")[0].lemmas, vec!["run", "operate"], "exception list");
    }

    #[test]
    fn unknown_and_empty_words_have_no_synsets() {
        let t = table();
        assert!(t.synsets("kubernetes").is_empty());
        assert!(t.synsets("").is_empty());
    }

    #[test]
    fn multiword_query_uses_underscores() {
        let t = table();
        assert_eq!(t.synsets("machine learning").len(), 1);
    }

    #[test]
    fn disabled_source_loads_nothing() {
        assert!(load(&SynonymSource::Disabled).unwrap().is_none());
        assert!(load(&SynonymSource::Builtin).unwrap().is_some());
    }

    #[test]
    fn pos_tags() {
        assert_eq!(PartOfSpeech::from_wordnet_tag("s"), Some(PartOfSpeech::Adjective));
        assert_eq!(PartOfSpeech::from_wordnet_tag("x"), None);
        assert_eq!(PartOfSpeech::Adverb.file_suffix(), "adv");
    }
}
