//! WordNet's base-form reduction ("morphy").
//!
//! An inflected word is looked up in the exception list first; if it has an
//! entry, only the word and its listed base forms are candidates. Otherwise
//! each detachment rule for the part of speech is applied once. Candidates
//! the lexicon does not contain are dropped.

use super::PartOfSpeech;
use std::collections::HashMap;

const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

const VERB_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

const ADJ_RULES: &[(&str, &str)] = &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")];

fn rules(pos: PartOfSpeech) -> &'static [(&'static str, &'static str)] {
    match pos {
        PartOfSpeech::Noun => NOUN_RULES,
        PartOfSpeech::Verb => VERB_RULES,
        PartOfSpeech::Adjective => ADJ_RULES,
        PartOfSpeech::Adverb => &[],
    }
}

/// Candidate base forms of `word` for `pos` that satisfy `known`, in
/// discovery order without duplicates. `word` itself comes first when known.
pub fn base_forms(
    word: &str,
    pos: PartOfSpeech,
    exceptions: Option<&HashMap<String, Vec<String>>>,
    known: impl Fn(&str) -> bool,
) -> Vec<String> {
    let mut candidates = vec![word.to_string()];

    match exceptions.and_then(|exc| exc.get(word)) {
        Some(bases) => candidates.extend(bases.iter().cloned()),
        None => {
            for (suffix, ending) in rules(pos) {
                if let Some(stem) = word.strip_suffix(suffix) {
                    if !stem.is_empty() {
                        candidates.push(format!("{stem}{ending}"));
                    }
                }
            }
        }
    }

    let mut forms: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if known(&candidate) && !forms.contains(&candidate) {
            forms.push(candidate);
        }
    }
    forms
}
