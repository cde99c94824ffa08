//! Loader for WordNet 3.x `dict/` directories.
//!
//! Only the synset membership is read: for each `data.<pos>` line the
//! `ss_type` and the word list. Pointers, frames and glosses are ignored.
//! `<pos>.exc` exception lists are loaded when present.

use super::{LexicalDatabase, PartOfSpeech, Synset, SynsetTable};
use crate::error::AtsError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A WordNet database held fully in memory.
#[derive(Debug)]
pub struct WordNet {
    table: SynsetTable,
}

impl WordNet {
    /// Load every `data.*` file found in `dir`.
    ///
    /// # Errors
    /// [`AtsError::LexiconLoad`] when `dir` contains no data file, or a data
    /// file cannot be read.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, AtsError> {
        let dir = dir.as_ref();
        let mut table = SynsetTable::new(format!("wordnet:{}", dir.display()));
        let mut data_files = 0usize;

        for pos in PartOfSpeech::ALL {
            let data_path = dir.join(format!("data.{}", pos.file_suffix()));
            if !data_path.is_file() {
                debug!("WordNet: no {}", data_path.display());
                continue;
            }
            data_files += 1;

            let raw = read_lossy(&data_path)?;
            let mut skipped = 0usize;
            for line in raw.lines() {
                match parse_data_line(line) {
                    Some(synset) => table.insert(synset),
                    None if is_header(line) || line.trim().is_empty() => {}
                    None => skipped += 1,
                }
            }
            if skipped > 0 {
                warn!("WordNet: skipped {skipped} unparsable lines in {}", data_path.display());
            }

            let exc_path = dir.join(format!("{}.exc", pos.file_suffix()));
            if exc_path.is_file() {
                for line in read_lossy(&exc_path)?.lines() {
                    let mut fields = line.split_whitespace();
                    if let Some(inflected) = fields.next() {
                        for base in fields {
                            table.insert_exception(pos, inflected, base);
                        }
                    }
                }
            }
        }

        if data_files == 0 {
            return Err(AtsError::LexiconLoad {
                path: dir.to_path_buf(),
                detail: "no data.noun, data.verb, data.adj or data.adv file found".into(),
            });
        }

        Ok(Self { table })
    }

    /// Number of synsets loaded.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl LexicalDatabase for WordNet {
    fn synsets(&self, word: &str) -> Vec<Synset> {
        self.table.synsets(word)
    }

    fn name(&self) -> &str {
        self.table.name()
    }
}

fn read_lossy(path: &Path) -> Result<String, AtsError> {
    let bytes = std::fs::read(path).map_err(|e| AtsError::LexiconLoad {
        path: PathBuf::from(path),
        detail: e.to_string(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// License preamble lines start with two spaces.
fn is_header(line: &str) -> bool {
    line.starts_with("  ")
}

/// Parse `offset lex_filenum ss_type w_cnt word lex_id [word lex_id...] ...`.
/// `w_cnt` is two hex digits.
fn parse_data_line(line: &str) -> Option<Synset> {
    if is_header(line) {
        return None;
    }
    let mut fields = line.split_whitespace();
    let _offset = fields.next()?;
    let _lex_filenum = fields.next()?;
    let pos = PartOfSpeech::from_wordnet_tag(fields.next()?)?;
    let count = usize::from_str_radix(fields.next()?, 16).ok()?;

    let mut lemmas = Vec::with_capacity(count);
    for _ in 0..count {
        let word = fields.next()?;
        let _lex_id = fields.next()?;
        // Adjective syntactic markers: "(a)", "(p)", "(ip)".
        let word = word.split('(').next().unwrap_or(word);
        if !word.is_empty() {
            lemmas.push(word.to_string());
        }
    }
    if lemmas.is_empty() {
        return None;
    }
    Some(Synset { pos, lemmas })
}
