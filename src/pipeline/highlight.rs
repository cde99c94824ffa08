//! Keyword highlighting inside PDF documents.
//!
//! For every page and every keyword two independent passes locate regions:
//!
//! 1. **Exact search**: pdfium's text search over the page text layout
//!    (case-insensitive). Every returned segment is one region.
//! 2. **Word scan**: the page's characters are grouped into
//!    whitespace-delimited words; a word whose lowercase form equals the
//!    keyword's lowercase form is one region.
//!
//! The same word can be found by both passes and is then marked twice.
//!
//! Regions are collected for the whole page before any annotation is
//! written, because pdfium's text layer must not be held across page edits.
//! A failure on one (page, keyword) pair is recorded in its
//! [`KeywordOutcome`] and logged; every other pair is still processed.

use crate::config::HighlightColor;
use crate::error::{AtsError, HighlightError};
use crate::output::{HighlightReport, KeywordOutcome};
use crate::pipeline::extract::load_failure_detail;
use pdfium_render::prelude::*;
use tracing::{debug, warn};

/// An axis-aligned rectangle in PDF user space (points, origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl Region {
    pub fn union(self, other: Region) -> Region {
        Region {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }

    /// Whether the two rectangles share any area.
    pub fn overlaps(&self, other: &Region) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.bottom < other.top
            && other.bottom < self.top
    }

    fn to_rect(self) -> PdfRect {
        PdfRect::new_from_values(self.bottom, self.left, self.top, self.right)
    }
}

impl From<PdfRect> for Region {
    fn from(rect: PdfRect) -> Self {
        Region {
            left: rect.left().value,
            bottom: rect.bottom().value,
            right: rect.right().value,
            top: rect.top().value,
        }
    }
}

/// A whitespace-delimited token of page text with its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub region: Region,
}

/// Group glyphs into words. `None` entries and whitespace glyphs end the
/// current word.
pub fn group_words(glyphs: impl IntoIterator<Item = Option<(char, Region)>>) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Option<Word> = None;

    for glyph in glyphs {
        match glyph {
            Some((ch, region)) if !ch.is_whitespace() => match current.as_mut() {
                Some(word) => {
                    word.text.push(ch);
                    word.region = word.region.union(region);
                }
                None => {
                    current = Some(Word {
                        text: ch.to_string(),
                        region,
                    })
                }
            },
            _ => words.extend(current.take()),
        }
    }
    words.extend(current);
    words
}

/// Regions of the words equal to `keyword`, ignoring case.
pub fn matching_words<'w>(words: &'w [Word], keyword: &str) -> impl Iterator<Item = Region> + 'w {
    let keyword = keyword.to_lowercase();
    words
        .iter()
        .filter(move |w| w.text.to_lowercase() == keyword)
        .map(|w| w.region)
}

/// Adds highlight annotations for keywords to PDF documents.
pub struct PdfHighlighter<'p> {
    pdfium: &'p Pdfium,
    color: HighlightColor,
    password: Option<String>,
}

impl<'p> PdfHighlighter<'p> {
    pub fn new(pdfium: &'p Pdfium) -> Self {
        Self {
            pdfium,
            color: HighlightColor::default(),
            password: None,
        }
    }

    pub fn with_color(mut self, color: HighlightColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    /// Highlight every occurrence of every keyword and return new PDF bytes.
    ///
    /// `pdf_bytes` is only read. Empty keywords are ignored.
    ///
    /// # Errors
    /// [`AtsError::HighlightFailed`] when the document cannot be opened or
    /// saved. Lookup and annotation failures never surface here; they are in
    /// the report's outcomes.
    pub fn highlight<I, S>(&self, name: &str, pdf_bytes: &[u8], keywords: I) -> Result<HighlightReport, AtsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        let document = self
            .pdfium
            .load_pdf_from_byte_slice(pdf_bytes, self.password.as_deref())
            .map_err(|e| AtsError::HighlightFailed {
                name: name.to_string(),
                detail: load_failure_detail(&e, self.password.as_deref()),
            })?;

        let mut outcomes = Vec::new();
        let mut page_count = 0usize;
        for (index, mut page) in document.pages().iter().enumerate() {
            let page_no = index + 1;
            page_count += 1;

            let located = locate_on_page(&page, page_no, &keywords);
            outcomes.extend(annotate_regions(name, located, |region| {
                annotate(&mut page, region, self.color).map_err(|e| format!("{:?}", e))
            }));
        }

        let bytes = document.save_to_bytes().map_err(|e| AtsError::HighlightFailed {
            name: name.to_string(),
            detail: format!("save failed: {:?}", e),
        })?;

        let report = HighlightReport {
            bytes,
            pages: page_count,
            outcomes,
        };
        debug!(
            "Highlighted '{}': {} annotations over {} pages, {} errors",
            name,
            report.annotation_count(),
            report.pages,
            report.errors().count()
        );
        Ok(report)
    }
}

/// The two lookups the highlighter needs from a page's text layer.
///
/// Failures are reported as detail strings and never abort the page.
pub trait PageText {
    /// Regions of every exact, case-insensitive occurrence of `keyword`.
    fn search(&self, keyword: &str) -> Result<Vec<Region>, String>;

    /// Whitespace-delimited words with their bounding boxes.
    fn words(&self) -> Result<Vec<Word>, String>;
}

impl PageText for PdfPageText<'_> {
    fn search(&self, keyword: &str) -> Result<Vec<Region>, String> {
        let search = PdfPageText::search(self, keyword, &PdfSearchOptions::new())
            .map_err(|e| format!("{:?}", e))?;
        let mut regions = Vec::new();
        for segments in search.iter(PdfSearchDirection::SearchForward) {
            for segment in segments.iter() {
                regions.push(Region::from(segment.bounds()));
            }
        }
        Ok(regions)
    }

    fn words(&self) -> Result<Vec<Word>, String> {
        let mut glyphs = Vec::new();
        for ch in self.chars().iter() {
            match ch.unicode_char() {
                Some(c) if !c.is_whitespace() => {
                    let bounds = ch.loose_bounds().map_err(|e| format!("{:?}", e))?;
                    glyphs.push(Some((c, Region::from(bounds))));
                }
                _ => glyphs.push(None),
            }
        }
        Ok(group_words(glyphs))
    }
}

/// Run both passes for every keyword on one page.
fn locate_on_page(page: &PdfPage, page_no: usize, keywords: &[String]) -> Vec<(KeywordOutcome, Vec<Region>)> {
    match page.text() {
        Ok(text) => locate_keywords(&text, page_no, keywords),
        Err(e) => {
            let detail = format!("text layer unavailable: {:?}", e);
            warn!("Page {}: {}", page_no, detail);
            keywords
                .iter()
                .map(|keyword| {
                    let mut outcome = KeywordOutcome::new(page_no, keyword);
                    outcome.errors.push(HighlightError::Search {
                        page: page_no,
                        keyword: keyword.clone(),
                        detail: detail.clone(),
                    });
                    outcome.errors.push(HighlightError::WordScan {
                        page: page_no,
                        keyword: keyword.clone(),
                        detail: detail.clone(),
                    });
                    (outcome, Vec::new())
                })
                .collect()
        }
    }
}

/// Exact search then word scan for each keyword, one outcome per keyword.
pub fn locate_keywords(
    text: &impl PageText,
    page_no: usize,
    keywords: &[String],
) -> Vec<(KeywordOutcome, Vec<Region>)> {
    // Words are shared by every keyword on the page.
    let words = text.words();

    keywords
        .iter()
        .map(|keyword| {
            let mut outcome = KeywordOutcome::new(page_no, keyword);
            let mut regions = Vec::new();

            match text.search(keyword) {
                Ok(found) => {
                    outcome.exact_hits = found.len();
                    regions.extend(found);
                }
                Err(detail) => {
                    let err = HighlightError::Search {
                        page: page_no,
                        keyword: keyword.clone(),
                        detail,
                    };
                    warn!("{}", err);
                    outcome.errors.push(err);
                }
            }

            match &words {
                Ok(words) => {
                    let before = regions.len();
                    regions.extend(matching_words(words, keyword));
                    outcome.word_hits = regions.len() - before;
                }
                Err(detail) => {
                    let err = HighlightError::WordScan {
                        page: page_no,
                        keyword: keyword.clone(),
                        detail: detail.clone(),
                    };
                    warn!("{}", err);
                    outcome.errors.push(err);
                }
            }

            (outcome, regions)
        })
        .collect()
}

/// Write every located region through `annotate`, counting successes and
/// recording failures on the owning outcome.
pub fn annotate_regions(
    name: &str,
    located: Vec<(KeywordOutcome, Vec<Region>)>,
    mut annotate: impl FnMut(Region) -> Result<(), String>,
) -> Vec<KeywordOutcome> {
    located
        .into_iter()
        .map(|(mut outcome, regions)| {
            for region in regions {
                match annotate(region) {
                    Ok(()) => outcome.annotations += 1,
                    Err(detail) => {
                        let err = HighlightError::Annotate {
                            page: outcome.page,
                            keyword: outcome.keyword.clone(),
                            detail,
                        };
                        warn!("{}: {}", name, err);
                        outcome.errors.push(err);
                    }
                }
            }
            outcome
        })
        .collect()
}

fn annotate(page: &mut PdfPage, region: Region, color: HighlightColor) -> Result<(), PdfiumError> {
    let rect = region.to_rect();
    let color = PdfColor::new(color.red, color.green, color.blue, color.alpha);

    let mut annotation = page.annotations_mut().create_highlight_annotation()?;
    annotation.set_bounds(rect)?;
    annotation
        .attachment_points_mut()
        .create_attachment_point_at_end(PdfQuadPoints::from_rect(&rect))?;
    annotation.set_stroke_color(color)?;
    annotation.set_fill_color(color)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(left: f32, bottom: f32, right: f32, top: f32) -> Region {
        Region {
            left,
            bottom,
            right,
            top,
        }
    }

    fn glyphs(text: &str) -> Vec<Option<(char, Region)>> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                let x = i as f32 * 10.0;
                (!c.is_whitespace()).then(|| (c, r(x, 0.0, x + 10.0, 12.0)))
            })
            .collect()
    }

    #[test]
    fn words_are_split_on_whitespace_and_bounded() {
        let words = group_words(glyphs("Senior  PYTHON dev"));
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["Senior", "PYTHON", "dev"]);
        assert_eq!(words[1].region, r(80.0, 0.0, 140.0, 12.0));
    }

    #[test]
    fn missing_glyphs_end_a_word() {
        let mut g = glyphs("ab");
        g.insert(1, None);
        let words = group_words(g);
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn word_match_ignores_case_but_not_punctuation() {
        let words = group_words(glyphs("Python, python PyThOn pythonic"));
        let hits: Vec<Region> = matching_words(&words, "PYTHON").collect();
        assert_eq!(hits.len(), 2, "'Python,' and 'pythonic' are different tokens");
    }

    #[test]
    fn union_and_overlap() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        let b = r(5.0, 5.0, 20.0, 20.0);
        let c = r(30.0, 30.0, 40.0, 40.0);
        assert_eq!(a.union(b), r(0.0, 0.0, 20.0, 20.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(!a.overlaps(&r(10.0, 0.0, 20.0, 10.0)), "touching edges share no area");
    }

    /// A page whose search fails for one keyword.
    struct FlakyText {
        words: Vec<Word>,
        broken: &'static str,
    }

    impl PageText for FlakyText {
        fn search(&self, keyword: &str) -> Result<Vec<Region>, String> {
            if keyword == self.broken {
                return Err("search handle unavailable".into());
            }
            Ok(matching_words(&self.words, keyword).collect())
        }

        fn words(&self) -> Result<Vec<Word>, String> {
            Ok(self.words.clone())
        }
    }

    struct NoWords;

    impl PageText for NoWords {
        fn search(&self, _keyword: &str) -> Result<Vec<Region>, String> {
            Ok(vec![r(0.0, 0.0, 1.0, 1.0)])
        }

        fn words(&self) -> Result<Vec<Word>, String> {
            Err("glyph bounds unavailable".into())
        }
    }

    fn kws(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn failed_search_is_contained_to_its_keyword() {
        let text = FlakyText {
            words: group_words(glyphs("python sql python")),
            broken: "python",
        };
        let located = locate_keywords(&text, 3, &kws(&["python", "sql"]));
        let outcomes = annotate_regions("cv.pdf", located, |_| Ok(()));

        let python = &outcomes[0];
        assert_eq!(python.keyword, "python");
        assert!(matches!(
            python.errors.as_slice(),
            [HighlightError::Search { page: 3, .. }]
        ));
        assert_eq!(python.exact_hits, 0);
        assert_eq!(python.word_hits, 2, "word scan still runs");
        assert_eq!(python.annotations, 2);

        let sql = &outcomes[1];
        assert!(sql.errors.is_empty());
        assert_eq!((sql.exact_hits, sql.word_hits, sql.annotations), (1, 1, 2));
    }

    #[test]
    fn failed_word_scan_keeps_exact_hits() {
        let located = locate_keywords(&NoWords, 1, &kws(&["python", "sql"]));
        assert_eq!(located.len(), 2);
        for (outcome, regions) in &located {
            assert_eq!(outcome.exact_hits, 1);
            assert_eq!(regions.len(), 1);
            assert!(matches!(outcome.errors.as_slice(), [HighlightError::WordScan { .. }]));
        }
    }

    #[test]
    fn failed_annotation_is_recorded_and_others_written() {
        let text = FlakyText {
            words: group_words(glyphs("python sql")),
            broken: "",
        };
        let located = locate_keywords(&text, 1, &kws(&["python", "sql"]));
        let mut calls = 0;
        let outcomes = annotate_regions("cv.pdf", located, |_| {
            calls += 1;
            if calls == 1 {
                Err("annotation rejected".into())
            } else {
                Ok(())
            }
        });

        assert_eq!(calls, 4);
        assert_eq!(outcomes[0].annotations, 1);
        assert!(matches!(
            outcomes[0].errors.as_slice(),
            [HighlightError::Annotate { page: 1, .. }]
        ));
        assert_eq!(outcomes[1].annotations, 2);
        assert!(outcomes[1].errors.is_empty());
    }

    #[test]
    fn no_words_in_blank_text() {
        assert!(group_words(glyphs("   ")).is_empty());
        assert!(group_words(Vec::new()).is_empty());
    }
}
