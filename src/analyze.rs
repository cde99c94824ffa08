//! Analysis entry points: one document, or a ranked batch.
//!
//! An [`Analyzer`] owns everything that outlives a single document: the
//! pdfium binding, the score engine (with its synonym cache) and the
//! configuration. Each document then runs through
//!
//! ```text
//! extract ──▶ keywords ──▶ score ──▶ highlight (PDF only)
//! ```
//!
//! to completion before the next one starts. Failures are per document: a
//! batch always finishes, listing the documents it could not analyse.

use crate::config::AnalyzerConfig;
use crate::document::{Document, DocumentFormat};
use crate::error::AtsError;
use crate::output::{Analysis, DocumentFailure, HighlightReport, RankedDocument, RankingReport};
use crate::pdfium::bind_pdfium;
use crate::pipeline::extract::TextExtractor;
use crate::pipeline::highlight::PdfHighlighter;
use crate::pipeline::keywords::{extract_keywords, KeywordSet};
use crate::pipeline::score::ScoreEngine;
use pdfium_render::prelude::Pdfium;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Reusable analysis context.
pub struct Analyzer {
    config: AnalyzerConfig,
    engine: ScoreEngine,
    extractor: TextExtractor,
    pdfium: Result<Pdfium, String>,
}

impl Analyzer {
    /// Build an analyzer, loading the synonym database and binding pdfium.
    ///
    /// A missing pdfium library is not an error here: DOCX documents can
    /// still be analysed, and each PDF document fails with
    /// [`AtsError::PdfiumBindingFailed`].
    ///
    /// # Errors
    /// [`AtsError::LexiconLoad`] when a configured WordNet directory cannot be read.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AtsError> {
        let pdfium = match bind_pdfium() {
            Ok(pdfium) => Ok(pdfium),
            Err(e) => {
                warn!("pdfium unavailable; PDF documents will fail: {}", e);
                Err(binding_detail(e))
            }
        };
        Self::build(config, pdfium)
    }

    /// Build an analyzer around an already bound pdfium instance.
    pub fn with_pdfium(config: AnalyzerConfig, pdfium: Pdfium) -> Result<Self, AtsError> {
        Self::build(config, Ok(pdfium))
    }

    /// Build an analyzer that handles DOCX only.
    pub fn without_pdfium(config: AnalyzerConfig) -> Result<Self, AtsError> {
        Self::build(config, Err("pdfium disabled for this analyzer".to_string()))
    }

    fn build(config: AnalyzerConfig, pdfium: Result<Pdfium, String>) -> Result<Self, AtsError> {
        let engine = ScoreEngine::new(&config)?;
        let extractor = TextExtractor::from_config(&config);
        Ok(Self {
            config,
            engine,
            extractor,
            pdfium,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn engine(&self) -> &ScoreEngine {
        &self.engine
    }

    /// Whether PDF documents can be processed.
    pub fn has_pdfium(&self) -> bool {
        self.pdfium.is_ok()
    }

    fn pdfium(&self) -> Result<&Pdfium, AtsError> {
        self.pdfium
            .as_ref()
            .map_err(|detail| AtsError::PdfiumBindingFailed(detail.clone()))
    }

    /// Plain text of `document`.
    pub fn extract_text(&self, document: &Document) -> Result<String, AtsError> {
        let pdfium = match document.format {
            DocumentFormat::Pdf => Some(self.pdfium()?),
            DocumentFormat::Docx => None,
        };
        self.extractor.extract(pdfium, document)
    }

    /// Highlight `keywords` in a PDF document with the configured colour.
    pub fn highlight<I, S>(&self, document: &Document, keywords: I) -> Result<HighlightReport, AtsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if document.format != DocumentFormat::Pdf {
            return Err(AtsError::HighlightFailed {
                name: document.name.clone(),
                detail: format!("only PDF documents can be highlighted, not {}", document.format),
            });
        }
        PdfHighlighter::new(self.pdfium()?)
            .with_color(self.config.highlight_color)
            .with_password(self.config.password.clone())
            .highlight(&document.name, &document.bytes, keywords)
    }

    /// Analyse one document against a job description.
    pub fn analyze(&self, document: &Document, jd_text: &str) -> Result<Analysis, AtsError> {
        self.analyze_keywords(document, &extract_keywords(jd_text))
    }

    /// Analyse one document against pre-extracted job-description keywords.
    pub fn analyze_keywords(&self, document: &Document, jd_keywords: &KeywordSet) -> Result<Analysis, AtsError> {
        let start = Instant::now();
        info!("Analysing '{}' ({})", document.name, document.format);

        // ── Step 1: Extract ──────────────────────────────────────────────
        let text = self.extract_text(document)?;

        // ── Step 2: Score ────────────────────────────────────────────────
        let score = self
            .engine
            .score_keywords(&extract_keywords(&text), jd_keywords);

        // ── Step 3: Highlight ────────────────────────────────────────────
        let highlight = if self.config.highlight
            && document.format == DocumentFormat::Pdf
            && !score.matched.is_empty()
        {
            Some(self.highlight(document, &score.matched)?)
        } else {
            None
        };

        let analysis = Analysis {
            name: document.name.clone(),
            format: document.format,
            text_chars: text.chars().count(),
            score,
            highlight,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "'{}': ats={} weighted={} ({}ms)",
            analysis.name, analysis.score.ats, analysis.score.weighted, analysis.duration_ms
        );
        Ok(analysis)
    }

    /// Rank documents against one job description.
    ///
    /// Documents are processed in order. Entries are sorted by weighted score,
    /// highest first; equal scores keep input order. Failed documents are
    /// listed in [`RankingReport::failures`].
    pub fn rank(&self, documents: &[Document], jd_text: &str) -> RankingReport {
        self.rank_inner(documents.iter().map(Ok), jd_text)
    }

    /// Like [`Analyzer::rank`], reading each file first. Unreadable or
    /// unsupported files become failures.
    pub fn rank_files<P: AsRef<Path>>(&self, paths: &[P], jd_text: &str) -> RankingReport {
        let loaded: Vec<Result<Document, DocumentFailure>> = paths
            .iter()
            .map(|p| {
                let path = p.as_ref();
                Document::from_path(path).map_err(|e| DocumentFailure::from_error(display_name(path), &e))
            })
            .collect();
        self.rank_inner(loaded.iter().map(|r| r.as_ref().map_err(Clone::clone)), jd_text)
    }

    fn rank_inner<'d, I>(&self, inputs: I, jd_text: &str) -> RankingReport
    where
        I: ExactSizeIterator<Item = Result<&'d Document, DocumentFailure>>,
    {
        let jd_keywords = extract_keywords(jd_text);
        let total = inputs.len();
        let cb = self.config.progress_callback.as_ref();
        if let Some(cb) = cb {
            cb.on_batch_start(total);
        }

        let mut analyses = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for (i, input) in inputs.enumerate() {
            let index = i + 1;
            if let Some(cb) = cb {
                let name = match &input {
                    Ok(document) => document.name.as_str(),
                    Err(failure) => failure.name.as_str(),
                };
                cb.on_document_start(index, total, name);
            }
            let result = input.and_then(|document| {
                self.analyze_keywords(document, &jd_keywords)
                    .map_err(|e| DocumentFailure::from_error(document.name.clone(), &e))
            });

            match result {
                Ok(analysis) => {
                    if let Some(cb) = cb {
                        cb.on_document_complete(index, total, &analysis.name, analysis.score.weighted);
                    }
                    analyses.push(analysis);
                }
                Err(failure) => {
                    warn!("Skipping '{}': {}", failure.name, failure.message);
                    if let Some(cb) = cb {
                        cb.on_document_error(index, total, &failure.name, &failure.message);
                    }
                    failures.push(failure);
                }
            }
        }

        // Stable: equal weighted scores keep input order.
        analyses.sort_by(|a, b| b.score.weighted.cmp(&a.score.weighted));
        let entries: Vec<RankedDocument> = analyses
            .into_iter()
            .enumerate()
            .map(|(i, analysis)| RankedDocument { rank: i + 1, analysis })
            .collect();

        if let Some(cb) = cb {
            cb.on_batch_complete(total, entries.len());
        }
        debug!("synonym cache: {:?}", self.engine.synonym_stats());
        info!("Ranked {} documents, {} failed", entries.len(), failures.len());

        RankingReport {
            job_keywords: jd_keywords.len(),
            entries,
            failures,
        }
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .field("pdfium", &self.pdfium.as_ref().map(|_| "bound"))
            .finish()
    }
}

/// Analyse a single file with a one-off [`Analyzer`].
pub fn analyze_file(
    path: impl AsRef<Path>,
    jd_text: &str,
    config: AnalyzerConfig,
) -> Result<Analysis, AtsError> {
    let document = Document::from_path(path)?;
    let analyzer = match document.format {
        DocumentFormat::Pdf => Analyzer::new(config)?,
        DocumentFormat::Docx => Analyzer::without_pdfium(config)?,
    };
    analyzer.analyze(&document, jd_text)
}

/// Write highlighted PDF bytes to `path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub fn write_highlighted_pdf(report: &HighlightReport, path: impl AsRef<Path>) -> Result<(), AtsError> {
    let path = path.as_ref();
    let io_err = |source| AtsError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp_path = path.with_extension("pdf.tmp");
    std::fs::write(&tmp_path, &report.bytes).map_err(io_err)?;
    std::fs::rename(&tmp_path, path).map_err(io_err)?;
    Ok(())
}

fn binding_detail(error: AtsError) -> String {
    match error {
        AtsError::PdfiumBindingFailed(detail) => detail,
        other => other.to_string(),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
