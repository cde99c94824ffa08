//! Integration tests for PDF extraction and highlighting.
//!
//! These need the pdfium shared library. When it cannot be bound (see
//! `PDFIUM_LIB_PATH`) every test prints `SKIP` and returns.
//!
//! Run with:
//!   PDFIUM_LIB_PATH=/path/to/libpdfium cargo test --test highlight -- --nocapture

use pdfium_render::prelude::*;
use resume_ats::pdfium::bind_pdfium;
use resume_ats::pipeline::extract::extract_pdf;
use resume_ats::pipeline::highlight::{group_words, Region, Word};
use resume_ats::{Analyzer, AnalyzerConfig, Document, DocumentFormat, HighlightColor, PdfHighlighter};
use std::sync::Mutex;

// pdfium keeps process-global state; one bound instance at a time.
static PDFIUM_LOCK: Mutex<()> = Mutex::new(());

// ── Test helpers ─────────────────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

macro_rules! pdfium_or_skip {
    () => {{
        init_tracing();
        match bind_pdfium() {
            Ok(pdfium) => pdfium,
            Err(e) => {
                println!("SKIP — pdfium not available: {}", e.to_string().lines().next().unwrap_or(""));
                return;
            }
        }
    }};
}

/// A minimal PDF with one Helvetica text stream per page and a correct xref table.
fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let page_count = pages.len();
    // 1 catalog, 2 pages, 3 font, then (page, contents) pairs.
    let page_id = |i: usize| 4 + 2 * i;
    let contents_id = |i: usize| 5 + 2 * i;

    let mut objects: Vec<String> = Vec::new();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", page_id(i))).collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        page_count
    ));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());

    for (i, lines) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            contents_id(i)
        ));
        let mut stream = String::new();
        for (n, line) in lines.iter().enumerate() {
            let y = 700 - 40 * n as i32;
            stream.push_str(&format!("BT /F1 20 Tf 72 {y} Td ({line}) Tj ET\n"));
        }
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            stream.len(),
            stream
        ));
    }

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }
    let xref_at = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for off in &offsets {
        xref.push_str(&format!("{off:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}

fn resume_pdf() -> Vec<u8> {
    build_pdf(&[
        &["Senior PyThOn Developer", "Skills: python, sql"],
        &["Hobbies: chess"],
    ])
}

/// Word boxes of one page, grouped the way the highlighter groups them.
fn words_on_page(pdfium: &Pdfium, bytes: &[u8], index: u16) -> Vec<Word> {
    let document = pdfium.load_pdf_from_byte_slice(bytes, None).unwrap();
    let page = document.pages().get(index).unwrap();
    let text = page.text().unwrap();
    let glyphs: Vec<Option<(char, Region)>> = text
        .chars()
        .iter()
        .map(|ch| match ch.unicode_char() {
            Some(c) if !c.is_whitespace() => Some((c, Region::from(ch.loose_bounds().unwrap()))),
            _ => None,
        })
        .collect();
    group_words(glyphs)
}

/// Bounds of every highlight annotation on one page.
fn highlight_boxes(pdfium: &Pdfium, bytes: &[u8], index: u16) -> Vec<Region> {
    let document = pdfium.load_pdf_from_byte_slice(bytes, None).unwrap();
    let page = document.pages().get(index).unwrap();
    page.annotations()
        .iter()
        .filter(|a| a.annotation_type() == PdfPageAnnotationType::Highlight)
        .map(|a| Region::from(a.bounds().unwrap()))
        .collect()
}

// ── Extraction ───────────────────────────────────────────────────────────────

#[test]
fn test_extract_pdf_pages_in_order() {
    let _guard = PDFIUM_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let pdfium = pdfium_or_skip!();

    let text = extract_pdf(&pdfium, "cv.pdf", &resume_pdf(), None).unwrap();
    let first = text.find("PyThOn").expect("page 1 text");
    let second = text.find("chess").expect("page 2 text");
    assert!(first < second);
    assert!(text.ends_with('\n'));
}

#[test]
fn test_extract_garbage_is_malformed() {
    let _guard = PDFIUM_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let pdfium = pdfium_or_skip!();

    let err = extract_pdf(&pdfium, "cv.pdf", b"definitely not a pdf", None).unwrap_err();
    assert_eq!(err.kind(), "malformed_document");
}

// ── Highlighting ─────────────────────────────────────────────────────────────

#[test]
fn test_mixed_case_python_is_highlighted() {
    let _guard = PDFIUM_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let pdfium = pdfium_or_skip!();

    let original = resume_pdf();
    let input = original.clone();
    let report = PdfHighlighter::new(&pdfium)
        .highlight("cv.pdf", &input, ["python"])
        .unwrap();

    assert_eq!(input, original, "input buffer must not change");
    assert_ne!(report.bytes, original);
    assert_eq!(report.pages, 2);
    assert!(report.is_clean(), "errors: {:?}", report.errors().collect::<Vec<_>>());

    let page1 = &report.outcomes[0];
    assert_eq!((page1.page, page1.keyword.as_str()), (1, "python"));
    assert!(page1.exact_hits >= 1, "exact search should find the keyword");
    assert!(page1.word_hits >= 1, "word scan should find 'PyThOn'");
    assert_eq!(report.outcomes[1].hits(), 0, "page 2 has no python");

    let word = words_on_page(&pdfium, &original, 0)
        .into_iter()
        .find(|w| w.text == "PyThOn")
        .expect("PyThOn word box");
    let boxes = highlight_boxes(&pdfium, &report.bytes, 0);
    assert!(
        boxes.iter().any(|b| b.overlaps(&word.region)),
        "no highlight overlaps {:?}; got {:?}",
        word.region,
        boxes
    );
}

#[test]
fn test_annotation_count_is_bounded_by_hits() {
    let _guard = PDFIUM_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let pdfium = pdfium_or_skip!();

    let original = resume_pdf();
    let keywords = ["python", "sql", "senior", "chess", "absent"];
    let report = PdfHighlighter::new(&pdfium)
        .with_color(HighlightColor::new(0, 200, 255, 128))
        .highlight("cv.pdf", &original, keywords)
        .unwrap();

    assert_eq!(report.outcomes.len(), report.pages * keywords.len());
    for page in 0..report.pages {
        let on_page = highlight_boxes(&pdfium, &report.bytes, page as u16).len();
        let outcomes: Vec<_> = report.outcomes.iter().filter(|o| o.page == page + 1).collect();
        let written: usize = outcomes.iter().map(|o| o.annotations).sum();
        let bound: usize = outcomes.iter().map(|o| o.hits()).sum();
        assert_eq!(on_page, written, "page {}", page + 1);
        assert!(on_page <= bound, "page {}: {on_page} annotations > {bound} hits", page + 1);
    }
    let absent: usize = report
        .outcomes
        .iter()
        .filter(|o| o.keyword == "absent")
        .map(|o| o.annotations)
        .sum();
    assert_eq!(absent, 0);
}

#[test]
fn test_no_keywords_still_returns_a_valid_pdf() {
    let _guard = PDFIUM_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let pdfium = pdfium_or_skip!();

    let report = PdfHighlighter::new(&pdfium)
        .highlight("cv.pdf", &resume_pdf(), Vec::<String>::new())
        .unwrap();
    assert!(report.outcomes.is_empty());
    let reopened = pdfium.load_pdf_from_byte_slice(&report.bytes, None).unwrap();
    assert_eq!(reopened.pages().len(), 2);
}

#[test]
fn test_unreadable_pdf_fails_the_document_only() {
    let _guard = PDFIUM_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let pdfium = pdfium_or_skip!();

    let err = PdfHighlighter::new(&pdfium)
        .highlight("broken.pdf", b"%PDF-1.4 truncated", ["python"])
        .unwrap_err();
    assert_eq!(err.kind(), "highlight_failed");
}

// ── Analyzer ─────────────────────────────────────────────────────────────────

#[test]
fn test_analyze_pdf_end_to_end() {
    let _guard = PDFIUM_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let pdfium = pdfium_or_skip!();

    let analyzer = Analyzer::with_pdfium(AnalyzerConfig::default(), pdfium).unwrap();
    let document = Document::new("cv.pdf", DocumentFormat::Pdf, resume_pdf());
    let analysis = analyzer.analyze(&document, "Python SQL AWS").unwrap();

    assert_eq!(analysis.score.ats, 66);
    assert_eq!(analysis.score.weighted, 70);
    let report = analysis.highlight.expect("PDF with matches is highlighted");
    assert!(report.annotation_count() >= 2);
    let keywords: Vec<&str> = report.outcomes.iter().map(|o| o.keyword.as_str()).collect();
    assert!(keywords.contains(&"python") && keywords.contains(&"sql"));
    assert!(!keywords.contains(&"aws"), "only matched keywords are highlighted");
}
