//! CLI binary for resume-ats.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `AnalyzerConfig` and prints results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use resume_ats::{
    write_highlighted_pdf, Analysis, Analyzer, AnalyzerConfig, HighlightColor, MalformedPolicy,
    RankingProgress, RankingProgressCallback, RankingReport, SynonymSource,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

/// Colour a score right-aligned in `width` columns: green from 75, yellow
/// from 50, red below. Padding is applied before the escape codes.
fn score_colour(score: u8, width: usize) -> String {
    let s = format!("{:>width$}", format!("{score}%"));
    match score {
        75..=100 => green(&s),
        50..=74 => yellow(&s),
        _ => red(&s),
    }
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over the batch plus a log line per
/// resume.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} resumes  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Analysing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl RankingProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_document_start(&self, _index: usize, _total: usize, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn on_document_complete(&self, index: usize, total: usize, name: &str, weighted: u8) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            green("✓"),
            index,
            total,
            score_colour(weighted, 4),
            name
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, index: usize, total: usize, name: &str, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        let first_line = error.lines().next().unwrap_or(error);
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total,
            name,
            red(first_line)
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total: usize, success_count: usize) {
        self.bar.finish_and_clear();
        let failed = self.errors.load(Ordering::SeqCst);
        if failed == 0 {
            eprintln!("{} {} resumes analysed", green("✔"), bold(&success_count.to_string()));
        } else {
            eprintln!(
                "{} {}/{} resumes analysed  ({} failed)",
                if success_count == 0 { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Score one resume against a job description file
  ats-check resume.pdf --jd job.txt

  # Inline job description, write a highlighted copy of the PDF
  ats-check resume.pdf --jd-text "Senior Python developer, AWS, SQL" --highlight-dir out/

  # Rank several resumes (PDF and DOCX) against one job description
  ats-check alice.pdf bob.docx carol.pdf --jd job.txt

  # Use a full WordNet dictionary for synonyms
  ats-check resume.pdf --jd job.txt --wordnet /usr/share/wordnet/dict

  # Machine-readable output
  ats-check *.pdf --jd job.txt --json > ranking.json

SCORING:
  ats       = floor(100 × matched / job keywords)
  weighted  = min(ats + 2 × matched priority terms, 100)
  priority  = python java sql aws react node mongodb docker

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (or its directory); needed for PDF resumes
  RUST_LOG          Override the log filter (e.g. resume_ats=debug)
  ATS_*             Every option can also be set as ATS_<OPTION> (see --help)
"#;

/// Score resumes against a job description and highlight matching terms.
#[derive(Parser, Debug)]
#[command(
    name = "ats-check",
    version,
    about = "Score resumes against a job description like an applicant tracking system",
    long_about = "Extract keywords from a job description and one or more resumes (PDF or DOCX), \
match them directly and through synonyms, and report an ATS score, a weighted score and the \
missing keywords. PDF resumes can be written back with every matched keyword highlighted.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Resume files (.pdf or .docx).
    #[arg(required = true)]
    resumes: Vec<PathBuf>,

    /// Job description text file.
    #[arg(long, env = "ATS_JD", conflicts_with = "jd_text", required_unless_present = "jd_text")]
    jd: Option<PathBuf>,

    /// Job description given inline.
    #[arg(long, env = "ATS_JD_TEXT")]
    jd_text: Option<String>,

    /// Write highlighted PDFs (<name>.highlighted.pdf) into this directory.
    #[arg(long, env = "ATS_HIGHLIGHT_DIR")]
    highlight_dir: Option<PathBuf>,

    /// Highlight colour as #rrggbb or #rrggbbaa.
    #[arg(long, env = "ATS_HIGHLIGHT_COLOR", default_value = "#ffeb3b")]
    highlight_color: String,

    /// WordNet dict/ directory to use instead of the built-in synonym table.
    #[arg(long, env = "ATS_WORDNET", conflicts_with = "no_synonyms")]
    wordnet: Option<PathBuf>,

    /// Disable synonym matching; only exact keywords count.
    #[arg(long, env = "ATS_NO_SYNONYMS")]
    no_synonyms: bool,

    /// Synonym cache capacity (0 = unbounded).
    #[arg(long, env = "ATS_CACHE_CAPACITY", default_value_t = resume_ats::config::DEFAULT_SYNONYM_CACHE_CAPACITY)]
    cache_capacity: usize,

    /// Score unreadable documents as empty instead of failing them.
    #[arg(long, env = "ATS_TREAT_MALFORMED_AS_EMPTY")]
    treat_malformed_as_empty: bool,

    /// PDF user password for encrypted resumes.
    #[arg(long, env = "ATS_PASSWORD")]
    password: Option<String>,

    /// Output structured JSON instead of text.
    #[arg(long, env = "ATS_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "ATS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "ATS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and results.
    #[arg(short, long, env = "ATS_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let batch = cli.resumes.len() > 1;
    let show_progress = batch && !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress || cli.json {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Job description ──────────────────────────────────────────────────
    let jd_text = match (&cli.jd, &cli.jd_text) {
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job description from {}", path.display()))?,
        (None, Some(text)) => text.clone(),
        (None, None) => bail!("Provide a job description with --jd <FILE> or --jd-text <TEXT>"),
    };

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<RankingProgress> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn RankingProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;
    let analyzer = Analyzer::new(config).context("Failed to initialise analyzer")?;

    // ── Run ──────────────────────────────────────────────────────────────
    if !batch {
        let path = &cli.resumes[0];
        let document = resume_ats::Document::from_path(path)
            .with_context(|| format!("Cannot load {}", path.display()))?;
        let analysis = analyzer
            .analyze(&document, &jd_text)
            .with_context(|| format!("Analysis of {} failed", path.display()))?;

        let file_name = highlight_file_names(&[analysis.name.as_str()]).remove(0);
        let written = write_highlight(&cli, &analysis, &file_name)?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&analysis).context("Failed to serialise analysis")?
            );
        } else {
            print_analysis(&analysis);
            if let Some(path) = written {
                eprintln!("{} highlighted → {}", green("✔"), bold(&path.display().to_string()));
            }
        }
        return Ok(());
    }

    let report = analyzer.rank_files(&cli.resumes, &jd_text);
    let names: Vec<&str> = report.entries.iter().map(|e| e.analysis.name.as_str()).collect();
    let file_names = highlight_file_names(&names);
    let mut written = Vec::new();
    for (entry, file_name) in report.entries.iter().zip(&file_names) {
        if let Some(path) = write_highlight(&cli, &entry.analysis, file_name)? {
            written.push(path);
        }
    }

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise ranking")?
        );
    } else {
        print_ranking(&report);
        if !cli.quiet && !written.is_empty() {
            eprintln!(
                "{} {} highlighted PDFs → {}",
                green("✔"),
                written.len(),
                bold(&cli.highlight_dir.as_deref().unwrap_or(Path::new(".")).display().to_string())
            );
        }
    }

    if report.entries.is_empty() && !report.failures.is_empty() {
        bail!("No resume could be analysed");
    }
    Ok(())
}

/// Map CLI args to `AnalyzerConfig`.
fn build_config(cli: &Cli, progress: Option<RankingProgress>) -> Result<AnalyzerConfig> {
    let synonyms = if cli.no_synonyms {
        SynonymSource::Disabled
    } else if let Some(ref dir) = cli.wordnet {
        SynonymSource::WordNet(dir.clone())
    } else {
        SynonymSource::Builtin
    };

    let color = HighlightColor::from_hex(&cli.highlight_color).context("Invalid --highlight-color")?;

    let mut builder = AnalyzerConfig::builder()
        .synonyms(synonyms)
        .synonym_cache_capacity(cli.cache_capacity)
        .highlight(cli.highlight_dir.is_some())
        .highlight_color(color);

    if cli.treat_malformed_as_empty {
        builder = builder.malformed(MalformedPolicy::TreatAsEmpty);
    }
    if let Some(ref password) = cli.password {
        builder = builder.password(password.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Output file names for highlighted copies, `<stem>.highlighted.pdf`.
///
/// Resumes from different directories can share a file name; colliding
/// stems are prefixed with their 1-based position (the rank in batch mode).
fn highlight_file_names(names: &[&str]) -> Vec<String> {
    let stems: Vec<String> = names
        .iter()
        .map(|name| {
            Path::new(name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| name.to_string())
        })
        .collect();
    stems
        .iter()
        .enumerate()
        .map(|(i, stem)| {
            let collides = stems.iter().filter(|other| other.eq_ignore_ascii_case(stem)).count() > 1;
            if collides {
                format!("{:02}-{stem}.highlighted.pdf", i + 1)
            } else {
                format!("{stem}.highlighted.pdf")
            }
        })
        .collect()
}

/// Write the highlighted PDF of `analysis`, if any, into `--highlight-dir`.
fn write_highlight(cli: &Cli, analysis: &Analysis, file_name: &str) -> Result<Option<PathBuf>> {
    let (Some(dir), Some(report)) = (&cli.highlight_dir, &analysis.highlight) else {
        return Ok(None);
    };
    let path = dir.join(file_name);
    write_highlighted_pdf(report, &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(Some(path))
}

fn join_words<'a>(words: impl IntoIterator<Item = &'a String>) -> String {
    let joined: Vec<&str> = words.into_iter().map(String::as_str).collect();
    if joined.is_empty() {
        dim("—")
    } else {
        joined.join(", ")
    }
}

fn print_analysis(analysis: &Analysis) {
    let score = &analysis.score;
    println!("{}", bold(&analysis.name));
    println!("  ATS score:       {}", score_colour(score.ats, 4));
    println!("  Weighted score:  {}", score_colour(score.weighted, 4));
    println!("  Matched ({}):    {}", score.matched.len(), join_words(&score.matched));
    if !score.synonym_matched.is_empty() {
        println!("  via synonyms:    {}", join_words(&score.synonym_matched));
    }
    println!("  Missing ({}):    {}", score.missing.len(), join_words(&score.missing));
    if let Some(report) = &analysis.highlight {
        let errors = report.errors().count();
        println!(
            "  Highlights:      {} on {} pages{}",
            report.annotation_count(),
            report.pages,
            if errors > 0 {
                red(&format!("  ({errors} lookup errors)"))
            } else {
                String::new()
            }
        );
    }
}

fn print_ranking(report: &RankingReport) {
    println!(
        "{}",
        bold(&format!("{:>4}  {:>8}  {:>5}  {:>7}  Resume", "Rank", "Weighted", "ATS", "Missing"))
    );
    for entry in &report.entries {
        let score = &entry.analysis.score;
        println!(
            "{:>4}  {}  {}  {:>7}  {}",
            entry.rank,
            score_colour(score.weighted, 8),
            score_colour(score.ats, 5),
            score.missing.len(),
            entry.analysis.name
        );
    }
    for failure in &report.failures {
        let first_line = failure.message.lines().next().unwrap_or(&failure.message);
        println!("{:>4}  {:>8}  {:>5}  {:>7}  {}  {}", "—", "", "", "", failure.name, red(first_line));
    }
}
