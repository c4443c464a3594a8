//! CLI binary for swf2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `RenderConfig`, wires a terminal progress bar into the progress-callback
//! seam, and prints the run summary.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use swf2pdf::{
    convert, ErrorMode, InputQueue, PageOutcome, RenderConfig, RenderProgressCallback, RenderStats,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar across the input list, a ✓/✗ line per
/// file. Only used when the total is known up front (no --stdin).
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} files",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Rendering");
        Arc::new(Self { bar })
    }
}

impl RenderProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total: Option<usize>) {
        if let Some(total) = total {
            self.bar.set_length(total as u64);
        }
    }

    fn on_file_start(&self, _index: usize, path: &Path) {
        self.bar.set_message(path.display().to_string());
    }

    fn on_file_rendered(&self, _index: usize, path: &Path, width_pt: f32, height_pt: f32) {
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            path.display(),
            dim(&format!("{width_pt}x{height_pt} pt")),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, _index: usize, path: &Path, error: &str, outcome: PageOutcome) {
        let note = match outcome {
            PageOutcome::Blank => "blank page",
            PageOutcome::Skipped => "skipped",
            PageOutcome::Rendered => unreachable!(),
        };
        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            format!("{}\u{2026}", &error[..79])
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} {}  {}  {}",
            red("✗"),
            path.display(),
            red(&msg),
            dim(note),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, _stats: &RenderStats) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"ERROR MODES:
  fail    Stop at the first input that cannot be loaded; exit non-zero and
          write no output file.
  skip    Drop inputs that cannot be loaded; the PDF has fewer pages than
          there were inputs.
  blank   Emit an empty page for inputs that cannot be loaded. (default)

  Modes are matched on their first letter, case-insensitively, so
  `-e f`, `-e F`, and `-e Fail` all select fail.

EXAMPLES:
  # Render two movies into output.pdf
  swf2pdf intro.swf menu.swf

  # Choose the output path
  swf2pdf -o movies.pdf intro.swf

  # Drop unreadable inputs instead of leaving blank pages
  swf2pdf -e skip *.swf

  # Read the file list from a pipe, in addition to arguments
  find archive/ -name '*.swf' | swf2pdf --stdin -o archive.pdf

EXIT STATUS:
  0   All inputs processed (help/version output counts as success).
  !=0 Bad usage, no input source, or a load failure under -e fail.

Page dimensions always match each movie's stage size, one point per logical
pixel (72 dpi). Only the first frame of each movie is rendered."#;

/// Render Flash (SWF) files as pages of a single PDF document.
#[derive(Parser, Debug)]
#[command(
    name = "swf2pdf",
    version,
    about = "Render Flash (SWF) files as pages of a single PDF document",
    long_about = "Render Flash (SWF) files as pages of a single PDF document, one page per \
input file. Input paths are taken from the argument list and, with --stdin, from standard \
input (one path per line, until end of stream).",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// SWF files to render, one page each, in argument order.
    #[arg(value_name = "SWF_FILE")]
    files: Vec<PathBuf>,

    /// Write the PDF document to this path.
    #[arg(short, long, value_name = "FILE", default_value = "output.pdf")]
    output: PathBuf,

    /// Policy for inputs that cannot be loaded: fail, skip, or blank.
    #[arg(
        short,
        long,
        value_name = "MODE",
        value_parser = ErrorMode::from_str,
        default_value = "blank"
    )]
    error_mode: ErrorMode,

    /// Also read input paths from stdin, one per line, after the arguments.
    #[arg(short = 's', long = "stdin")]
    stdin: bool,

    /// Log each file as it is processed.
    #[arg(short, long)]
    verbose: bool,

    /// Print the run report as JSON to stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Only this crate's targets pass the filter, so any diagnostic chatter
    // from the decoding libraries stays out of the user's terminal.
    // RUST_LOG overrides for debugging.
    let filter = if cli.verbose {
        "swf2pdf=debug"
    } else {
        "swf2pdf=error"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stdout)
        .with_target(false)
        .init();

    // ── Validate the input sources ───────────────────────────────────────
    if cli.files.is_empty() && !cli.stdin {
        let mut cmd = Cli::command();
        cmd.error(
            clap::error::ErrorKind::MissingRequiredArgument,
            "no input files given; pass SWF files as arguments or use --stdin \
             (try --help for details)",
        )
        .exit();
    }

    // The bar needs a known total, so it only runs for pure argument-list
    // input; verbose logs and JSON output take precedence over it.
    let show_progress =
        !cli.stdin && !cli.verbose && !cli.json && io::stderr().is_terminal();

    let mut builder = RenderConfig::builder()
        .output(cli.output.clone())
        .error_mode(cli.error_mode);
    if show_progress {
        builder = builder.progress_callback(CliProgressCallback::new());
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run the conversion ───────────────────────────────────────────────
    let output = if cli.stdin {
        convert(InputQueue::new(cli.files, Some(io::stdin().lock())), &config)
    } else {
        convert(InputQueue::from_files(cli.files), &config)
    }
    .context("Conversion failed")?;

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        println!("{}", output.to_json_pretty().context("Failed to serialise report")?);
        return Ok(());
    }

    let stats = &output.stats;
    let failed = stats.blank + stats.skipped;
    eprintln!(
        "{} {}/{} files  {} pages  {}ms  →  {}",
        if failed == 0 { green("✔") } else { red("⚠") },
        bold(&stats.rendered.to_string()),
        stats.attempted,
        stats.pages_written,
        stats.duration_ms,
        bold(&cli.output.display().to_string()),
    );
    if failed > 0 {
        eprintln!(
            "   {} inputs failed ({} blank, {} skipped)",
            red(&failed.to_string()),
            stats.blank,
            stats.skipped,
        );
    }

    Ok(())
}
