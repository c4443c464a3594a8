//! # swf2pdf
//!
//! Render Flash (SWF) files as pages of a single PDF document, one page per
//! input file.
//!
//! ## Why this crate?
//!
//! Flash content survives in archives, old courseware, and embedded-device
//! UIs long after every player capable of opening it has been retired.
//! Printing each movie's first frame to a PDF page gives that material a
//! portable, inspectable afterlife: page dimensions match the movie's stage
//! (one logical pixel = one PDF point), and vector artwork stays vector.
//!
//! ## Pipeline Overview
//!
//! ```text
//! SWF files
//!  │
//!  ├─ 1. Enumerate  explicit arguments, then stdin lines (InputQueue)
//!  ├─ 2. Resolve    canonical path → file:// URL
//!  ├─ 3. Load       signature check + swf-parser decode (Player)
//!  ├─ 4. Render     first-frame display list → printpdf ops
//!  └─ 5. Output     one page per input, saved once at the end
//! ```
//!
//! Inputs that fail to resolve or load are handled by the configured
//! [`ErrorMode`]: abort the run, skip the input, or emit a blank page.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use swf2pdf::{convert_files, RenderConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RenderConfig::builder()
//!         .output("movies.pdf")
//!         .build()?;
//!     let output = convert_files(["intro.swf", "menu.swf"], &config)?;
//!     eprintln!("{} pages written", output.stats.pages_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `swf2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! swf2pdf = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ErrorMode, RenderConfig, RenderConfigBuilder};
pub use convert::{convert, convert_files, inspect};
pub use error::{PageError, Swf2PdfError};
pub use output::{DocumentInfo, PageOutcome, PageRecord, RenderOutput, RenderStats};
pub use pipeline::input::InputQueue;
pub use progress::{NoopProgressCallback, ProgressCallback, RenderProgressCallback};
