//! Progress-callback trait for per-file rendering events.
//!
//! Inject an [`Arc<dyn RenderProgressCallback>`] via
//! [`crate::config::RenderConfigBuilder::progress_callback`] to receive
//! events as the renderer works through the input queue. The CLI uses this
//! seam for its terminal progress bar; the library itself only emits
//! `tracing` logs.
//!
//! All methods have default no-op implementations so callers only override
//! what they care about.

use crate::output::{PageOutcome, RenderStats};
use std::path::Path;
use std::sync::Arc;

/// Called by the renderer as it processes each input file.
pub trait RenderProgressCallback: Send + Sync {
    /// Called once before the first input is attempted.
    ///
    /// `total` is the number of inputs when it is known up front (explicit
    /// argument list only); `None` when paths are also read from stdin and
    /// the total is open-ended.
    fn on_run_start(&self, total: Option<usize>) {
        let _ = total;
    }

    /// Called just before an input is resolved and loaded.
    ///
    /// `index` is 0-based attempt order.
    fn on_file_start(&self, index: usize, path: &Path) {
        let _ = (index, path);
    }

    /// Called when an input's first frame was rendered onto a page.
    fn on_file_rendered(&self, index: usize, path: &Path, width_pt: f32, height_pt: f32) {
        let _ = (index, path, width_pt, height_pt);
    }

    /// Called when an input failed and the error policy resolved it to
    /// `Blank` or `Skipped`. Fail-mode errors abort the run instead.
    fn on_file_error(&self, index: usize, path: &Path, error: &str, outcome: PageOutcome) {
        let _ = (index, path, error, outcome);
    }

    /// Called once after the last input, before the document is saved.
    fn on_run_complete(&self, stats: &RenderStats) {
        let _ = stats;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RenderProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RenderConfig`].
pub type ProgressCallback = Arc<dyn RenderProgressCallback>;
