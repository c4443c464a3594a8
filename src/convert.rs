//! Top-level conversion entry points.
//!
//! [`convert`] drives the whole run: drain the input queue, render one page
//! per input (or apply the error policy), then serialise and write the PDF
//! exactly once. Inputs are processed strictly sequentially, in enumeration
//! order — there is no parallelism and no retry; a failing input is resolved
//! by the configured [`ErrorMode`] and never revisited.

use crate::config::{ErrorMode, RenderConfig};
use crate::error::{PageError, Swf2PdfError};
use crate::output::{DocumentInfo, PageOutcome, PageRecord, RenderOutput, RenderStats};
use crate::pipeline::draw::{blank_page, serialize_document};
use crate::pipeline::input::{FileUrl, InputQueue};
use crate::pipeline::player::Player;
use printpdf::PdfPage;
use std::io::BufRead;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Render every input in the queue into one PDF document.
///
/// # Returns
/// `Ok(RenderOutput)` when the document was written, even if some inputs
/// failed under the `Skip` or `Blank` policies (check
/// `output.stats.skipped` / `output.stats.blank`).
///
/// # Errors
/// Returns `Err(Swf2PdfError)` only for fatal conditions:
/// - the queue has no input source at all
/// - an input failed while the error mode is [`ErrorMode::Fail`]
///   (no output file is written in that case)
/// - the output file could not be written
pub fn convert<R: BufRead>(
    inputs: InputQueue<R>,
    config: &RenderConfig,
) -> Result<RenderOutput, Swf2PdfError> {
    let run_start = Instant::now();

    if !inputs.has_source() {
        return Err(Swf2PdfError::NoInputs);
    }

    info!("writing {}", config.output.display());
    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(inputs.known_len());
    }

    let mut pages: Vec<PdfPage> = Vec::new();
    let mut records: Vec<PageRecord> = Vec::new();
    // The surface's current default size: starts degenerate and tracks the
    // last successfully rendered page. Blank pages are emitted at this size.
    let mut current_size = (0.0f32, 0.0f32);

    for (index, path) in inputs.enumerate() {
        debug!("processing {}", path.display());
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_start(index, &path);
        }

        match render_page(&path) {
            Ok((page, width_pt, height_pt)) => {
                current_size = (width_pt, height_pt);
                pages.push(page);
                info!(
                    "{}: rendered {}x{} pt as page {}",
                    path.display(),
                    width_pt,
                    height_pt,
                    pages.len()
                );
                if let Some(ref cb) = config.progress_callback {
                    cb.on_file_rendered(index, &path, width_pt, height_pt);
                }
                records.push(PageRecord {
                    input: path,
                    outcome: PageOutcome::Rendered,
                    page: Some(pages.len()),
                    width_pt: Some(width_pt),
                    height_pt: Some(height_pt),
                    error: None,
                });
            }
            Err(err) => match config.error_mode {
                ErrorMode::Fail => {
                    error!("{}: {} ({}), aborting", path.display(), err.reason(), err);
                    return Err(Swf2PdfError::LoadFailed {
                        path,
                        detail: err.to_string(),
                    });
                }
                ErrorMode::Blank => {
                    warn!(
                        "{}: {} ({}), emitting a blank page",
                        path.display(),
                        err.reason(),
                        err
                    );
                    pages.push(blank_page(current_size.0, current_size.1));
                    if let Some(ref cb) = config.progress_callback {
                        cb.on_file_error(index, &path, &err.to_string(), PageOutcome::Blank);
                    }
                    records.push(PageRecord {
                        input: path,
                        outcome: PageOutcome::Blank,
                        page: Some(pages.len()),
                        width_pt: Some(current_size.0),
                        height_pt: Some(current_size.1),
                        error: Some(err.to_string()),
                    });
                }
                ErrorMode::Skip => {
                    warn!("{}: {} ({}), skipping", path.display(), err.reason(), err);
                    if let Some(ref cb) = config.progress_callback {
                        cb.on_file_error(index, &path, &err.to_string(), PageOutcome::Skipped);
                    }
                    records.push(PageRecord {
                        input: path,
                        outcome: PageOutcome::Skipped,
                        page: None,
                        width_pt: None,
                        height_pt: None,
                        error: Some(err.to_string()),
                    });
                }
            },
        }
    }

    let stats = RenderStats {
        attempted: records.len(),
        rendered: records
            .iter()
            .filter(|r| r.outcome == PageOutcome::Rendered)
            .count(),
        blank: records
            .iter()
            .filter(|r| r.outcome == PageOutcome::Blank)
            .count(),
        skipped: records
            .iter()
            .filter(|r| r.outcome == PageOutcome::Skipped)
            .count(),
        pages_written: pages.len(),
        duration_ms: run_start.elapsed().as_millis() as u64,
    };
    info!(
        "processed {} files: {} rendered, {} blank, {} skipped",
        stats.attempted, stats.rendered, stats.blank, stats.skipped
    );

    write_document(&config.output, pages)?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(&stats);
    }

    Ok(RenderOutput {
        pages: records,
        stats,
    })
}

/// Convenience wrapper over [`convert`] for an explicit file list.
pub fn convert_files<I, P>(files: I, config: &RenderConfig) -> Result<RenderOutput, Swf2PdfError>
where
    I: IntoIterator<Item = P>,
    P: Into<std::path::PathBuf>,
{
    convert(InputQueue::from_files(files), config)
}

/// Report a single movie's metadata without rendering anything.
pub fn inspect(path: impl AsRef<Path>) -> Result<DocumentInfo, Swf2PdfError> {
    let path = path.as_ref();
    let player = open_player(path).map_err(|e| Swf2PdfError::LoadFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let (width_pt, height_pt) = player.dimensions();
    Ok(DocumentInfo {
        path: player.path().to_path_buf(),
        width_pt,
        height_pt,
        frame_count: player.frame_count(),
        frame_rate: player.frame_rate(),
        swf_version: player.swf_version(),
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// One render attempt: URL, player, first frame. The player and its buffers
/// drop before the next input is touched.
fn render_page(path: &Path) -> Result<(PdfPage, f32, f32), PageError> {
    let player = open_player(path)?;
    let (width_pt, height_pt) = player.dimensions();
    let page = player.render_first_frame();
    Ok((page, width_pt, height_pt))
}

fn open_player(path: &Path) -> Result<Player, PageError> {
    let url = FileUrl::resolve(path)?;
    debug!("loading {}", url.as_str());
    Player::open(&url)
}

/// Serialise and write the document, atomically (temp file + rename) so a
/// failed write never leaves a half-written PDF at the target path.
fn write_document(output: &Path, pages: Vec<PdfPage>) -> Result<(), Swf2PdfError> {
    let bytes = serialize_document("swf2pdf", pages);

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| Swf2PdfError::OutputWriteFailed {
                path: output.to_path_buf(),
                source: e,
            })?;
        }
    }

    let tmp_path = output.with_extension("pdf.tmp");
    std::fs::write(&tmp_path, &bytes).map_err(|e| Swf2PdfError::OutputWriteFailed {
        path: output.to_path_buf(),
        source: e,
    })?;
    std::fs::rename(&tmp_path, output).map_err(|e| Swf2PdfError::OutputWriteFailed {
        path: output.to_path_buf(),
        source: e,
    })?;

    debug!("wrote {} bytes to {}", bytes.len(), output.display());
    Ok(())
}
