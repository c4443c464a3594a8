//! Error types for the swf2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Swf2PdfError`] — **Fatal**: the run cannot proceed or produce an
//!   output document (no input source, unwritable output path, or a load
//!   failure escalated by [`crate::ErrorMode::Fail`]). Returned as
//!   `Err(Swf2PdfError)` from the top-level `convert*` functions.
//!
//! * [`PageError`] — **Non-fatal**: a single input could not be turned into
//!   a page (bad path, not a SWF, undecodable movie). Under the `Skip` and
//!   `Blank` policies the run continues and the error is recorded in the
//!   input's [`crate::output::PageRecord`].
//!
//! The separation lets callers decide their own tolerance: abort on the
//! first bad input, drop it, or keep a placeholder page and inspect the run
//! report afterwards.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// All fatal errors returned by the swf2pdf library.
///
/// Per-input failures use [`PageError`] and are stored in
/// [`crate::output::PageRecord`] rather than propagated here, unless the
/// configured error mode is `Fail`.
#[derive(Debug, Error)]
pub enum Swf2PdfError {
    /// Neither explicit input files nor a stdin line source were supplied.
    #[error("no input files given\nPass SWF files as arguments or enable reading paths from stdin.")]
    NoInputs,

    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An input failed while the error mode was `Fail`.
    #[error("failed to load '{path}': {detail}")]
    LoadFailed { path: PathBuf, detail: String },

    /// Could not create or write the output PDF file.
    #[error("failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single input file.
///
/// Stored alongside [`crate::output::PageRecord`] when an input fails; the
/// run continues under the `Skip` and `Blank` error modes.
#[derive(Debug, Clone, Error)]
pub enum PageError {
    /// The path could not be resolved to an absolute `file://` URL.
    #[error("invalid URL for '{path}': {detail}")]
    InvalidUrl { path: PathBuf, detail: String },

    /// The resolved URL exceeds the platform path-length limit.
    #[error("path too long to form a file:// URL ({len} bytes): '{path}'")]
    PathTooLong { path: PathBuf, len: usize },

    /// The file exists and was read, but does not carry a SWF signature.
    #[error("not a SWF file: '{path}' (signature {magic:?}, expected FWS/CWS/ZWS)")]
    NotASwf { path: PathBuf, magic: [u8; 3] },

    /// The file could not be read or the movie could not be decoded.
    #[error("failed to load '{path}': {detail}")]
    LoadFailed { path: PathBuf, detail: String },
}

impl PageError {
    /// The input path this error refers to.
    pub fn path(&self) -> &Path {
        match self {
            PageError::InvalidUrl { path, .. }
            | PageError::PathTooLong { path, .. }
            | PageError::NotASwf { path, .. }
            | PageError::LoadFailed { path, .. } => path,
        }
    }

    /// Short phase label used in log lines: URL-resolution failures read
    /// "invalid URL", everything after that reads "failed to load".
    pub fn reason(&self) -> &'static str {
        match self {
            PageError::InvalidUrl { .. } | PageError::PathTooLong { .. } => "invalid URL",
            PageError::NotASwf { .. } | PageError::LoadFailed { .. } => "failed to load",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_inputs_display_mentions_stdin() {
        let msg = Swf2PdfError::NoInputs.to_string();
        assert!(msg.contains("stdin"), "got: {msg}");
    }

    #[test]
    fn not_a_swf_display_lists_expected_signatures() {
        let e = PageError::NotASwf {
            path: PathBuf::from("x.gif"),
            magic: *b"GIF",
        };
        let msg = e.to_string();
        assert!(msg.contains("FWS"), "got: {msg}");
        assert!(msg.contains("x.gif"), "got: {msg}");
    }

    #[test]
    fn reason_maps_url_phase_and_load_phase() {
        let url = PageError::InvalidUrl {
            path: PathBuf::from("missing.swf"),
            detail: "No such file or directory".into(),
        };
        assert_eq!(url.reason(), "invalid URL");

        let load = PageError::LoadFailed {
            path: PathBuf::from("bad.swf"),
            detail: "truncated".into(),
        };
        assert_eq!(load.reason(), "failed to load");
    }

    #[test]
    fn page_error_path_accessor() {
        let e = PageError::PathTooLong {
            path: PathBuf::from("/very/long"),
            len: 9000,
        };
        assert_eq!(e.path(), Path::new("/very/long"));
    }
}
