//! Input enumeration and URL resolution.
//!
//! ## Why a queue instead of a Vec?
//!
//! Paths can arrive from two places: the explicit argument list and, when
//! enabled, newline-delimited lines on standard input. Stdin is unbounded
//! and consumable exactly once, so [`InputQueue`] is a lazy iterator that
//! drains the explicit list first and then the line source — the renderer
//! never needs to know which phase a path came from.

use crate::error::PageError;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Scheme prefix for resolved input URLs.
const FILE_SCHEME: &str = "file://";

/// Upper bound for a resolved URL, scheme included. Paths long enough to
/// exceed this cannot be opened portably and are reported as an explicit
/// error instead of being handed to the loader.
pub const MAX_URL_LEN: usize = 4096 + FILE_SCHEME.len();

/// A resolved `file://` URL together with the canonical path it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUrl {
    url: String,
    path: PathBuf,
}

impl FileUrl {
    /// Canonicalise `path` and wrap it in a `file://` URL.
    ///
    /// The path round-trips within the same process, so no percent-encoding
    /// is applied.
    pub fn resolve(path: &Path) -> Result<FileUrl, PageError> {
        let abs = std::fs::canonicalize(path).map_err(|e| PageError::InvalidUrl {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

        let url = format!("{}{}", FILE_SCHEME, abs.display());
        if url.len() > MAX_URL_LEN {
            return Err(PageError::PathTooLong {
                path: abs,
                len: url.len(),
            });
        }

        debug!("resolved {} -> {}", path.display(), url);
        Ok(FileUrl { url, path: abs })
    }

    /// The URL string, e.g. `file:///home/user/movie.swf`.
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// The canonical filesystem path behind the URL.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Lazy, finite sequence of input paths: explicit arguments first, then
/// lines read from `R` until end-of-stream.
///
/// Line terminators are stripped; empty lines are yielded as-is and will
/// fail URL resolution downstream. Read errors on the line source end the
/// iteration with a logged warning.
pub struct InputQueue<R: BufRead> {
    explicit: std::vec::IntoIter<PathBuf>,
    lines: Option<std::io::Lines<R>>,
}

impl InputQueue<std::io::Empty> {
    /// Queue over an explicit file list only.
    pub fn from_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        InputQueue {
            explicit: files
                .into_iter()
                .map(Into::into)
                .collect::<Vec<_>>()
                .into_iter(),
            lines: None,
        }
    }
}

impl<R: BufRead> InputQueue<R> {
    /// Queue over an explicit file list followed by a newline-delimited
    /// line source (stdin in the CLI).
    pub fn new(files: Vec<PathBuf>, line_source: Option<R>) -> Self {
        InputQueue {
            explicit: files.into_iter(),
            lines: line_source.map(BufRead::lines),
        }
    }

    /// Total number of inputs, when it is knowable up front.
    ///
    /// `Some(n)` for a pure argument-list queue, `None` once a line source
    /// is attached (the stream length is unknown until EOF).
    pub fn known_len(&self) -> Option<usize> {
        if self.lines.is_none() {
            Some(self.explicit.len())
        } else {
            None
        }
    }

    /// Whether any input source was configured at all.
    pub fn has_source(&self) -> bool {
        self.explicit.len() > 0 || self.lines.is_some()
    }
}

impl<R: BufRead> Iterator for InputQueue<R> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        if let Some(path) = self.explicit.next() {
            return Some(path);
        }
        match self.lines.as_mut()?.next()? {
            Ok(line) => Some(PathBuf::from(line)),
            Err(e) => {
                warn!("stopped reading input paths: {}", e);
                self.lines = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn explicit_paths_in_argument_order() {
        let queue = InputQueue::from_files(["a.swf", "b.swf", "c.swf"]);
        let paths: Vec<PathBuf> = queue.collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("a.swf"),
                PathBuf::from("b.swf"),
                PathBuf::from("c.swf")
            ]
        );
    }

    #[test]
    fn stdin_lines_follow_explicit_paths() {
        let source = Cursor::new(b"c.swf\nd.swf\n".to_vec());
        let queue = InputQueue::new(
            vec![PathBuf::from("a.swf"), PathBuf::from("b.swf")],
            Some(source),
        );
        let paths: Vec<PathBuf> = queue.collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("a.swf"),
                PathBuf::from("b.swf"),
                PathBuf::from("c.swf"),
                PathBuf::from("d.swf")
            ]
        );
    }

    #[test]
    fn empty_lines_are_yielded_as_paths() {
        let source = Cursor::new(b"\nx.swf\n".to_vec());
        let queue = InputQueue::new(Vec::new(), Some(source));
        let paths: Vec<PathBuf> = queue.collect();
        assert_eq!(paths, vec![PathBuf::from(""), PathBuf::from("x.swf")]);
    }

    #[test]
    fn missing_final_newline_still_yields_last_path() {
        let source = Cursor::new(b"only.swf".to_vec());
        let queue = InputQueue::new(Vec::new(), Some(source));
        assert_eq!(queue.collect::<Vec<_>>(), vec![PathBuf::from("only.swf")]);
    }

    #[test]
    fn known_len_only_without_line_source() {
        let queue = InputQueue::from_files(["a.swf", "b.swf"]);
        assert_eq!(queue.known_len(), Some(2));

        let queue = InputQueue::new(vec![PathBuf::from("a.swf")], Some(std::io::empty()));
        assert_eq!(queue.known_len(), None);
    }

    #[test]
    fn has_source_reflects_configuration() {
        assert!(!InputQueue::from_files(Vec::<PathBuf>::new()).has_source());
        assert!(InputQueue::from_files(["a.swf"]).has_source());
        assert!(InputQueue::new(Vec::new(), Some(std::io::empty())).has_source());
    }

    #[test]
    fn resolve_rejects_missing_file() {
        let err = FileUrl::resolve(Path::new("/definitely/not/a/real/file.swf")).unwrap_err();
        assert!(matches!(err, PageError::InvalidUrl { .. }));
        assert_eq!(err.reason(), "invalid URL");
    }

    #[test]
    fn resolve_produces_absolute_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("movie.swf");
        std::fs::write(&file, b"FWS").unwrap();

        let url = FileUrl::resolve(&file).unwrap();
        assert!(url.as_str().starts_with("file:///"), "got: {}", url.as_str());
        assert!(url.as_str().ends_with("movie.swf"));
        assert!(url.path().is_absolute());
    }
}
