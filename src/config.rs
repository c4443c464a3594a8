//! Configuration types for SWF-to-PDF rendering.
//!
//! All rendering behaviour is controlled through [`RenderConfig`], built via
//! its [`RenderConfigBuilder`]. The config is constructed once, before any
//! input is touched, and passed by reference into the renderer — there is no
//! process-global state.

use crate::error::Swf2PdfError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default output path when none is configured.
pub const DEFAULT_OUTPUT: &str = "output.pdf";

/// What to do when an input file cannot be resolved or loaded.
///
/// Selected on the command line by the first letter of the mode string,
/// case-insensitively: `fail`, `Fail`, and `F` all select [`ErrorMode::Fail`].
/// Anything whose first letter is not `f`, `s`, or `b` is rejected as a
/// configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Abort the whole run on the first failing input. No output file is
    /// written.
    Fail,
    /// Drop the failing input; the output has one page fewer than the
    /// number of attempts.
    Skip,
    /// Emit a blank page for the failing input, at the surface's current
    /// default size. (default)
    #[default]
    Blank,
}

impl FromStr for ErrorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes().first().map(u8::to_ascii_lowercase) {
            Some(b'f') => Ok(ErrorMode::Fail),
            Some(b's') => Ok(ErrorMode::Skip),
            Some(b'b') => Ok(ErrorMode::Blank),
            _ => Err(format!(
                "unrecognized error mode '{s}' (expected fail, skip, or blank)"
            )),
        }
    }
}

impl fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorMode::Fail => "fail",
            ErrorMode::Skip => "skip",
            ErrorMode::Blank => "blank",
        })
    }
}

/// Configuration for one rendering run.
///
/// Built via [`RenderConfig::builder()`] or [`RenderConfig::default()`].
///
/// # Example
/// ```rust
/// use swf2pdf::{ErrorMode, RenderConfig};
///
/// let config = RenderConfig::builder()
///     .output("slides.pdf")
///     .error_mode(ErrorMode::Skip)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct RenderConfig {
    /// Path of the PDF document to produce. Default: `output.pdf`.
    pub output: PathBuf,

    /// Policy applied when an input cannot be loaded. Default: [`ErrorMode::Blank`].
    pub error_mode: ErrorMode,

    /// Optional per-file progress events, e.g. for a terminal progress bar.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            error_mode: ErrorMode::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig")
            .field("output", &self.output)
            .field("error_mode", &self.error_mode)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl RenderConfig {
    /// Create a new builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RenderConfig`].
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = path.into();
        self
    }

    pub fn error_mode(mut self, mode: ErrorMode) -> Self {
        self.config.error_mode = mode;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenderConfig, Swf2PdfError> {
        if self.config.output.as_os_str().is_empty() {
            return Err(Swf2PdfError::InvalidConfig(
                "output path must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_mode_first_letter_case_insensitive() {
        assert_eq!("fail".parse::<ErrorMode>().unwrap(), ErrorMode::Fail);
        assert_eq!("Fail".parse::<ErrorMode>().unwrap(), ErrorMode::Fail);
        assert_eq!("F".parse::<ErrorMode>().unwrap(), ErrorMode::Fail);
        assert_eq!("skip".parse::<ErrorMode>().unwrap(), ErrorMode::Skip);
        assert_eq!("s".parse::<ErrorMode>().unwrap(), ErrorMode::Skip);
        assert_eq!("blank".parse::<ErrorMode>().unwrap(), ErrorMode::Blank);
        assert_eq!("b".parse::<ErrorMode>().unwrap(), ErrorMode::Blank);
        assert_eq!("Banana".parse::<ErrorMode>().unwrap(), ErrorMode::Blank);
    }

    #[test]
    fn error_mode_rejects_unknown_letters() {
        assert!("quit".parse::<ErrorMode>().is_err());
        assert!("".parse::<ErrorMode>().is_err());
        assert!("0".parse::<ErrorMode>().is_err());
    }

    #[test]
    fn error_mode_default_is_blank() {
        assert_eq!(ErrorMode::default(), ErrorMode::Blank);
    }

    #[test]
    fn builder_defaults() {
        let config = RenderConfig::builder().build().unwrap();
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.error_mode, ErrorMode::Blank);
        assert!(config.progress_callback.is_none());
    }

    #[test]
    fn builder_rejects_empty_output() {
        let result = RenderConfig::builder().output("").build();
        assert!(matches!(result, Err(Swf2PdfError::InvalidConfig(_))));
    }

    #[test]
    fn error_mode_display_round_trips() {
        for mode in [ErrorMode::Fail, ErrorMode::Skip, ErrorMode::Blank] {
            assert_eq!(mode.to_string().parse::<ErrorMode>().unwrap(), mode);
        }
    }
}
