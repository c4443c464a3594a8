//! Run-report types: per-input outcomes and aggregate statistics.
//!
//! Everything here is serde-serialisable so callers (and the CLI's `--json`
//! flag) can emit the full report in machine-readable form.

use serde::Serialize;
use std::path::PathBuf;

/// How one input was resolved into the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOutcome {
    /// The movie loaded and its first frame was drawn onto a page.
    Rendered,
    /// Loading failed; a blank page was emitted in its place.
    Blank,
    /// Loading failed; the input contributed no page.
    Skipped,
}

/// The record of one render attempt.
#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    /// Input path as supplied by the caller.
    pub input: PathBuf,
    /// What became of it.
    pub outcome: PageOutcome,
    /// 1-indexed page number in the output document; `None` for skipped
    /// inputs.
    pub page: Option<usize>,
    /// Page width in points. For blank pages this is the surface's current
    /// default size at the time of the failure.
    pub width_pt: Option<f32>,
    /// Page height in points.
    pub height_pt: Option<f32>,
    /// Human-readable error, present for `Blank` and `Skipped` outcomes.
    pub error: Option<String>,
}

/// Aggregate statistics for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderStats {
    /// Inputs yielded by the enumerator (explicit arguments plus stdin lines).
    pub attempted: usize,
    /// Inputs rendered successfully.
    pub rendered: usize,
    /// Inputs replaced by a blank page.
    pub blank: usize,
    /// Inputs dropped without a page.
    pub skipped: usize,
    /// Pages in the output document (`rendered + blank`).
    pub pages_written: usize,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
}

/// Full result of a conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct RenderOutput {
    /// Per-input records, in attempt order.
    pub pages: Vec<PageRecord>,
    /// Aggregate counts.
    pub stats: RenderStats,
}

impl RenderOutput {
    /// Serialise the report as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Metadata of a single SWF document, as reported by [`crate::inspect`].
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    /// Canonicalised path of the inspected file.
    pub path: PathBuf,
    /// Stage width in points (one point per logical pixel).
    pub width_pt: f32,
    /// Stage height in points.
    pub height_pt: f32,
    /// Number of frames on the main timeline.
    pub frame_count: usize,
    /// Frames per second.
    pub frame_rate: f32,
    /// SWF format version byte.
    pub swf_version: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serialises_to_json() {
        let output = RenderOutput {
            pages: vec![PageRecord {
                input: PathBuf::from("a.swf"),
                outcome: PageOutcome::Rendered,
                page: Some(1),
                width_pt: Some(550.0),
                height_pt: Some(400.0),
                error: None,
            }],
            stats: RenderStats {
                attempted: 1,
                rendered: 1,
                pages_written: 1,
                ..Default::default()
            },
        };

        let json = output.to_json_pretty().unwrap();
        assert!(json.contains("\"rendered\""), "got: {json}");
        assert!(json.contains("a.swf"), "got: {json}");
    }

    #[test]
    fn outcome_serialises_lowercase() {
        assert_eq!(
            serde_json::to_string(&PageOutcome::Skipped).unwrap(),
            "\"skipped\""
        );
    }
}
