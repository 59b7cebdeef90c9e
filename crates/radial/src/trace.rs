//! Recorded input frames, one JSON object per line.
//!
//! Blank lines and lines starting with `#` are skipped.

use dwell::hand::FrameInput;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub fn is_frame_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with('#')
}

pub fn parse_frames(text: &str) -> Result<Vec<FrameInput>, TraceError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| is_frame_line(line))
        .map(|(i, line)| {
            serde_json::from_str(line.trim())
                .map_err(|source| TraceError::Parse { line: i + 1, source })
        })
        .collect()
}

pub fn load(path: &Path) -> Result<Vec<FrameInput>, TraceError> {
    parse_frames(&fs_err::read_to_string(path)?)
}
