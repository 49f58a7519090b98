//! Download export of a generated animation.

use crate::media::VideoPayload;
use serde::{Deserialize, Serialize};

pub const EXPORT_FILE_PREFIX: &str = "v3-clasher-animation-";
pub const EXPORT_FILE_EXTENSION: &str = "mp4";

/// A named file ready to be handed to a save dialog or written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoExport {
    pub file_name: String,
    pub payload: VideoPayload,
}

impl VideoExport {
    pub fn new(timestamp_millis: i64, payload: VideoPayload) -> Self {
        Self {
            file_name: export_file_name(timestamp_millis),
            payload,
        }
    }
}

/// `v3-clasher-animation-{millis}.mp4`
pub fn export_file_name(timestamp_millis: i64) -> String {
    format!("{EXPORT_FILE_PREFIX}{timestamp_millis}.{EXPORT_FILE_EXTENSION}")
}

/// Hands out export timestamps that never repeat.
///
/// Two downloads inside the same millisecond get consecutive values.
#[derive(Debug, Default)]
pub struct ExportStamp {
    last: Option<i64>,
}

impl ExportStamp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `now_millis`, bumped past the previously issued value if needed.
    pub fn next(&mut self, now_millis: i64) -> i64 {
        let stamp = match self.last {
            Some(last) if now_millis <= last => last + 1,
            _ => now_millis,
        };
        self.last = Some(stamp);
        stamp
    }
}
