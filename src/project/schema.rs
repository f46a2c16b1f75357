//! On-disk recording format
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "created_at": "2025-01-01T12:00:00+01:00",
//!   "action_count": 2,
//!   "duration": 0.12,
//!   "actions": [
//!     {"type": "move", "x": 10, "y": 10, "time": 0.0},
//!     {"type": "click", "x": 10, "y": 10, "button": "left", "pressed": true, "time": 0.12}
//!   ]
//! }
//! ```

use crate::capture::Event;
use serde::{Deserialize, Serialize};

/// Version written into every saved recording
pub const FORMAT_VERSION: &str = "1.0";

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

/// A recording as stored on disk.
///
/// Every field is optional when reading; a document without `actions` is an
/// empty recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingDocument {
    #[serde(default = "default_version")]
    pub version: String,

    /// ISO-8601 creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default)]
    pub action_count: usize,

    /// Seconds, time of the last action
    #[serde(default)]
    pub duration: f64,

    #[serde(default)]
    pub actions: Vec<Event>,
}

impl RecordingDocument {
    /// Whether this reader understands the document's version
    pub fn is_supported_version(&self) -> bool {
        self.version == "1" || self.version.starts_with("1.")
    }
}
