//! Recording persistence
//!
//! A [`Recording`] is an immutable event sequence plus metadata. Saving goes
//! through a temporary file that is renamed into place, so a failed save never
//! leaves a truncated document behind.

pub mod schema;

pub use schema::{RecordingDocument, FORMAT_VERSION};

use crate::capture::Event;
use crate::error::{ReplayError, ReplayResult};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// An ordered, immutable sequence of recorded events.
///
/// Cloning is cheap; the player worker holds a clone of the same sequence
/// while the session keeps its own.
#[derive(Debug, Clone)]
pub struct Recording {
    events: Arc<[Event]>,
    created_at: Option<String>,
}

impl Default for Recording {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Recording {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: Arc::from(events),
            created_at: None,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Shared handle to the events, for handing to a playback worker
    pub fn shared_events(&self) -> Arc<[Event]> {
        self.events.clone()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Time of the last event in seconds, or 0 for an empty recording
    pub fn duration(&self) -> f64 {
        self.events.last().map(Event::time).unwrap_or(0.0)
    }

    /// Creation timestamp, known once the recording was saved or loaded
    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    /// Build the on-disk document, stamped with the current local time
    pub fn to_document(&self) -> RecordingDocument {
        RecordingDocument {
            version: FORMAT_VERSION.to_string(),
            created_at: Some(chrono::Local::now().to_rfc3339()),
            action_count: self.len(),
            duration: self.duration(),
            actions: self.events.to_vec(),
        }
    }

    pub fn from_document(document: RecordingDocument) -> Self {
        Self {
            events: Arc::from(document.actions),
            created_at: document.created_at,
        }
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> ReplayResult<()> {
    let data = serde_json::to_vec_pretty(value)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(&data)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| ReplayError::Io(e.error))?;
    Ok(())
}

/// Save `recording` to `path`, returning the document that was written
pub fn save(recording: &Recording, path: &Path) -> ReplayResult<RecordingDocument> {
    let document = recording.to_document();
    write_json(path, &document)?;

    tracing::info!(
        "Saved recording to {:?} ({} actions, {:.2}s)",
        path,
        document.action_count,
        document.duration
    );
    Ok(document)
}

/// Load a recording from `path`
pub fn load(path: &Path) -> ReplayResult<Recording> {
    let content = std::fs::read_to_string(path)?;
    let document: RecordingDocument = serde_json::from_str(&content)?;

    if !document.is_supported_version() {
        tracing::warn!(
            "Recording {:?} has unknown version {}, loading anyway",
            path,
            document.version
        );
    }
    if document.action_count != document.actions.len() {
        tracing::warn!(
            "Recording {:?} declares {} actions but contains {}",
            path,
            document.action_count,
            document.actions.len()
        );
    }

    let recording = Recording::from_document(document);
    tracing::info!(
        "Loaded recording from {:?} ({} actions, {:.2}s, created {})",
        path,
        recording.len(),
        recording.duration(),
        recording.created_at().unwrap_or("unknown")
    );
    Ok(recording)
}
