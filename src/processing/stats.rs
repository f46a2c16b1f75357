//! Recording statistics

use crate::capture::{Event, MouseButton};
use serde::Serialize;
use std::collections::HashMap;

/// Summary of a recording.
///
/// Presses and releases are counted separately. `completed_clicks` only
/// counts presses followed by a release of the same button, so a recording
/// stopped with a button held is not over-reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingStats {
    pub total: usize,
    pub moves: usize,
    pub presses: usize,
    pub releases: usize,
    pub completed_clicks: usize,
    pub scrolls: usize,
    /// Seconds, time of the last event
    pub duration: f64,
}

impl RecordingStats {
    pub fn from_events(events: &[Event]) -> Self {
        let mut stats = RecordingStats {
            total: events.len(),
            duration: events.last().map(Event::time).unwrap_or(0.0),
            ..Default::default()
        };
        let mut held: HashMap<MouseButton, usize> = HashMap::new();

        for event in events {
            match *event {
                Event::Move { .. } => stats.moves += 1,
                Event::Scroll { .. } => stats.scrolls += 1,
                Event::Click {
                    button, pressed, ..
                } => {
                    if pressed {
                        stats.presses += 1;
                        *held.entry(button).or_default() += 1;
                    } else {
                        stats.releases += 1;
                        if let Some(count) = held.get_mut(&button).filter(|count| **count > 0) {
                            *count -= 1;
                            stats.completed_clicks += 1;
                        }
                    }
                }
            }
        }

        stats
    }
}

impl std::fmt::Display for RecordingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total events:  {}", self.total)?;
        writeln!(f, "Moves:         {}", self.moves)?;
        writeln!(
            f,
            "Clicks:        {} ({} presses, {} releases)",
            self.completed_clicks, self.presses, self.releases
        )?;
        writeln!(f, "Scrolls:       {}", self.scrolls)?;
        write!(f, "Duration:      {:.2}s", self.duration)
    }
}
