//! Processing of recorded event data
//!
//! Path generation for smooth cursor playback and recording statistics.

pub mod interpolation;
pub mod stats;

pub use interpolation::{is_short_hop, linear_path, DEFAULT_MOVE_STEPS};
pub use stats::RecordingStats;
