//! Runtime settings
//!
//! Stored as JSON. Every key is optional; missing keys take their defaults.

use crate::error::{ReplayError, ReplayResult};
use crate::processing::DEFAULT_MOVE_STEPS;
use crate::recorder::DEFAULT_MOVE_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Minimum seconds between two recorded moves
    pub move_threshold: f64,
    /// Playback speed multiplier (2.0 plays twice as fast)
    pub playback_speed: f64,
    pub loop_mode: bool,
    /// Interpolate cursor motion instead of jumping
    pub smooth_move: bool,
    /// Steps per interpolated move
    pub move_steps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            move_threshold: DEFAULT_MOVE_THRESHOLD,
            playback_speed: 1.0,
            loop_mode: false,
            smooth_move: true,
            move_steps: DEFAULT_MOVE_STEPS,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults if it is missing.
    ///
    /// A file that exists but is malformed or out of range is an error.
    pub fn load_or_default(path: Option<&Path>) -> ReplayResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            tracing::info!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.validate()?;
        tracing::debug!("Loaded settings from {:?}: {:?}", path, settings);
        Ok(settings)
    }

    pub fn validate(&self) -> ReplayResult<()> {
        validate_move_threshold(self.move_threshold)?;
        validate_playback_speed(self.playback_speed)?;
        validate_move_steps(self.move_steps)
    }
}

pub fn validate_move_threshold(threshold: f64) -> ReplayResult<()> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(ReplayError::Configuration(format!(
            "move threshold must be a non-negative number of seconds, got {}",
            threshold
        )))
    }
}

pub fn validate_playback_speed(speed: f64) -> ReplayResult<()> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(ReplayError::Configuration(format!(
            "playback speed must be positive, got {}",
            speed
        )))
    }
}

pub fn validate_move_steps(steps: u32) -> ReplayResult<()> {
    if steps >= 1 {
        Ok(())
    } else {
        Err(ReplayError::Configuration(
            "move steps must be at least 1".to_string(),
        ))
    }
}
