//! Move sampling and the capture buffer
//!
//! Mouse hooks report moves at the device rate. Only moves at least
//! `threshold` seconds after the last retained move are kept; clicks and
//! scrolls are always kept.

use crate::capture::{Event, MouseInput};

/// Default minimum spacing between retained moves, in seconds
pub const DEFAULT_MOVE_THRESHOLD: f64 = 0.05;

/// Debounces move events by time
#[derive(Debug, Clone)]
pub struct MoveSampler {
    threshold: f64,
    last_move: Option<f64>,
}

impl MoveSampler {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last_move: None,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Change the threshold; applies to the next offered move only
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    /// Forget the last retained move
    pub fn reset(&mut self) {
        self.last_move = None;
    }

    /// Decide whether a move at `time` is retained, updating state if so
    pub fn admit(&mut self, time: f64) -> bool {
        let keep = match self.last_move {
            None => true,
            Some(last) => time - last >= self.threshold,
        };
        if keep {
            self.last_move = Some(time);
        }
        keep
    }
}

impl Default for MoveSampler {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_THRESHOLD)
    }
}

/// Ordered events of the recording in progress
#[derive(Debug, Default)]
pub struct CaptureBuffer {
    events: Vec<Event>,
    sampler: MoveSampler,
}

impl CaptureBuffer {
    pub fn new(threshold: f64) -> Self {
        Self {
            events: Vec::new(),
            sampler: MoveSampler::new(threshold),
        }
    }

    /// Clear events and sampling state for a new recording
    pub fn reset(&mut self) {
        self.events.clear();
        self.sampler.reset();
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.sampler.set_threshold(threshold);
    }

    pub fn threshold(&self) -> f64 {
        self.sampler.threshold()
    }

    /// Offer raw input observed at `time`; returns the appended event, if any.
    ///
    /// Callers must offer inputs in non-decreasing time order.
    pub fn accept(&mut self, input: MouseInput, time: f64) -> Option<Event> {
        if matches!(input, MouseInput::Move { .. }) && !self.sampler.admit(time) {
            return None;
        }
        let event = input.at(time);
        self.events.push(event);
        Some(event)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Hand over the captured events, leaving the buffer empty
    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
