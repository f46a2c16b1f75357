//! Shared control block between the player and its worker
//!
//! Stop is a flag the worker polls at event boundaries and motion steps.
//! Pause and timed sleeps wait on a condition variable, so `stop` and
//! `resume` wake the worker immediately instead of waiting out a poll.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// How the cursor travels between recorded positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionProfile {
    pub smooth: bool,
    pub steps: u32,
}

/// Playback parameters, read by the worker before every event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackOptions {
    pub speed: f64,
    pub loop_mode: bool,
    pub motion: MotionProfile,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            loop_mode: false,
            motion: MotionProfile {
                smooth: true,
                steps: crate::processing::DEFAULT_MOVE_STEPS,
            },
        }
    }
}

#[derive(Debug)]
pub struct PlaybackControl {
    stop: AtomicBool,
    done: AtomicBool,
    paused: Mutex<bool>,
    wake: Condvar,
    options: Mutex<PlaybackOptions>,
}

impl PlaybackControl {
    pub fn new(options: PlaybackOptions) -> Self {
        Self {
            stop: AtomicBool::new(false),
            done: AtomicBool::new(false),
            paused: Mutex::new(false),
            wake: Condvar::new(),
            options: Mutex::new(options),
        }
    }

    /// Clear stop, pause and done before a new run
    pub fn reset(&self) {
        self.stop.store(false, Ordering::SeqCst);
        self.done.store(false, Ordering::SeqCst);
        *self.paused.lock() = false;
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        // Take the lock so a waiter between its check and its wait sees the flag
        let _paused = self.paused.lock();
        self.wake.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Set by the worker once it has finished its last event
    pub fn mark_done(&self) {
        self.done.store(true, Ordering::SeqCst);
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }

    pub fn set_paused(&self, paused: bool) {
        *self.paused.lock() = paused;
        self.wake.notify_all();
    }

    pub fn is_paused(&self) -> bool {
        *self.paused.lock()
    }

    /// Block while paused. Returns `false` if stop was requested.
    pub fn wait_while_paused(&self) -> bool {
        let mut paused = self.paused.lock();
        while *paused && !self.is_stopped() {
            self.wake.wait(&mut paused);
        }
        !self.is_stopped()
    }

    /// Sleep for `duration` unless stopped first. Returns `false` if stopped.
    pub fn sleep(&self, duration: Duration) -> bool {
        let mut paused = self.paused.lock();
        match Instant::now().checked_add(duration) {
            Some(deadline) => {
                while !self.is_stopped() {
                    if self.wake.wait_until(&mut paused, deadline).timed_out() {
                        break;
                    }
                }
            }
            None => {
                while !self.is_stopped() {
                    self.wake.wait(&mut paused);
                }
            }
        }
        !self.is_stopped()
    }

    pub fn options(&self) -> PlaybackOptions {
        *self.options.lock()
    }

    pub fn set_options(&self, options: PlaybackOptions) {
        *self.options.lock() = options;
    }
}

impl Default for PlaybackControl {
    fn default() -> Self {
        Self::new(PlaybackOptions::default())
    }
}
