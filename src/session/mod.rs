//! Recording session
//!
//! The [`Session`] owns the recorder, the player and the current recording,
//! and enforces that only one of them is active: the state is exactly one of
//! [`SessionState`], checked at every transition. Invalid requests are
//! rejected as no-ops with a warning, never as errors.

pub mod state;

pub use state::{Outcome, Rejection, SessionState};

use crate::capture::InputBackend;
use crate::config::{self, Settings};
use crate::error::ReplayResult;
use crate::notify::{Notification, Notifier};
use crate::player::{MotionProfile, PlaybackOptions, Player, PlayerState};
use crate::processing::RecordingStats;
use crate::project::{self, Recording};
use crate::recorder::Recorder;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Session {
    settings: Settings,
    state: SessionState,
    recording: Recording,
    recorder: Recorder,
    player: Player,
    notifier: Notifier,
    current_file: Option<PathBuf>,
}

fn playback_options(settings: &Settings) -> PlaybackOptions {
    PlaybackOptions {
        speed: settings.playback_speed,
        loop_mode: settings.loop_mode,
        motion: MotionProfile {
            smooth: settings.smooth_move,
            steps: settings.move_steps,
        },
    }
}

impl Session {
    pub fn new(backend: Arc<dyn InputBackend>, settings: Settings, notifier: Notifier) -> Self {
        let recorder = Recorder::new(backend.clone(), settings.move_threshold, notifier.clone());
        let player = Player::new(backend, playback_options(&settings), notifier.clone());
        Self {
            settings,
            state: SessionState::Idle,
            recording: Recording::default(),
            recorder,
            player,
            notifier,
            current_file: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    /// File the current recording was last saved to or loaded from
    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    /// Events in the recording in progress, or in the current recording
    pub fn event_count(&self) -> usize {
        if self.state == SessionState::Recording {
            self.recorder.len()
        } else {
            self.recording.len()
        }
    }

    pub fn stats(&self) -> RecordingStats {
        RecordingStats::from_events(self.recording.events())
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            tracing::debug!("Session state {} -> {}", self.state, state);
            self.state = state;
            self.notifier.send(Notification::StateChanged(state));
        }
    }

    fn reject(&self, rejection: Rejection) -> Outcome {
        tracing::debug!("Request ignored: {}", rejection);
        self.notifier.warn(rejection.to_string());
        Outcome::Rejected(rejection)
    }

    /// Fold a worker that finished on its own back into `Idle`
    fn sync_playback(&mut self) {
        if self.state.is_playback() && self.player.state() == PlayerState::Stopped {
            self.player.reap();
            self.set_state(SessionState::Idle);
        }
    }


    /// Clear the sequence and start capturing mouse input.
    ///
    /// Returns an error only if the input listener fails to attach.
    pub fn start_recording(&mut self) -> ReplayResult<Outcome> {
        self.sync_playback();
        match self.state {
            SessionState::Recording => return Ok(self.reject(Rejection::AlreadyRecording)),
            SessionState::Playing | SessionState::Paused => {
                return Ok(self.reject(Rejection::PlaybackActive))
            }
            SessionState::Idle => {}
        }

        match self.recorder.start() {
            Ok(true) => {
                self.set_state(SessionState::Recording);
                self.notifier.send(Notification::EventCount(0));
                self.notifier.log("Recording started");
                Ok(Outcome::Applied)
            }
            Ok(false) => Ok(self.reject(Rejection::AlreadyRecording)),
            Err(e) => {
                self.notifier.warn(format!("Could not start recording: {}", e));
                Err(e)
            }
        }
    }

    /// Stop capturing; the captured events become the current recording
    pub fn stop_recording(&mut self) -> Outcome {
        if self.state != SessionState::Recording {
            return self.reject(Rejection::NotRecording);
        }

        let events = self.recorder.stop().unwrap_or_default();
        self.recording = Recording::new(events);
        self.current_file = None;
        self.set_state(SessionState::Idle);

        let count = self.recording.len();
        self.notifier.send(Notification::EventCount(count));
        self.notifier.log(format!("Recording stopped, {} events captured", count));
        Outcome::Applied
    }

    pub fn toggle_recording(&mut self) -> ReplayResult<Outcome> {
        if self.state == SessionState::Recording {
            Ok(self.stop_recording())
        } else {
            self.start_recording()
        }
    }


    /// Play the current recording, or resume if paused
    pub fn play(&mut self) -> ReplayResult<Outcome> {
        self.sync_playback();
        match self.state {
            SessionState::Recording => return Ok(self.reject(Rejection::RecordingActive)),
            SessionState::Playing => return Ok(self.reject(Rejection::AlreadyPlaying)),
            SessionState::Paused => return Ok(self.resume()),
            SessionState::Idle => {}
        }
        if self.recording.is_empty() {
            return Ok(self.reject(Rejection::EmptyRecording));
        }

        self.player.set_options(playback_options(&self.settings));
        match self.player.play(self.recording.shared_events())? {
            Outcome::Applied => {
                self.set_state(SessionState::Playing);
                self.notifier.log(format!(
                    "Playing {} events at {}x",
                    self.recording.len(),
                    self.settings.playback_speed
                ));
                Ok(Outcome::Applied)
            }
            Outcome::Rejected(rejection) => Ok(self.reject(rejection)),
        }
    }

    pub fn pause(&mut self) -> Outcome {
        self.sync_playback();
        match self.state {
            SessionState::Playing => {
                let outcome = self.player.pause();
                if outcome.is_applied() {
                    self.set_state(SessionState::Paused);
                    self.notifier.log("Playback paused");
                }
                outcome
            }
            SessionState::Paused => self.reject(Rejection::AlreadyPaused),
            SessionState::Idle | SessionState::Recording => self.reject(Rejection::NotPlaying),
        }
    }

    pub fn resume(&mut self) -> Outcome {
        self.sync_playback();
        match self.state {
            SessionState::Paused => {
                let outcome = self.player.resume();
                if outcome.is_applied() {
                    self.set_state(SessionState::Playing);
                    self.notifier.log("Playback resumed");
                }
                outcome
            }
            SessionState::Playing => self.reject(Rejection::NotPaused),
            SessionState::Idle | SessionState::Recording => self.reject(Rejection::NotPlaying),
        }
    }

    pub fn toggle_pause(&mut self) -> Outcome {
        if self.state == SessionState::Paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Stop playback and wait for the worker to exit
    pub fn stop_playback(&mut self) -> Outcome {
        self.sync_playback();
        if !self.state.is_playback() {
            return self.reject(Rejection::NotPlaying);
        }

        let _ = self.player.stop();
        self.set_state(SessionState::Idle);
        self.notifier.log("Playback stopped");
        Outcome::Applied
    }

    /// Start playback when idle, stop it when playing or paused
    pub fn toggle_playback(&mut self) -> ReplayResult<Outcome> {
        self.sync_playback();
        if self.state.is_playback() {
            Ok(self.stop_playback())
        } else {
            self.play()
        }
    }

    /// Handle the worker's completion signal
    pub fn on_playback_finished(&mut self) {
        if self.state.is_playback() && self.player.state() == PlayerState::Stopped {
            if let Some(completion) = self.player.reap() {
                tracing::debug!("Playback worker exited: {:?}", completion);
            }
            self.set_state(SessionState::Idle);
            self.notifier.log("Playback finished");
        }
    }


    /// Save the current recording to `path`
    pub fn save(&mut self, path: &Path) -> ReplayResult<Outcome> {
        if self.state == SessionState::Recording {
            return Ok(self.reject(Rejection::RecordingActive));
        }
        if self.recording.is_empty() {
            return Ok(self.reject(Rejection::EmptyRecording));
        }

        match project::save(&self.recording, path) {
            Ok(document) => {
                self.current_file = Some(path.to_path_buf());
                self.notifier.log(format!(
                    "Saved {} events ({:.2}s) to {}",
                    document.action_count,
                    document.duration,
                    path.display()
                ));
                Ok(Outcome::Applied)
            }
            Err(e) => {
                self.notifier.warn(format!("Save failed: {}", e));
                Err(e)
            }
        }
    }

    /// Replace the current recording with the one stored at `path`.
    ///
    /// On failure the current recording is left untouched.
    pub fn load(&mut self, path: &Path) -> ReplayResult<Outcome> {
        self.sync_playback();
        match self.state {
            SessionState::Recording => return Ok(self.reject(Rejection::RecordingActive)),
            SessionState::Playing | SessionState::Paused => {
                return Ok(self.reject(Rejection::PlaybackActive))
            }
            SessionState::Idle => {}
        }

        match project::load(path) {
            Ok(recording) => {
                self.recording = recording;
                self.current_file = Some(path.to_path_buf());
                self.notifier.send(Notification::EventCount(self.recording.len()));
                self.notifier.log(format!(
                    "Loaded {} events ({:.2}s) from {}",
                    self.recording.len(),
                    self.recording.duration(),
                    path.display()
                ));
                Ok(Outcome::Applied)
            }
            Err(e) => {
                self.notifier.warn(format!("Load failed: {}", e));
                Err(e)
            }
        }
    }


    pub fn set_move_threshold(&mut self, threshold: f64) -> ReplayResult<()> {
        config::validate_move_threshold(threshold)?;
        self.settings.move_threshold = threshold;
        self.recorder.set_move_threshold(threshold);
        self.notifier.log(format!("Move sampling interval: {}s", threshold));
        Ok(())
    }

    pub fn set_playback_speed(&mut self, speed: f64) -> ReplayResult<()> {
        config::validate_playback_speed(speed)?;
        self.settings.playback_speed = speed;
        self.player.set_options(playback_options(&self.settings));
        self.notifier.log(format!("Playback speed: {}x", speed));
        Ok(())
    }

    pub fn set_loop_mode(&mut self, loop_mode: bool) {
        self.settings.loop_mode = loop_mode;
        self.player.set_options(playback_options(&self.settings));
        let status = if loop_mode { "on" } else { "off" };
        self.notifier.log(format!("Loop mode {}", status));
    }

    pub fn set_smooth_move(&mut self, smooth_move: bool) {
        self.settings.smooth_move = smooth_move;
        self.player.set_options(playback_options(&self.settings));
        let status = if smooth_move { "on" } else { "off" };
        self.notifier.log(format!("Smooth movement {}", status));
    }

    /// Force the session back to `Idle`, stopping any listener or worker
    pub fn shutdown(&mut self) {
        match self.state {
            SessionState::Recording => {
                let _ = self.stop_recording();
            }
            SessionState::Playing | SessionState::Paused => {
                let _ = self.stop_playback();
            }
            SessionState::Idle => {}
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
