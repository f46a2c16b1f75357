//! Control surface
//!
//! Hotkeys, the console and the CLI all produce [`Command`]s. The
//! [`Controller`] owns the session on the main thread and applies commands
//! in arrival order, interleaved with notifications from the hook thread and
//! the playback worker.

pub mod console;
#[cfg(feature = "native-input")]
pub mod hotkeys;

use crate::error::ReplayResult;
use crate::notify::Notification;
use crate::player::Completion;
use crate::session::{Outcome, Session, SessionState};
use crossbeam_channel::{Receiver, Sender};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    StartRecording,
    ToggleRecording,
    Play,
    TogglePlayback,
    TogglePause,
    /// Stop whichever of recording or playback is active
    Stop,
    Save(PathBuf),
    Load(PathBuf),
    SetMoveThreshold(f64),
    SetPlaybackSpeed(f64),
    SetLoopMode(bool),
    SetSmoothMove(bool),
    Stats,
    Shutdown,
}

/// Create the command channel shared by every input surface
pub fn channel() -> (Sender<Command>, Receiver<Command>) {
    crossbeam_channel::unbounded()
}

pub struct Controller {
    session: Session,
    commands: Receiver<Command>,
    notifications: Receiver<Notification>,
    exit_when_idle: bool,
}

impl Controller {
    pub fn new(
        session: Session,
        commands: Receiver<Command>,
        notifications: Receiver<Notification>,
    ) -> Self {
        Self {
            session,
            commands,
            notifications,
            exit_when_idle: false,
        }
    }

    /// Leave the loop as soon as the session is idle
    pub fn exit_when_idle(mut self, exit: bool) -> Self {
        self.exit_when_idle = exit;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Run until `Shutdown`, until every command sender is gone, or until
    /// idle when `exit_when_idle` is set. The session is idle on return.
    pub fn run(&mut self) {
        loop {
            if self.exit_when_idle && self.session.state() == SessionState::Idle {
                break;
            }

            crossbeam_channel::select! {
                recv(self.commands) -> command => match command {
                    Ok(Command::Shutdown) | Err(_) => break,
                    Ok(command) => self.dispatch(command),
                },
                recv(self.notifications) -> notification => match notification {
                    Ok(notification) => self.handle_notification(notification),
                    Err(_) => break,
                },
            }
        }

        self.session.shutdown();
        self.drain_notifications();
    }

    /// Apply one command to the session, logging failures
    pub fn dispatch(&mut self, command: Command) {
        tracing::debug!("Command: {:?}", command);
        if let Err(e) = self.apply(command) {
            tracing::error!("{}", e);
        }
    }

    fn apply(&mut self, command: Command) -> ReplayResult<()> {
        let session = &mut self.session;
        let _outcome: Outcome = match command {
            Command::StartRecording => session.start_recording()?,
            Command::ToggleRecording => session.toggle_recording()?,
            Command::Play => session.play()?,
            Command::TogglePlayback => session.toggle_playback()?,
            Command::TogglePause => session.toggle_pause(),
            Command::Stop => {
                if session.state() == SessionState::Recording {
                    session.stop_recording()
                } else {
                    session.stop_playback()
                }
            }
            Command::Save(path) => session.save(&path)?,
            Command::Load(path) => session.load(&path)?,
            Command::SetMoveThreshold(threshold) => {
                session.set_move_threshold(threshold)?;
                Outcome::Applied
            }
            Command::SetPlaybackSpeed(speed) => {
                session.set_playback_speed(speed)?;
                Outcome::Applied
            }
            Command::SetLoopMode(enabled) => {
                session.set_loop_mode(enabled);
                Outcome::Applied
            }
            Command::SetSmoothMove(enabled) => {
                session.set_smooth_move(enabled);
                Outcome::Applied
            }
            Command::Stats => {
                tracing::info!("{}", session.stats());
                Outcome::Applied
            }
            Command::Shutdown => {
                session.shutdown();
                Outcome::Applied
            }
        };
        Ok(())
    }

    fn handle_notification(&mut self, notification: Notification) {
        match notification {
            Notification::StateChanged(state) => tracing::info!("State: {}", state),
            Notification::EventCount(count) => tracing::debug!("Events: {}", count),
            Notification::Log(message) => tracing::info!("{}", message),
            Notification::Warning(message) => tracing::warn!("{}", message),
            Notification::PlaybackFinished(completion) => {
                if let Completion::Failed(reason) = &completion {
                    tracing::error!("Playback failed: {}", reason);
                }
                self.session.on_playback_finished();
            }
        }
    }

    fn drain_notifications(&mut self) {
        while let Ok(notification) = self.notifications.try_recv() {
            self.handle_notification(notification);
        }
    }
}
