//! Cross-thread notifications back to the controller
//!
//! The hook thread and the playback worker never touch controller state
//! directly; they post [`Notification`]s which the controller drains on the
//! main thread. Posting never blocks.

use crate::player::Completion;
use crate::session::SessionState;
use crossbeam_channel::{Receiver, Sender};

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    StateChanged(SessionState),
    /// Number of events captured so far in the active recording
    EventCount(usize),
    Log(String),
    Warning(String),
    PlaybackFinished(Completion),
}

/// Fire-and-forget sender for [`Notification`]s
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    tx: Option<Sender<Notification>>,
}

impl Notifier {
    /// Create a notifier and the receiving end for the controller
    pub fn channel() -> (Self, Receiver<Notification>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx: Some(tx) }, rx)
    }

    /// A notifier that drops everything
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn send(&self, notification: Notification) {
        if let Some(tx) = &self.tx {
            // The controller may already be gone during shutdown
            let _ = tx.send(notification);
        }
    }

    pub fn log(&self, message: impl Into<String>) {
        self.send(Notification::Log(message.into()));
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.send(Notification::Warning(message.into()));
    }
}
