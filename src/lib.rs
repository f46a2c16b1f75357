//! Cursor Replay - record mouse activity and play it back.
//!
//! A global hook captures moves, clicks and scrolls with timestamps relative
//! to the start of the recording. Recordings are saved as JSON and replayed
//! on a background worker with speed, loop and smoothing controls.

pub mod capture;
pub mod commands;
pub mod config;
pub mod error;
pub mod notify;
pub mod player;
pub mod processing;
pub mod project;
pub mod recorder;
pub mod session;

pub use capture::{CursorSink, Event, InputBackend, MouseButton};
pub use config::Settings;
pub use error::{ReplayError, ReplayResult};
pub use notify::{Notification, Notifier};
pub use project::Recording;
pub use session::{Outcome, Rejection, Session, SessionState};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cursor_replay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
