//! Input capture and injection boundary
//!
//! The recorder and player never talk to the OS directly. They go through an
//! [`InputBackend`], which can attach a global mouse listener and open a
//! [`CursorSink`] for injecting cursor moves, button presses and scrolls.
//! The native backend lives behind the `native-input` feature.

pub mod input;

#[cfg(feature = "native-input")]
pub mod native;

#[cfg(test)]
pub mod fake;

use crate::error::ReplayResult;

pub use input::{Event, MouseButton, MouseInput};

#[cfg(feature = "native-input")]
pub use native::NativeBackend;

/// Callback invoked on the hook thread for every raw mouse input
pub type MouseCallback = Box<dyn Fn(MouseInput) + Send + Sync>;

/// Source of global mouse input and factory for cursor sinks
pub trait InputBackend: Send + Sync {
    /// Attach a listener. Input is delivered until the handle is detached or dropped.
    fn listen(&self, on_input: MouseCallback) -> ReplayResult<ListenerHandle>;

    /// Open a sink for injecting input.
    ///
    /// Called on the thread that will use the sink, so implementations do not
    /// need to be `Send`.
    fn open_sink(&self) -> ReplayResult<Box<dyn CursorSink>>;
}

/// Injects cursor movement and button/scroll input into the OS
pub trait CursorSink {
    /// Current absolute cursor position
    fn position(&mut self) -> ReplayResult<(i32, i32)>;

    /// Move the visible cursor to an absolute screen position
    fn move_to(&mut self, x: i32, y: i32) -> ReplayResult<()>;

    fn press(&mut self, button: MouseButton) -> ReplayResult<()>;

    fn release(&mut self, button: MouseButton) -> ReplayResult<()>;

    /// Scroll by wheel notches. Positive `dy` scrolls up, positive `dx` scrolls right.
    fn scroll(&mut self, dx: i32, dy: i32) -> ReplayResult<()>;
}

/// Owned registration of a listener; detaches on drop
pub struct ListenerHandle {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl ListenerHandle {
    pub fn new(detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Stop delivering input to the listener's callback
    pub fn detach(mut self) {
        self.run_detach();
    }

    fn run_detach(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.run_detach();
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}
