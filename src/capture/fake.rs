//! In-memory input backend for tests
//!
//! Records every sink call instead of driving real hardware, and lets tests
//! push raw input through an attached listener.

use super::{CursorSink, InputBackend, ListenerHandle, MouseButton, MouseCallback, MouseInput};
use crate::error::{ReplayError, ReplayResult};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// One call made on a [`FakeSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkCall {
    MoveTo(i32, i32),
    Press(MouseButton),
    Release(MouseButton),
    Scroll(i32, i32),
}

type CallHook = Box<dyn FnMut(usize) + Send>;

#[derive(Default)]
pub struct FakeBackend {
    listener: Arc<Mutex<Option<MouseCallback>>>,
    calls: Arc<Mutex<Vec<SinkCall>>>,
    cursor: Arc<Mutex<(i32, i32)>>,
    on_call: Arc<Mutex<Option<CallHook>>>,
    sinks_opened: AtomicUsize,
    fail_listen: bool,
    fail_sink: bool,
    fail_presses: bool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_listen(mut self) -> Self {
        self.fail_listen = true;
        self
    }

    pub fn failing_sink(mut self) -> Self {
        self.fail_sink = true;
        self
    }

    /// Every button press fails; releases, moves and scrolls still succeed
    pub fn failing_presses(mut self) -> Self {
        self.fail_presses = true;
        self
    }

    /// Run `hook` with the total call count after every recorded sink call
    pub fn on_call(self, hook: impl FnMut(usize) + Send + 'static) -> Self {
        *self.on_call.lock() = Some(Box::new(hook));
        self
    }

    /// Deliver raw input to the attached listener, if any
    pub fn emit(&self, input: MouseInput) {
        if let Some(callback) = self.listener.lock().as_ref() {
            callback(input);
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listener.lock().is_some()
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().clone()
    }

    pub fn sinks_opened(&self) -> usize {
        self.sinks_opened.load(Ordering::SeqCst)
    }
}

impl InputBackend for FakeBackend {
    fn listen(&self, on_input: MouseCallback) -> ReplayResult<ListenerHandle> {
        if self.fail_listen {
            return Err(ReplayError::ListenerFailed("fake hook refused".to_string()));
        }
        *self.listener.lock() = Some(on_input);
        let slot = self.listener.clone();
        Ok(ListenerHandle::new(move || {
            slot.lock().take();
        }))
    }

    fn open_sink(&self) -> ReplayResult<Box<dyn CursorSink>> {
        if self.fail_sink {
            return Err(ReplayError::Platform("fake sink unavailable".to_string()));
        }
        self.sinks_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSink {
            calls: self.calls.clone(),
            cursor: self.cursor.clone(),
            on_call: self.on_call.clone(),
            fail_presses: self.fail_presses,
        }))
    }
}

pub struct FakeSink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
    cursor: Arc<Mutex<(i32, i32)>>,
    on_call: Arc<Mutex<Option<CallHook>>>,
    fail_presses: bool,
}

impl FakeSink {
    fn record(&mut self, call: SinkCall) {
        let count = {
            let mut calls = self.calls.lock();
            calls.push(call);
            calls.len()
        };
        if let Some(hook) = self.on_call.lock().as_mut() {
            hook(count);
        }
    }
}

impl CursorSink for FakeSink {
    fn position(&mut self) -> ReplayResult<(i32, i32)> {
        Ok(*self.cursor.lock())
    }

    fn move_to(&mut self, x: i32, y: i32) -> ReplayResult<()> {
        *self.cursor.lock() = (x, y);
        self.record(SinkCall::MoveTo(x, y));
        Ok(())
    }

    fn press(&mut self, button: MouseButton) -> ReplayResult<()> {
        if self.fail_presses {
            return Err(ReplayError::InjectionFailed(format!("fake press of {} failed", button)));
        }
        self.record(SinkCall::Press(button));
        Ok(())
    }

    fn release(&mut self, button: MouseButton) -> ReplayResult<()> {
        self.record(SinkCall::Release(button));
        Ok(())
    }

    fn scroll(&mut self, dx: i32, dy: i32) -> ReplayResult<()> {
        self.record(SinkCall::Scroll(dx, dy));
        Ok(())
    }
}
