//! Mouse recorder
//!
//! Attaches a listener to the input backend and appends sampled, timestamped
//! events to a capture buffer until stopped.

pub mod sampler;

pub use sampler::{CaptureBuffer, MoveSampler, DEFAULT_MOVE_THRESHOLD};

use crate::capture::{Event, InputBackend, ListenerHandle, MouseCallback};
use crate::error::ReplayResult;
use crate::notify::{Notification, Notifier};
use parking_lot::Mutex as ParkingMutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

pub struct Recorder {
    backend: Arc<dyn InputBackend>,
    is_recording: Arc<AtomicBool>,
    buffer: Arc<ParkingMutex<CaptureBuffer>>,
    listener: Option<ListenerHandle>,
    notifier: Notifier,
}

impl Recorder {
    pub fn new(backend: Arc<dyn InputBackend>, move_threshold: f64, notifier: Notifier) -> Self {
        Self {
            backend,
            is_recording: Arc::new(AtomicBool::new(false)),
            buffer: Arc::new(ParkingMutex::new(CaptureBuffer::new(move_threshold))),
            listener: None,
            notifier,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.listener.is_some()
    }

    /// Number of events captured in the current (or last) recording
    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn move_threshold(&self) -> f64 {
        self.buffer.lock().threshold()
    }

    /// Change the move sampling threshold; applies to subsequent moves
    pub fn set_move_threshold(&self, threshold: f64) {
        self.buffer.lock().set_threshold(threshold);
    }

    /// Clear the buffer and start listening.
    ///
    /// Returns `Ok(false)` without side effects if already recording. If the
    /// listener cannot attach the error is returned and the recorder stays
    /// stopped.
    pub fn start(&mut self) -> ReplayResult<bool> {
        if self.is_recording() {
            return Ok(false);
        }

        self.buffer.lock().reset();
        let started = Instant::now();
        self.is_recording.store(true, Ordering::SeqCst);

        let is_recording = self.is_recording.clone();
        let buffer = self.buffer.clone();
        let notifier = self.notifier.clone();

        let on_input: MouseCallback = Box::new(move |input| {
            let (event, count) = {
                let mut buffer = buffer.lock();
                // Checked under the lock so nothing lands after stop() drains
                if !is_recording.load(Ordering::SeqCst) {
                    return;
                }
                let time = started.elapsed().as_secs_f64();
                match buffer.accept(input, time) {
                    Some(event) => (event, buffer.len()),
                    None => return,
                }
            };

            notifier.send(Notification::EventCount(count));
            match event {
                Event::Click {
                    x, y, button, pressed, ..
                } => {
                    let action = if pressed { "pressed" } else { "released" };
                    notifier.log(format!("{} {} at ({}, {})", button, action, x, y));
                }
                Event::Scroll { x, y, dy, .. } => {
                    notifier.log(format!("Scrolled at ({}, {}), dy={}", x, y, dy));
                }
                Event::Move { .. } => {}
            }
        });

        match self.backend.listen(on_input) {
            Ok(handle) => {
                self.listener = Some(handle);
                tracing::info!(
                    "Recording started (move_threshold={}s)",
                    self.move_threshold()
                );
                Ok(true)
            }
            Err(e) => {
                self.is_recording.store(false, Ordering::SeqCst);
                tracing::error!("Failed to start recording: {}", e);
                Err(e)
            }
        }
    }

    /// Detach the listener and hand back the captured events.
    ///
    /// Returns `None` if not recording.
    pub fn stop(&mut self) -> Option<Vec<Event>> {
        let handle = self.listener.take()?;
        self.is_recording.store(false, Ordering::SeqCst);
        handle.detach();

        let events = self.buffer.lock().take();
        tracing::info!("Recording stopped ({} events)", events.len());
        Some(events)
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
