//! Native input backend
//!
//! Uses `rdev` for the global mouse hook and `enigo` for injection.

pub mod hook;
pub mod injector;

pub use injector::EnigoInjector;

use crate::capture::{
    CursorSink, InputBackend, ListenerHandle, MouseButton, MouseCallback, MouseInput,
};
use crate::error::ReplayResult;
use parking_lot::Mutex;
use std::sync::Arc;

/// Backend that drives the real system cursor
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeBackend;

impl NativeBackend {
    pub fn new() -> Self {
        Self
    }
}

impl InputBackend for NativeBackend {
    fn listen(&self, on_input: MouseCallback) -> ReplayResult<ListenerHandle> {
        // Button and wheel events carry no position; track the last move,
        // seeded from the current cursor so early clicks land correctly.
        let origin = injector::cursor_location().unwrap_or_else(|e| {
            tracing::warn!("Could not read initial cursor position: {}", e);
            (0, 0)
        });
        let last_position = Mutex::new(origin);

        hook::subscribe(Arc::new(move |event: &rdev::Event| {
            if let Some(input) = translate(&event.event_type, &last_position) {
                on_input(input);
            }
        }))
    }

    fn open_sink(&self) -> ReplayResult<Box<dyn CursorSink>> {
        Ok(Box::new(EnigoInjector::new()?))
    }
}

fn map_button(button: rdev::Button) -> Option<MouseButton> {
    match button {
        rdev::Button::Left => Some(MouseButton::Left),
        rdev::Button::Right => Some(MouseButton::Right),
        rdev::Button::Middle => Some(MouseButton::Middle),
        rdev::Button::Unknown(_) => None,
    }
}

fn clamp_delta(delta: i64) -> i32 {
    delta.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Convert an rdev event into mouse input, ignoring keyboard and unknown buttons
fn translate(
    event_type: &rdev::EventType,
    last_position: &Mutex<(i32, i32)>,
) -> Option<MouseInput> {
    match *event_type {
        rdev::EventType::MouseMove { x, y } => {
            let (x, y) = (x.round() as i32, y.round() as i32);
            *last_position.lock() = (x, y);
            Some(MouseInput::Move { x, y })
        }
        rdev::EventType::ButtonPress(button) | rdev::EventType::ButtonRelease(button) => {
            let pressed = matches!(event_type, rdev::EventType::ButtonPress(_));
            let button = map_button(button)?;
            let (x, y) = *last_position.lock();
            Some(MouseInput::Button {
                x,
                y,
                button,
                pressed,
            })
        }
        rdev::EventType::Wheel { delta_x, delta_y } => {
            let (x, y) = *last_position.lock();
            Some(MouseInput::Scroll {
                x,
                y,
                dx: clamp_delta(delta_x),
                dy: clamp_delta(delta_y),
            })
        }
        rdev::EventType::KeyPress(_) | rdev::EventType::KeyRelease(_) => None,
    }
}
