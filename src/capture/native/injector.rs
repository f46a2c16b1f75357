use crate::capture::{CursorSink, MouseButton};
use crate::error::{ReplayError, ReplayResult};
use enigo::{Axis, Button, Coordinate, Direction, Enigo, Mouse, Settings as EnigoSettings};

/// Cursor sink backed by `enigo`.
///
/// Absolute moves go through the platform's absolute-move path (`SendInput`
/// with normalized coordinates on Windows), so the visible cursor follows.
pub struct EnigoInjector {
    enigo: Enigo,
}

impl EnigoInjector {
    pub fn new() -> ReplayResult<Self> {
        let enigo = Enigo::new(&EnigoSettings::default()).map_err(|e| {
            ReplayError::Platform(format!("Failed to connect input injector: {}", e))
        })?;
        Ok(Self { enigo })
    }
}

/// Current cursor location, queried through a short-lived injector
pub fn cursor_location() -> ReplayResult<(i32, i32)> {
    EnigoInjector::new()?.position()
}

fn map_button(button: MouseButton) -> Button {
    match button {
        MouseButton::Left => Button::Left,
        MouseButton::Right => Button::Right,
        MouseButton::Middle => Button::Middle,
    }
}

fn injection_failed(e: enigo::InputError) -> ReplayError {
    ReplayError::InjectionFailed(e.to_string())
}

impl CursorSink for EnigoInjector {
    fn position(&mut self) -> ReplayResult<(i32, i32)> {
        self.enigo.location().map_err(injection_failed)
    }

    fn move_to(&mut self, x: i32, y: i32) -> ReplayResult<()> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(injection_failed)
    }

    fn press(&mut self, button: MouseButton) -> ReplayResult<()> {
        self.enigo
            .button(map_button(button), Direction::Press)
            .map_err(injection_failed)
    }

    fn release(&mut self, button: MouseButton) -> ReplayResult<()> {
        self.enigo
            .button(map_button(button), Direction::Release)
            .map_err(injection_failed)
    }

    fn scroll(&mut self, dx: i32, dy: i32) -> ReplayResult<()> {
        // enigo scrolls down for positive lengths; recorded dy is positive upwards
        if dy != 0 {
            self.enigo
                .scroll(-dy, Axis::Vertical)
                .map_err(injection_failed)?;
        }
        if dx != 0 {
            self.enigo
                .scroll(dx, Axis::Horizontal)
                .map_err(injection_failed)?;
        }
        Ok(())
    }
}
