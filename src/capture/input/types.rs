use serde::{Deserialize, Deserializer, Serialize};

/// Mouse button carried by click events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Parse a button name leniently.
    ///
    /// Accepts anything containing `left`, `right` or `middle` in any case
    /// (`"left"`, `"Button.left"`, `"RIGHT"`). Unknown names map to `Left`.
    pub fn parse_lenient(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name.contains("left") {
            MouseButton::Left
        } else if name.contains("right") {
            MouseButton::Right
        } else if name.contains("middle") {
            MouseButton::Middle
        } else {
            MouseButton::Left
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        }
    }
}

impl<'de> Deserialize<'de> for MouseButton {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(MouseButton::parse_lenient(&name))
    }
}

impl std::fmt::Display for MouseButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded mouse action.
///
/// `time` is seconds since the start of the recording.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    Move {
        x: i32,
        y: i32,
        time: f64,
    },
    Click {
        x: i32,
        y: i32,
        button: MouseButton,
        pressed: bool,
        time: f64,
    },
    Scroll {
        x: i32,
        y: i32,
        dx: i32,
        dy: i32,
        time: f64,
    },
}

impl Event {
    pub fn time(&self) -> f64 {
        match *self {
            Event::Move { time, .. } | Event::Click { time, .. } | Event::Scroll { time, .. } => {
                time
            }
        }
    }

    /// Screen position the event happened at
    pub fn position(&self) -> (i32, i32) {
        match *self {
            Event::Move { x, y, .. } | Event::Click { x, y, .. } | Event::Scroll { x, y, .. } => {
                (x, y)
            }
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Event::Move { .. })
    }
}

/// Raw mouse input delivered by an input hook, before timestamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseInput {
    Move {
        x: i32,
        y: i32,
    },
    Button {
        x: i32,
        y: i32,
        button: MouseButton,
        pressed: bool,
    },
    Scroll {
        x: i32,
        y: i32,
        dx: i32,
        dy: i32,
    },
}

impl MouseInput {
    /// Stamp the input with a recording-relative time
    pub fn at(self, time: f64) -> Event {
        match self {
            MouseInput::Move { x, y } => Event::Move { x, y, time },
            MouseInput::Button {
                x,
                y,
                button,
                pressed,
            } => Event::Click {
                x,
                y,
                button,
                pressed,
                time,
            },
            MouseInput::Scroll { x, y, dx, dy } => Event::Scroll { x, y, dx, dy, time },
        }
    }
}
