//! Global hotkeys: F7 toggles recording, F8 toggles playback, F9 pauses

use super::Command;
use crate::capture::native::hook;
use crate::capture::ListenerHandle;
use crate::error::ReplayResult;
use crossbeam_channel::Sender;
use rdev::{EventType, Key};
use std::sync::Arc;

/// Map a key press to its command
pub fn hotkey_command(event: &EventType) -> Option<Command> {
    match event {
        EventType::KeyPress(Key::F7) => Some(Command::ToggleRecording),
        EventType::KeyPress(Key::F8) => Some(Command::TogglePlayback),
        EventType::KeyPress(Key::F9) => Some(Command::TogglePause),
        _ => None,
    }
}

/// Forward hotkey presses to `commands` until the handle is dropped
pub fn install(commands: Sender<Command>) -> ReplayResult<ListenerHandle> {
    let handle = hook::subscribe(Arc::new(move |event: &rdev::Event| {
        if let Some(command) = hotkey_command(&event.event_type) {
            let _ = commands.send(command);
        }
    }))?;
    tracing::info!("Hotkeys: F7 record, F8 play/stop, F9 pause/resume");
    Ok(handle)
}
