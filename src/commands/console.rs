//! Line-oriented console commands read from stdin

use super::Command;
use crossbeam_channel::Sender;
use std::io::BufRead;
use std::path::PathBuf;
use std::thread::JoinHandle;

pub const HELP: &str = "commands: record | play | pause | stop | save <path> | load <path> | \
threshold <seconds> | speed <factor> | loop on|off | smooth on|off | stats | quit";

fn parse_switch(value: Option<&str>) -> Result<bool, String> {
    match value {
        Some("on") | Some("true") | Some("1") => Ok(true),
        Some("off") | Some("false") | Some("0") => Ok(false),
        Some(other) => Err(format!("expected on or off, got '{}'", other)),
        None => Err("expected on or off".to_string()),
    }
}

fn parse_number(value: Option<&str>, what: &str) -> Result<f64, String> {
    let value = value.ok_or_else(|| format!("missing {}", what))?;
    value
        .parse::<f64>()
        .map_err(|_| format!("invalid {}: '{}'", what, value))
}

/// Parse one console line into a [`Command`]
pub fn parse_line(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let argument = (!rest.is_empty()).then_some(rest);

    match word.to_lowercase().as_str() {
        "record" => Ok(Command::StartRecording),
        "play" => Ok(Command::Play),
        "pause" | "resume" => Ok(Command::TogglePause),
        "stop" => Ok(Command::Stop),
        "save" => argument
            .map(|path| Command::Save(PathBuf::from(path)))
            .ok_or_else(|| "save needs a file path".to_string()),
        "load" => argument
            .map(|path| Command::Load(PathBuf::from(path)))
            .ok_or_else(|| "load needs a file path".to_string()),
        "threshold" => parse_number(argument, "threshold").map(Command::SetMoveThreshold),
        "speed" => parse_number(argument, "speed").map(Command::SetPlaybackSpeed),
        "loop" => parse_switch(argument).map(Command::SetLoopMode),
        "smooth" => parse_switch(argument).map(Command::SetSmoothMove),
        "stats" => Ok(Command::Stats),
        "quit" | "exit" => Ok(Command::Shutdown),
        "" => Err("empty command".to_string()),
        other => Err(format!("unknown command '{}'", other)),
    }
}

/// Read stdin on a background thread and forward parsed commands.
///
/// End of input sends `Shutdown`.
pub fn spawn_reader(commands: Sender<Command>) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("console".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::error!("Failed to read console input: {}", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_line(&line) {
                    Ok(command) => {
                        if commands.send(command).is_err() {
                            return;
                        }
                    }
                    Err(e) => tracing::warn!("{} ({})", e, HELP),
                }
            }
            let _ = commands.send(Command::Shutdown);
        })
}
