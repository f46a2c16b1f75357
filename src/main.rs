//! cursor-replay command line

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use crossbeam_channel::Sender;
use cursor_replay::capture::NativeBackend;
use cursor_replay::commands::{self, console, hotkeys, Command, Controller};
use cursor_replay::processing::RecordingStats;
use cursor_replay::{Notifier, Session, Settings};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "cursor-replay", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Mode>,

    /// Settings file (JSON)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Record until F7 or Ctrl-C, then save
    Record {
        /// Output file, defaults to recordings/recording_<timestamp>.json
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Minimum seconds between recorded moves
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Play a saved recording
    Play {
        file: PathBuf,
        #[arg(long)]
        speed: Option<f64>,
        /// Repeat until stopped
        #[arg(long = "loop")]
        loop_mode: bool,
        /// Jump between positions instead of interpolating
        #[arg(long)]
        no_smooth: bool,
    },
    /// Print statistics for a saved recording
    Stats {
        file: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Hotkeys and console commands (default)
    Interactive,
}

fn default_output() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    Path::new("recordings").join(format!("recording_{}.json", stamp))
}

fn main() -> anyhow::Result<()> {
    cursor_replay::init_tracing();
    let cli = Cli::parse();

    let mut settings = Settings::load_or_default(cli.settings.as_deref())
        .context("failed to load settings")?;

    match cli.command.unwrap_or(Mode::Interactive) {
        Mode::Stats { file, json } => {
            let recording = cursor_replay::project::load(&file)
                .with_context(|| format!("failed to load {}", file.display()))?;
            let stats = RecordingStats::from_events(recording.events());
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", stats);
            }
            Ok(())
        }
        Mode::Record { output, threshold } => {
            if let Some(threshold) = threshold {
                settings.move_threshold = threshold;
            }
            settings.validate()?;
            record(settings, output.unwrap_or_else(default_output))
        }
        Mode::Play {
            file,
            speed,
            loop_mode,
            no_smooth,
        } => {
            if let Some(speed) = speed {
                settings.playback_speed = speed;
            }
            settings.loop_mode |= loop_mode;
            settings.smooth_move &= !no_smooth;
            settings.validate()?;
            play(settings, &file)
        }
        Mode::Interactive => interactive(settings),
    }
}

/// Build a controller on the native backend with hotkeys and Ctrl-C wired in
fn build_controller(settings: Settings) -> anyhow::Result<(Controller, Sender<Command>)> {
    let (notifier, notifications) = Notifier::channel();
    let session = Session::new(Arc::new(NativeBackend::new()), settings, notifier);
    let (tx, rx) = commands::channel();

    let ctrlc_tx = tx.clone();
    ctrlc::set_handler(move || {
        let _ = ctrlc_tx.send(Command::Shutdown);
    })
    .context("failed to install Ctrl-C handler")?;

    Ok((Controller::new(session, rx, notifications), tx))
}

fn record(settings: Settings, output: PathBuf) -> anyhow::Result<()> {
    let (mut controller, tx) = build_controller(settings)?;
    let _hotkeys = hotkeys::install(tx).context("failed to install hotkeys")?;

    if !controller.session_mut().start_recording()?.is_applied() {
        bail!("could not start recording");
    }
    tracing::info!("Recording, press F7 or Ctrl-C to stop");

    let mut controller = controller.exit_when_idle(true);
    controller.run();

    let mut session = controller.into_session();
    if session.recording().is_empty() {
        tracing::warn!("Nothing was recorded");
        return Ok(());
    }
    let outcome = session
        .save(&output)
        .with_context(|| format!("failed to save {}", output.display()))?;
    if !outcome.is_applied() {
        bail!("recording was not saved");
    }
    Ok(())
}

fn play(settings: Settings, file: &Path) -> anyhow::Result<()> {
    let (mut controller, tx) = build_controller(settings)?;
    let _hotkeys = hotkeys::install(tx).context("failed to install hotkeys")?;

    let session = controller.session_mut();
    let outcome = session
        .load(file)
        .with_context(|| format!("failed to load {}", file.display()))?;
    if !outcome.is_applied() || !session.play()?.is_applied() {
        return Ok(());
    }
    tracing::info!("Playing, press F8 or Ctrl-C to stop, F9 to pause");

    let mut controller = controller.exit_when_idle(true);
    controller.run();
    Ok(())
}

fn interactive(settings: Settings) -> anyhow::Result<()> {
    let (mut controller, tx) = build_controller(settings)?;
    let _hotkeys = hotkeys::install(tx.clone()).context("failed to install hotkeys")?;
    console::spawn_reader(tx).context("failed to start console reader")?;
    tracing::info!("{}", console::HELP);

    controller.run();
    Ok(())
}
