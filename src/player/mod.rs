//! Recording playback
//!
//! The [`Player`] replays a recording on a single background worker thread,
//! reproducing the recorded timing scaled by the playback speed. Moves,
//! clicks and scrolls first travel the cursor to the recorded position (see
//! [`motion`]), then perform their discrete action.

pub mod control;
pub mod motion;

pub use control::{MotionProfile, PlaybackControl, PlaybackOptions};

use crate::capture::{CursorSink, Event, InputBackend};
use crate::error::{ReplayError, ReplayResult};
use crate::notify::{Notification, Notifier};
use crate::session::{Outcome, Rejection};
use motion::{smooth_move_to, APPROACH_DURATION, MAX_MOVE_DURATION};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Stopped,
    Playing,
    Paused,
}

/// How a playback run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Reached the end of the recording
    Finished,
    /// Stop was requested
    Stopped,
    /// The sink could not be opened, or the worker panicked
    Failed(String),
}

pub struct Player {
    backend: Arc<dyn InputBackend>,
    control: Arc<PlaybackControl>,
    worker: Option<JoinHandle<Completion>>,
    notifier: Notifier,
}

impl Player {
    pub fn new(
        backend: Arc<dyn InputBackend>,
        options: PlaybackOptions,
        notifier: Notifier,
    ) -> Self {
        Self {
            backend,
            control: Arc::new(PlaybackControl::new(options)),
            worker: None,
            notifier,
        }
    }

    pub fn state(&self) -> PlayerState {
        match &self.worker {
            Some(handle) if !handle.is_finished() && !self.control.is_done() => {
                if self.control.is_paused() {
                    PlayerState::Paused
                } else {
                    PlayerState::Playing
                }
            }
            _ => PlayerState::Stopped,
        }
    }

    pub fn options(&self) -> PlaybackOptions {
        self.control.options()
    }

    /// Update playback options; a running worker picks them up at its next event
    pub fn set_options(&self, options: PlaybackOptions) {
        self.control.set_options(options);
    }

    /// Start playing `events`, or resume if paused.
    ///
    /// Rejected if `events` is empty (no worker is spawned) or a worker is
    /// already playing.
    pub fn play(&mut self, events: Arc<[Event]>) -> ReplayResult<Outcome> {
        match self.state() {
            PlayerState::Paused => return Ok(self.resume()),
            PlayerState::Playing => return Ok(Outcome::Rejected(Rejection::AlreadyPlaying)),
            PlayerState::Stopped => {}
        }
        if events.is_empty() {
            return Ok(Outcome::Rejected(Rejection::EmptyRecording));
        }

        self.reap();
        self.control.reset();

        let backend = self.backend.clone();
        let control = self.control.clone();
        let notifier = self.notifier.clone();
        let count = events.len();

        let handle = std::thread::Builder::new()
            .name("playback".to_string())
            .spawn(move || {
                let completion = std::panic::catch_unwind(AssertUnwindSafe(|| {
                    run_playback(backend.as_ref(), &events, &control, &notifier)
                }))
                .unwrap_or_else(|payload| {
                    let reason = panic_reason(payload.as_ref());
                    tracing::error!("Playback worker panicked: {}", reason);
                    notifier.warn(format!("Playback failed: {}", reason));
                    Completion::Failed(reason)
                });
                control.mark_done();
                notifier.send(Notification::PlaybackFinished(completion.clone()));
                completion
            })
            .map_err(|e| ReplayError::Platform(format!("Failed to spawn playback worker: {}", e)))?;

        self.worker = Some(handle);
        tracing::info!(
            "Playback started ({} events, speed={}x, loop={})",
            count,
            self.options().speed,
            self.options().loop_mode
        );
        Ok(Outcome::Applied)
    }

    pub fn pause(&self) -> Outcome {
        match self.state() {
            PlayerState::Playing => {
                self.control.set_paused(true);
                tracing::info!("Playback paused");
                Outcome::Applied
            }
            PlayerState::Paused => Outcome::Rejected(Rejection::AlreadyPaused),
            PlayerState::Stopped => Outcome::Rejected(Rejection::NotPlaying),
        }
    }

    pub fn resume(&self) -> Outcome {
        match self.state() {
            PlayerState::Paused => {
                self.control.set_paused(false);
                tracing::info!("Playback resumed");
                Outcome::Applied
            }
            PlayerState::Playing => Outcome::Rejected(Rejection::NotPaused),
            PlayerState::Stopped => Outcome::Rejected(Rejection::NotPlaying),
        }
    }

    /// Stop the worker and wait for it to exit. A no-op when already stopped.
    pub fn stop(&mut self) -> Outcome {
        let was_running = self.state() != PlayerState::Stopped;
        let Some(handle) = self.worker.take() else {
            return Outcome::Rejected(Rejection::NotPlaying);
        };

        self.control.request_stop();
        let completion = join_worker(handle);
        self.control.set_paused(false);

        if was_running {
            tracing::info!("Playback stopped ({:?})", completion);
            Outcome::Applied
        } else {
            Outcome::Rejected(Rejection::NotPlaying)
        }
    }

    /// Join a worker that finished on its own
    pub fn reap(&mut self) -> Option<Completion> {
        if self.state() != PlayerState::Stopped {
            return None;
        }
        self.worker.take().map(join_worker)
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

fn join_worker(handle: JoinHandle<Completion>) -> Completion {
    handle.join().unwrap_or_else(|_| {
        tracing::error!("Playback worker panicked");
        Completion::Failed("playback worker panicked".to_string())
    })
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "playback worker panicked".to_string()
    }
}

fn run_playback(
    backend: &dyn InputBackend,
    events: &[Event],
    control: &PlaybackControl,
    notifier: &Notifier,
) -> Completion {
    let mut sink = match backend.open_sink() {
        Ok(sink) => sink,
        Err(e) => {
            tracing::error!("Failed to open cursor sink: {}", e);
            notifier.warn(format!("Playback failed: {}", e));
            return Completion::Failed(e.to_string());
        }
    };

    let mut pass = 1usize;
    loop {
        let mut prev_time = 0.0;

        for event in events {
            if control.is_stopped() || !control.wait_while_paused() {
                return Completion::Stopped;
            }

            let options = control.options();
            let delay = (event.time() - prev_time) / options.speed;
            prev_time = event.time();

            let gap = if delay > 0.0 {
                Duration::try_from_secs_f64(delay).unwrap_or(Duration::MAX)
            } else {
                Duration::ZERO
            };
            if !gap.is_zero() && !control.sleep(gap) {
                return Completion::Stopped;
            }

            if let Err(e) = execute(sink.as_mut(), control, event, gap, options.motion) {
                tracing::warn!("Failed to replay {:?}: {}", event, e);
                notifier.warn(format!("Failed to replay event: {}", e));
            }
        }

        if !control.options().loop_mode || control.is_stopped() {
            break;
        }
        pass += 1;
        tracing::debug!("Looping playback (pass {})", pass);
        notifier.log(format!("Looping playback (pass {})", pass));
    }

    if control.is_stopped() {
        Completion::Stopped
    } else {
        tracing::info!("Playback finished");
        Completion::Finished
    }
}

fn execute(
    sink: &mut dyn CursorSink,
    control: &PlaybackControl,
    event: &Event,
    gap: Duration,
    motion: MotionProfile,
) -> ReplayResult<()> {
    match *event {
        Event::Move { x, y, .. } => {
            smooth_move_to(sink, control, (x, y), gap.min(MAX_MOVE_DURATION), motion)
        }
        Event::Click {
            x,
            y,
            button,
            pressed,
            ..
        } => {
            smooth_move_to(sink, control, (x, y), APPROACH_DURATION, motion)?;
            if control.is_stopped() {
                return Ok(());
            }
            if pressed {
                sink.press(button)
            } else {
                sink.release(button)
            }
        }
        Event::Scroll { x, y, dx, dy, .. } => {
            smooth_move_to(sink, control, (x, y), APPROACH_DURATION, motion)?;
            if control.is_stopped() {
                return Ok(());
            }
            sink.scroll(dx, dy)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::fake::{FakeBackend, SinkCall};
    use crate::capture::MouseButton;
    use crossbeam_channel::Receiver;
    use parking_lot::Mutex;
    use std::sync::OnceLock;
    use std::time::Instant;

    fn instant_options(loop_mode: bool) -> PlaybackOptions {
        PlaybackOptions {
            speed: 1.0,
            loop_mode,
            motion: MotionProfile {
                smooth: false,
                steps: 20,
            },
        }
    }

    fn click(button: MouseButton, pressed: bool, x: i32, time: f64) -> Event {
        Event::Click {
            x,
            y: x,
            button,
            pressed,
            time,
        }
    }

    fn wait_finished(rx: &Receiver<Notification>) -> Completion {
        loop {
            match rx.recv_timeout(Duration::from_secs(10)) {
                Ok(Notification::PlaybackFinished(completion)) => return completion,
                Ok(_) => continue,
                Err(e) => panic!("playback did not finish: {}", e),
            }
        }
    }

    /// The worker posts its notification just before exiting
    fn reap_eventually(player: &mut Player) -> Completion {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(completion) = player.reap() {
                return completion;
            }
            assert!(Instant::now() < deadline, "worker never exited");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn shared(events: Vec<Event>) -> Arc<[Event]> {
        Arc::from(events)
    }

    #[test]
    fn test_plays_events_in_order() {
        let backend = Arc::new(FakeBackend::new());
        let (notifier, rx) = Notifier::channel();
        let mut player = Player::new(backend.clone(), instant_options(false), notifier);

        let events = shared(vec![
            Event::Move { x: 10, y: 10, time: 0.0 },
            click(MouseButton::Left, true, 20, 0.01),
            click(MouseButton::Left, false, 20, 0.02),
            Event::Scroll {
                x: 30,
                y: 30,
                dx: 0,
                dy: -1,
                time: 0.03,
            },
        ]);
        assert_eq!(player.play(events).unwrap(), Outcome::Applied);
        assert_eq!(wait_finished(&rx), Completion::Finished);

        assert_eq!(
            backend.calls(),
            vec![
                SinkCall::MoveTo(10, 10),
                SinkCall::MoveTo(20, 20),
                SinkCall::Press(MouseButton::Left),
                SinkCall::MoveTo(20, 20),
                SinkCall::Release(MouseButton::Left),
                SinkCall::MoveTo(30, 30),
                SinkCall::Scroll(0, -1),
            ]
        );
        assert_eq!(reap_eventually(&mut player), Completion::Finished);
        assert_eq!(player.state(), PlayerState::Stopped);
    }

    #[test]
    fn test_empty_recording_does_not_spawn() {
        let backend = Arc::new(FakeBackend::new());
        let mut player = Player::new(backend.clone(), instant_options(false), Notifier::disabled());

        let outcome = player.play(shared(Vec::new())).unwrap();
        assert_eq!(outcome, Outcome::Rejected(Rejection::EmptyRecording));
        assert_eq!(player.state(), PlayerState::Stopped);
        assert_eq!(backend.sinks_opened(), 0);
    }

    #[test]
    fn test_failed_event_does_not_abort_playback() {
        let backend = Arc::new(FakeBackend::new().failing_presses());
        let (notifier, rx) = Notifier::channel();
        let mut player = Player::new(backend.clone(), instant_options(false), notifier);

        player
            .play(shared(vec![
                click(MouseButton::Right, true, 5, 0.0),
                click(MouseButton::Right, false, 5, 0.01),
            ]))
            .unwrap();
        assert_eq!(wait_finished(&rx), Completion::Finished);

        let calls = backend.calls();
        assert!(!calls.contains(&SinkCall::Press(MouseButton::Right)));
        assert!(calls.contains(&SinkCall::Release(MouseButton::Right)));
    }

    #[test]
    fn test_sink_failure_ends_playback() {
        let backend = Arc::new(FakeBackend::new().failing_sink());
        let (notifier, rx) = Notifier::channel();
        let mut player = Player::new(backend, instant_options(false), notifier);

        player.play(shared(vec![Event::Move { x: 1, y: 1, time: 0.0 }])).unwrap();
        assert!(matches!(wait_finished(&rx), Completion::Failed(_)));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let backend = Arc::new(FakeBackend::new());
        let mut player = Player::new(backend, instant_options(false), Notifier::disabled());

        assert_eq!(player.stop(), Outcome::Rejected(Rejection::NotPlaying));

        player
            .play(shared(vec![
                Event::Move { x: 1, y: 1, time: 0.0 },
                Event::Move { x: 2, y: 2, time: 30.0 },
            ]))
            .unwrap();
        assert_eq!(player.state(), PlayerState::Playing);

        let started = Instant::now();
        assert_eq!(player.stop(), Outcome::Applied);
        assert!(started.elapsed() < Duration::from_secs(30));
        assert_eq!(player.state(), PlayerState::Stopped);
        assert_eq!(player.stop(), Outcome::Rejected(Rejection::NotPlaying));
    }

    #[test]
    fn test_pause_and_resume() {
        let backend = Arc::new(FakeBackend::new());
        let mut player = Player::new(backend, instant_options(false), Notifier::disabled());
        let events = shared(vec![
            Event::Move { x: 1, y: 1, time: 0.0 },
            Event::Move { x: 2, y: 2, time: 30.0 },
        ]);

        assert_eq!(player.pause(), Outcome::Rejected(Rejection::NotPlaying));
        player.play(events.clone()).unwrap();

        assert_eq!(player.resume(), Outcome::Rejected(Rejection::NotPaused));
        assert_eq!(player.pause(), Outcome::Applied);
        assert_eq!(player.state(), PlayerState::Paused);
        assert_eq!(player.pause(), Outcome::Rejected(Rejection::AlreadyPaused));

        // Playing again while paused resumes the same worker
        assert_eq!(player.play(events).unwrap(), Outcome::Applied);
        assert_eq!(player.state(), PlayerState::Playing);
        let other = shared(vec![Event::Move { x: 0, y: 0, time: 0.0 }]);
        assert_eq!(
            player.play(other).unwrap(),
            Outcome::Rejected(Rejection::AlreadyPlaying)
        );

        assert_eq!(player.stop(), Outcome::Applied);
    }

    #[test]
    fn test_loop_stops_mid_second_pass() {
        let control_slot: Arc<OnceLock<Arc<PlaybackControl>>> = Arc::new(OnceLock::new());
        let hook_slot = control_slot.clone();
        // Each event is one move plus one action: 6 calls per pass.
        // Stop right after the first action of the second pass.
        let backend = Arc::new(FakeBackend::new().on_call(move |count| {
            if count == 8 {
                if let Some(control) = hook_slot.get() {
                    control.request_stop();
                }
            }
        }));
        let (notifier, rx) = Notifier::channel();
        let mut player = Player::new(backend.clone(), instant_options(true), notifier);
        let _ = control_slot.set(player.control.clone());

        player
            .play(shared(vec![
                click(MouseButton::Left, true, 10, 0.0),
                click(MouseButton::Left, false, 10, 0.005),
                Event::Scroll {
                    x: 10,
                    y: 10,
                    dx: 0,
                    dy: 1,
                    time: 0.01,
                },
            ]))
            .unwrap();
        assert_eq!(wait_finished(&rx), Completion::Stopped);

        let calls = backend.calls();
        assert_eq!(calls.len(), 8);
        assert_eq!(
            calls[6..],
            [SinkCall::MoveTo(10, 10), SinkCall::Press(MouseButton::Left)]
        );
        let scrolls = calls
            .iter()
            .filter(|call| matches!(call, SinkCall::Scroll(..)))
            .count();
        assert_eq!(scrolls, 1);
    }

    #[test]
    fn test_speed_scales_delays() {
        let backend = Arc::new(FakeBackend::new());
        let (notifier, rx) = Notifier::channel();
        let options = PlaybackOptions {
            speed: 0.5,
            ..instant_options(false)
        };
        let mut player = Player::new(backend, options, notifier);

        let started = Instant::now();
        player
            .play(shared(vec![
                Event::Move { x: 1, y: 1, time: 0.0 },
                Event::Move { x: 2, y: 2, time: 0.05 },
            ]))
            .unwrap();
        assert_eq!(wait_finished(&rx), Completion::Finished);
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    fn smooth_options() -> PlaybackOptions {
        PlaybackOptions {
            speed: 1.0,
            loop_mode: false,
            motion: MotionProfile {
                smooth: true,
                steps: 20,
            },
        }
    }

    /// Backend that timestamps every sink call
    fn timed_backend() -> (Arc<FakeBackend>, Arc<Mutex<Vec<Instant>>>) {
        let times = Arc::new(Mutex::new(Vec::new()));
        let sink_times = times.clone();
        let backend = FakeBackend::new().on_call(move |_| sink_times.lock().push(Instant::now()));
        (Arc::new(backend), times)
    }

    #[test]
    fn test_move_travel_time_is_capped() {
        let (backend, times) = timed_backend();
        let (notifier, rx) = Notifier::channel();
        let mut player = Player::new(backend.clone(), smooth_options(), notifier);

        // The first move is a short hop from the origin, the second a long
        // move after a 2 s gap
        player
            .play(shared(vec![
                Event::Move { x: 0, y: 0, time: 0.0 },
                Event::Move { x: 400, y: 0, time: 2.0 },
            ]))
            .unwrap();
        assert_eq!(wait_finished(&rx), Completion::Finished);

        let calls = backend.calls();
        assert_eq!(calls.len(), 21);
        assert_eq!(calls[20], SinkCall::MoveTo(400, 0));

        let times = times.lock();
        let travel = times[20] - times[1];
        // 19 step delays of MAX_MOVE_DURATION / 20 each
        assert!(travel >= MAX_MOVE_DURATION * 19 / 20);
        assert!(travel < Duration::from_millis(1500));
        assert!(times[20] - times[0] >= Duration::from_secs(2));
    }

    #[test]
    fn test_click_and_scroll_approach_time() {
        let (backend, times) = timed_backend();
        let (notifier, rx) = Notifier::channel();
        let mut player = Player::new(backend.clone(), smooth_options(), notifier);

        player
            .play(shared(vec![
                Event::Click {
                    x: 400,
                    y: 0,
                    button: MouseButton::Left,
                    pressed: true,
                    time: 0.0,
                },
                Event::Scroll {
                    x: 0,
                    y: 0,
                    dx: 0,
                    dy: 1,
                    time: 0.0,
                },
            ]))
            .unwrap();
        assert_eq!(wait_finished(&rx), Completion::Finished);

        let calls = backend.calls();
        assert_eq!(calls.len(), 42);
        assert_eq!(calls[20], SinkCall::Press(MouseButton::Left));
        assert_eq!(calls[41], SinkCall::Scroll(0, 1));

        let times = times.lock();
        assert!(times[20] - times[0] >= APPROACH_DURATION);
        assert!(times[41] - times[21] >= APPROACH_DURATION);
    }

    #[test]
    fn test_pause_is_not_counted_against_delay() {
        let control_slot: Arc<OnceLock<Arc<PlaybackControl>>> = Arc::new(OnceLock::new());
        let hook_slot = control_slot.clone();
        let times = Arc::new(Mutex::new(Vec::new()));
        let sink_times = times.clone();
        // Pause right after the first event, before the second one's delay
        let backend = Arc::new(FakeBackend::new().on_call(move |count| {
            sink_times.lock().push(Instant::now());
            if count == 1 {
                if let Some(control) = hook_slot.get() {
                    control.set_paused(true);
                }
            }
        }));
        let (notifier, rx) = Notifier::channel();
        let mut player = Player::new(backend.clone(), instant_options(false), notifier);
        let _ = control_slot.set(player.control.clone());

        player
            .play(shared(vec![
                Event::Move { x: 1, y: 1, time: 0.0 },
                Event::Move { x: 2, y: 2, time: 0.2 },
            ]))
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        while backend.calls().is_empty() {
            assert!(Instant::now() < deadline, "first event never played");
            std::thread::sleep(Duration::from_millis(1));
        }
        std::thread::sleep(Duration::from_millis(300));
        assert_eq!(player.state(), PlayerState::Paused);
        assert_eq!(backend.calls().len(), 1);
        assert_eq!(player.resume(), Outcome::Applied);

        assert_eq!(wait_finished(&rx), Completion::Finished);
        let times = times.lock();
        assert_eq!(times.len(), 2);
        // 300 ms paused plus the full 200 ms recorded gap
        assert!(times[1] - times[0] >= Duration::from_millis(500));
    }

    #[test]
    fn test_extreme_coordinates_play_through() {
        let backend = Arc::new(FakeBackend::new());
        let (notifier, rx) = Notifier::channel();
        let mut player = Player::new(backend.clone(), smooth_options(), notifier);

        player
            .play(shared(vec![
                Event::Move { x: -100, y: 0, time: 0.0 },
                Event::Move { x: i32::MAX, y: i32::MIN, time: 0.0 },
            ]))
            .unwrap();
        assert_eq!(wait_finished(&rx), Completion::Finished);
        assert_eq!(
            backend.calls().last(),
            Some(&SinkCall::MoveTo(i32::MAX, i32::MIN))
        );
    }

    #[test]
    fn test_worker_panic_reports_failure() {
        let backend = Arc::new(FakeBackend::new().on_call(|_| panic!("sink exploded")));
        let (notifier, rx) = Notifier::channel();
        let mut player = Player::new(backend, instant_options(false), notifier);

        player.play(shared(vec![Event::Move { x: 1, y: 1, time: 0.0 }])).unwrap();
        match wait_finished(&rx) {
            Completion::Failed(reason) => assert!(reason.contains("sink exploded")),
            other => panic!("unexpected completion {:?}", other),
        }
        assert_eq!(player.state(), PlayerState::Stopped);
        assert!(matches!(reap_eventually(&mut player), Completion::Failed(_)));
    }
}
