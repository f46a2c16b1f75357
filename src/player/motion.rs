use crate::capture::CursorSink;
use crate::error::ReplayResult;
use crate::player::control::{MotionProfile, PlaybackControl};
use crate::processing::{is_short_hop, linear_path};
use std::time::Duration;

/// Upper bound for the travel time of a replayed move
pub const MAX_MOVE_DURATION: Duration = Duration::from_millis(500);

/// Travel time to the position of a click or scroll before acting
pub const APPROACH_DURATION: Duration = Duration::from_millis(150);

/// Lower bound for the pause between two interpolation steps
pub const MIN_STEP_DELAY: Duration = Duration::from_millis(5);

/// Move the cursor to `target` over roughly `duration`.
///
/// Jumps directly when smoothing is off or the target is within a few pixels.
/// Otherwise walks a straight line in `profile.steps` absolute moves, and
/// stops early (without error) once playback is stopped.
pub fn smooth_move_to(
    sink: &mut dyn CursorSink,
    control: &PlaybackControl,
    target: (i32, i32),
    duration: Duration,
    profile: MotionProfile,
) -> ReplayResult<()> {
    if !profile.smooth {
        return sink.move_to(target.0, target.1);
    }

    let from = sink.position()?;
    if is_short_hop(from, target) {
        return sink.move_to(target.0, target.1);
    }

    let steps = profile.steps.max(1);
    let delay = (duration / steps).max(MIN_STEP_DELAY);

    for (x, y) in linear_path(from, target, steps) {
        if control.is_stopped() {
            break;
        }
        sink.move_to(x, y)?;
        control.sleep(delay);
    }
    Ok(())
}
