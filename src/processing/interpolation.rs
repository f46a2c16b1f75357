//! Linear cursor paths for smooth playback
//!
//! Playback does not teleport the cursor between recorded points. It walks a
//! straight line in a fixed number of steps, each step one absolute move.

/// Default number of intermediate positions per smooth move
pub const DEFAULT_MOVE_STEPS: u32 = 20;

/// Below this distance on both axes the cursor jumps directly
pub const MIN_SMOOTH_DISTANCE: i32 = 5;

/// Whether the move from `from` to `to` is short enough to jump directly
pub fn is_short_hop(from: (i32, i32), to: (i32, i32)) -> bool {
    let limit = i64::from(MIN_SMOOTH_DISTANCE);
    (i64::from(to.0) - i64::from(from.0)).abs() < limit
        && (i64::from(to.1) - i64::from(from.1)).abs() < limit
}

fn lerp(from: i32, to: i32, progress: f64) -> i32 {
    let delta = (f64::from(to) - f64::from(from)) * progress;
    let position = f64::from(from) + delta.trunc();
    // Saturating cast keeps positions within i32
    position as i32
}

/// Positions visited when walking from `from` to `to` in `steps` steps.
///
/// Yields `current + (target - current) * i / steps` for `i` in `1..=steps`,
/// truncated toward zero, so the last position is always `to`. A step count
/// of zero is treated as one.
pub fn linear_path(
    from: (i32, i32),
    to: (i32, i32),
    steps: u32,
) -> impl Iterator<Item = (i32, i32)> {
    let steps = steps.max(1);

    (1..=steps).map(move |i| {
        if i == steps {
            return to;
        }
        let progress = f64::from(i) / f64::from(steps);
        (lerp(from.0, to.0, progress), lerp(from.1, to.1, progress))
    })
}
