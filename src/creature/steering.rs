//! Acceleration-limited speed control shared by movement and turning.
//!
//! Speeds change by `max * acceleration` per tick. A body brakes once the
//! remaining distance (or angle) is within its stopping distance
//! `v² / (2 · acceleration · max)`.

pub fn stopping_distance(speed: f32, max_speed: f32, acceleration: f32) -> f32 {
    (speed * speed) / (2.0 * acceleration * max_speed)
}

/// Speed for the next tick given how far is left to go.
pub fn next_speed(speed: f32, max_speed: f32, acceleration: f32, remaining: f32) -> f32 {
    let delta = max_speed * acceleration;
    if remaining <= stopping_distance(speed, max_speed, acceleration) {
        (speed - delta).max(0.0)
    } else {
        (speed + delta).min(max_speed)
    }
}
