//! Default value functions for serde deserialization.

/// Average indoor walking speed.
pub fn walking_speed_mps() -> f32 {
    1.4
}

/// Time added for every intermediate node on a route.
pub fn intermediate_overhead_s() -> f32 {
    30.0
}

/// Floor for every route duration, including same-location routes.
pub fn min_duration_s() -> f32 {
    60.0
}

pub fn edge_penalty() -> f32 {
    3.0
}

pub fn similarity_threshold() -> f32 {
    0.7
}

pub fn max_attempts_per_path() -> usize {
    3
}

pub fn minor_threshold_m() -> f32 {
    50.0
}

pub fn moderate_threshold_m() -> f32 {
    200.0
}

pub fn command_timeout_ms() -> u64 {
    2000
}
