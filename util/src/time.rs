//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert a duration into a number of seconds, or `None` if the duration
/// overflows when expressed in nanoseconds.
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

/// Number of whole cycles of the given period that fit into one second.
///
/// Used to flag 1 Hz boundaries in fixed rate loops. Always at least 1.
pub fn cycles_per_second(cycle_period_s: f64) -> u64 {
    let n = (1.0 / cycle_period_s).round();

    if n.is_finite() && n >= 1.0 {
        n as u64
    }
    else {
        1
    }
}
