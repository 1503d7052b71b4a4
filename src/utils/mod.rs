//! Presentation helpers.

/// Converts a remaining lifetime in hours to whole days.
///
/// Truncates toward zero, so an expired certificate yields a negative or zero
/// day count.
pub fn days_remaining(hours: f64) -> i64 {
    (hours / 24.0) as i64
}
