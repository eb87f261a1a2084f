//! Display formatting for time and volume labels

/// Format seconds as `m:ss`.
///
/// Minutes are not wrapped into hours, so an hour-long video ends at `60:00`.
/// Negative and non-finite inputs render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Format a 0-100 volume value as a whole percentage
pub fn format_volume(volume: f64) -> String {
    let percent = if volume.is_finite() { volume.floor() } else { 0.0 };
    format!("{}%", percent as i64)
}
