//! Display helpers for a countdown.

/// Render seconds as `MM:SS`.
///
/// Minutes are not wrapped into hours, so an hour-long session shows `60:00`.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Elapsed fraction of a session, 0.0 ..= 1.0.
pub fn progress(duration: u64, time_left: u64) -> f64 {
    if duration == 0 {
        return 0.0;
    }
    let elapsed = duration.saturating_sub(time_left);
    (elapsed as f64 / duration as f64).min(1.0)
}
