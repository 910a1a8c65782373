/// Countdown below this many seconds is rendered as urgent.
pub const LOW_TIME_SECONDS: u32 = 60;

/// Formats a countdown as `M:SS` (minutes unpadded, no hour component).
#[must_use]
pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[must_use]
pub fn is_low_time(seconds: u32) -> bool {
    seconds < LOW_TIME_SECONDS
}
