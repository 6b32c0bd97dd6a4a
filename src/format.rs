//! Display formatting for insight values
//!
//! These renderings are part of the observable output: the presentation
//! layer shows them verbatim.

/// Render minutes as `"{H}h {M}m"`
///
/// Minutes are dropped when zero (`"8h"`); hours are dropped under an
/// hour (`"45m"`). Input is rounded to the nearest whole minute.
pub fn format_duration_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    let hours = total / 60;
    let mins = total % 60;

    match (hours, mins) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Render seconds using [`format_duration_minutes`]
pub fn format_duration_seconds(seconds: f64) -> String {
    format_duration_minutes(seconds / 60.0)
}

/// Render a ratio (0.93) as a rounded percentage (`"93%"`)
pub fn format_percent(ratio: f64) -> String {
    format!("{}%", (ratio * 100.0).round() as i64)
}

/// Heart rate in beats per minute
pub fn format_bpm(value: f64) -> String {
    format!("{} bpm", value.round() as i64)
}

/// HRV in milliseconds
pub fn format_ms(value: f64) -> String {
    format!("{} ms", value.round() as i64)
}

/// Join two rendered bounds as `"{lower} - {upper}"`
pub fn format_range(lower: &str, upper: &str) -> String {
    format!("{} - {}", lower, upper)
}
