//! Formatting helpers shared by the command handlers and summaries.

use chrono::Duration;
use std::path::Path;

/// Format a whole number of minutes the way the duration picker reads it.
///
/// `45` → `45 minutes`, `60` → `1hr`, `150` → `2hrs, 30min`.
pub fn format_duration_minutes(total_minutes: i64) -> String {
    if total_minutes < 60 {
        return format!("{total_minutes} minutes");
    }
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    let hr_units = if hours > 1 { "hrs" } else { "hr" };
    if minutes == 0 {
        format!("{hours}{hr_units}")
    } else {
        format!("{hours}{hr_units}, {minutes}min")
    }
}

/// Compact `Xh Ym` rendering of a duration, truncated to whole minutes.
pub fn format_hours_minutes(duration: Duration) -> String {
    let total_minutes = duration.num_minutes().max(0);
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

/// Render an hours-from-midnight offset as a 12-hour clock time.
///
/// Offsets past 24 wrap onto the next day, so `26.0` renders as `02:00 AM`.
pub fn format_clock_hours(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round() as i64;
    let minutes_of_day = total_minutes.rem_euclid(24 * 60);
    let hour = minutes_of_day / 60;
    let minute = minutes_of_day % 60;
    let (display_hour, meridiem) = match hour {
        0 => (12, "AM"),
        1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        _ => (hour - 12, "PM"),
    };
    format!("{display_hour:02}:{minute:02} {meridiem}")
}

/// Render an allowable clock-time range such as `04:00 PM - 02:00 AM`.
pub fn format_clock_range(start_hours: f64, end_hours: f64) -> String {
    format!(
        "{} - {}",
        format_clock_hours(start_hours),
        format_clock_hours(end_hours)
    )
}

/// Replace the home directory prefix with `~` for display.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        return format!("~/{}", stripped.display());
    }
    path.display().to_string()
}
