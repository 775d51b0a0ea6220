use chrono::{DateTime, Local, Utc};
use ratatui::style::Color;
use std::time::Duration;

pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

/// Shortens `s` to at most `max_chars` characters, ending in `...` when cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 3 {
        return s.chars().take(max_chars).collect();
    }
    let kept: String = s.chars().take(max_chars - 3).collect();
    format!("{}...", kept)
}

pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    if duration.is_zero() {
        return "-".to_string();
    }

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Renders a vendor timestamp in local time. The pattern was checked at config load.
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>, pattern: &str) -> String {
    match timestamp {
        Some(ts) => ts.with_timezone(&Local).format(pattern).to_string(),
        None => "-".to_string(),
    }
}

/// Icon for any vendor status string: build status or result, environment status,
/// or pull request display status.
pub fn status_symbol(status: &str) -> &'static str {
    match status {
        "succeeded" | "completed" => "✓",
        "failed" | "rejected" | "canceled" | "abandoned" | "conflicts" => "✗",
        "inProgress" | "cancelling" | "active" => "●",
        "queued" | "scheduled" | "notStarted" | "postponed" | "draft" => "○",
        "partiallySucceeded" => "◐",
        _ => "-",
    }
}

pub fn status_color(status: &str) -> Color {
    match status {
        "succeeded" | "completed" => Color::Green,
        "failed" | "rejected" | "conflicts" => Color::Red,
        "inProgress" | "cancelling" | "active" => Color::Yellow,
        "partiallySucceeded" => Color::LightYellow,
        "queued" | "scheduled" | "notStarted" | "postponed" => Color::Blue,
        "canceled" | "abandoned" | "draft" => Color::DarkGray,
        _ => Color::Gray,
    }
}
