//! Human-facing formatting shared by the TUI and the plain CLI output.

use chrono::{DateTime, Local, Utc};

/// Shown when a posting carries no location
pub const LOCATION_FALLBACK: &str = "Location not specified";
/// Shown when a posting carries no category
pub const CATEGORY_FALLBACK: &str = "Other";
/// Shown when a timestamp is missing
pub const TIMESTAMP_FALLBACK: &str = "Unknown";

/// Day-granularity age label: "Today", "Yesterday", "3 days ago",
/// "2 weeks ago", then an absolute date once it gets old.
pub fn relative_day_label(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(ts) = timestamp else {
        return TIMESTAMP_FALLBACK.to_string();
    };
    let days = (now - ts).num_days().abs();
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d if d < 7 => format!("{d} days ago"),
        d if d < 30 => format!("{} weeks ago", d / 7),
        _ => ts.with_timezone(&Local).format("%Y-%m-%d").to_string(),
    }
}

/// Minute-granularity age label for status lines: "Just now",
/// "5 minutes ago", "3 hours ago", "2 days ago", then an absolute stamp.
/// Distance is absolute, so a slightly-future timestamp reads the same as
/// a slightly-past one instead of going negative.
pub fn relative_time_label(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(ts) = timestamp else {
        return TIMESTAMP_FALLBACK.to_string();
    };
    let elapsed = now - ts;
    let minutes = elapsed.num_minutes().abs();
    let hours = elapsed.num_hours().abs();
    let days = elapsed.num_days().abs();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{} minute{} ago", minutes, if minutes == 1 { "" } else { "s" })
    } else if hours < 24 {
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if days < 7 {
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Turn a raw category slug into a title: "software_engineering" becomes
/// "Software Engineering", and a missing category becomes "Other"
pub fn format_category(category: Option<&str>) -> String {
    let Some(category) = category else {
        return CATEGORY_FALLBACK.to_string();
    };
    if category.is_empty() {
        return CATEGORY_FALLBACK.to_string();
    }
    category
        .split('_')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Location with the fallback applied
pub fn display_location(location: Option<&str>) -> String {
    match location {
        Some(location) if !location.is_empty() => sanitize_text(location),
        _ => LOCATION_FALLBACK.to_string(),
    }
}

/// Strip control characters out of server-supplied text before it reaches
/// the terminal. Escape sequences embedded in a job title must render as
/// plain text, not restyle the screen.
pub fn sanitize_text(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
