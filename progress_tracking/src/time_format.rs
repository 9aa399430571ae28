//! Human-readable durations for progress labels.

use chrono::{DateTime, Utc};

const MINUTES_IN_HOUR: f64 = 60.;
const MINUTES_IN_DAY: f64 = 1440.;
const MINUTES_IN_MONTH: f64 = 43200.;
const MINUTES_IN_TWO_MONTHS: f64 = 86400.;

/// "1 minute", otherwise "N minutes" (including "0 minutes").
pub fn minutes_label(minutes: u64) -> String {
    plural(minutes, "minute")
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Whole minutes needed to cover `seconds`, rounded up.
pub fn seconds_to_minutes_ceil(seconds: f64) -> u64 {
    if seconds <= 0. {
        0
    } else {
        (seconds / 60.).ceil() as u64
    }
}

/// Approximate distance between `target` and `now` in words, with a direction suffix:
/// "in 5 minutes", "about 2 hours ago", "in less than a minute".
pub fn format_distance(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta_seconds = (target - now).num_seconds();
    let distance = distance_in_words(delta_seconds.unsigned_abs());
    if delta_seconds >= 0 {
        format!("in {distance}")
    } else {
        format!("{distance} ago")
    }
}

/// The distance in words for an absolute number of seconds.
pub fn distance_in_words(seconds: u64) -> String {
    let minutes = (seconds as f64 / 60.).round();

    if minutes < 1. {
        "less than a minute".to_owned()
    } else if minutes < 45. {
        minutes_label(minutes as u64)
    } else if minutes < 90. {
        "about 1 hour".to_owned()
    } else if minutes < MINUTES_IN_DAY {
        let hours = (minutes / MINUTES_IN_HOUR).round() as u64;
        format!("about {}", plural(hours, "hour"))
    } else if minutes < 2520. {
        "1 day".to_owned()
    } else if minutes < MINUTES_IN_MONTH {
        let days = (minutes / MINUTES_IN_DAY).round() as u64;
        plural(days, "day")
    } else if minutes < MINUTES_IN_TWO_MONTHS {
        let months = (minutes / MINUTES_IN_MONTH).round() as u64;
        format!("about {}", plural(months, "month"))
    } else {
        let months = (minutes / MINUTES_IN_MONTH).floor() as u64;
        if months < 12 {
            plural((minutes / MINUTES_IN_MONTH).round() as u64, "month")
        } else {
            let years = months / 12;
            match months % 12 {
                0..=2 => format!("about {}", plural(years, "year")),
                3..=8 => format!("over {}", plural(years, "year")),
                _ => format!("almost {}", plural(years + 1, "year")),
            }
        }
    }
}
