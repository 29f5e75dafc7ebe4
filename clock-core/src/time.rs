//! Time utilities: wall-clock "HH:MM" strings and minutes since midnight.
//!
//! Everything here is local wall-clock time. There is no timezone handling;
//! callers pass whatever `Timelike` value they consider "now".

use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::Timelike;
use regex::Regex;

pub const MINUTES_PER_DAY: i32 = 24 * 60;

static HH_MM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("static regex"));

/// Parse a time like "07:05" into minutes since midnight (425).
///
/// The editor only ever produces two-digit `HH:MM`, so anything else is a
/// caller bug and fails loudly instead of producing a nonsense angle.
pub fn parse_time_to_minutes(s: &str) -> Result<i32> {
    let caps = HH_MM
        .captures(s.trim())
        .with_context(|| format!("invalid time '{s}': expected HH:MM (00:00-23:59)"))?;

    let hours: i32 = caps[1].parse().with_context(|| format!("invalid hour in '{s}'"))?;
    let minutes: i32 = caps[2].parse().with_context(|| format!("invalid minute in '{s}'"))?;

    Ok(hours * 60 + minutes)
}

/// Minutes since midnight of `now`, seconds discarded.
pub fn minutes_since_midnight<T: Timelike>(now: &T) -> i32 {
    (now.hour() * 60 + now.minute()) as i32
}

/// Seconds past the current minute. Only used for sub-minute progress.
pub fn seconds_of_minute<T: Timelike>(now: &T) -> u32 {
    now.second()
}

/// Format minutes since midnight as "HH:MM", wrapping past midnight.
pub fn format_minutes(minutes: i32) -> String {
    let m = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", m / 60, m % 60)
}
