//! Resolution of the reporting timezone used for progress timestamps.
//!
//! Only fixed-offset zones are supported, so the table below lists zones that
//! do not observe daylight saving. Explicit `+HH:MM` / `-HH:MM` offsets are
//! also accepted.

use chrono::FixedOffset;

use crate::errors::{EngineError, Result};

const HOUR: i32 = 3600;

const KNOWN_ZONES: &[(&str, i32)] = &[
    ("UTC", 0),
    ("Etc/UTC", 0),
    ("GMT", 0),
    ("Z", 0),
    ("Asia/Seoul", 9 * HOUR),
    ("KST", 9 * HOUR),
    ("Asia/Tokyo", 9 * HOUR),
    ("JST", 9 * HOUR),
    ("Asia/Shanghai", 8 * HOUR),
    ("Asia/Singapore", 8 * HOUR),
    ("Asia/Hong_Kong", 8 * HOUR),
    ("Asia/Kolkata", 5 * HOUR + 1800),
    ("Asia/Dubai", 4 * HOUR),
];

/// Resolve a zone name or explicit offset into a fixed UTC offset.
pub fn resolve_timezone(name: &str) -> Result<FixedOffset> {
    let trimmed = name.trim();
    let seconds = KNOWN_ZONES
        .iter()
        .find(|(zone, _)| zone.eq_ignore_ascii_case(trimmed))
        .map(|(_, offset)| *offset)
        .or_else(|| parse_offset(trimmed));

    seconds
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| EngineError::InvalidTimezone(name.to_string()))
}

fn parse_offset(raw: &str) -> Option<i32> {
    let (sign, rest) = match raw.as_bytes().first().copied()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * HOUR + minutes * 60))
}
