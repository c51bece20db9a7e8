//! Time-of-day helpers.
//!
//! All times in the planner are whole seconds since midnight of the schedule
//! date. At the serialisation boundary they are written as `"HH:MM"` (or
//! `"HH:MM:SS"` when seconds are present). A route that runs past midnight
//! produces values chrono cannot express as a `NaiveTime`; those are written
//! as plain integers. Both forms are accepted when reading.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::{PlannerError, Result};

pub const SECONDS_PER_DAY: i32 = 24 * 3600;

pub const fn hours(h: i32) -> i32 {
    h * 3600
}

pub const fn minutes(m: i32) -> i32 {
    m * 60
}

/// Parse `"HH:MM"` or `"HH:MM:SS"` into seconds since midnight.
pub fn parse(text: &str) -> Result<i32> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .map(|t| t.num_seconds_from_midnight() as i32)
        .map_err(|_| PlannerError::InvalidClock(text.to_string()))
}

/// Format seconds since midnight for display.
///
/// Hours are not wrapped at 24, so overtime past midnight reads as `25:10`.
pub fn format(seconds: i32) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let total = seconds.unsigned_abs();
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if s == 0 {
        format!("{sign}{h:02}:{m:02}")
    } else {
        format!("{sign}{h:02}:{m:02}:{s:02}")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawClock {
    Seconds(i32),
    Text(String),
}

impl RawClock {
    fn into_seconds<E: serde::de::Error>(self) -> std::result::Result<i32, E> {
        match self {
            RawClock::Seconds(s) => Ok(s),
            RawClock::Text(text) => parse(&text).map_err(E::custom),
        }
    }
}

fn serialize_seconds<S: Serializer>(seconds: i32, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if (0..SECONDS_PER_DAY).contains(&seconds) {
        serializer.serialize_str(&format(seconds))
    } else {
        serializer.serialize_i32(seconds)
    }
}

/// Serde adapter for a required time-of-day field.
pub mod hhmm {
    use super::*;

    pub fn serialize<S: Serializer>(value: &i32, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_seconds(*value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i32, D::Error> {
        RawClock::deserialize(deserializer)?.into_seconds()
    }
}

/// Serde adapter for an optional time-of-day field.
pub mod hhmm_opt {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<i32>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match value {
            Some(seconds) => serialize_seconds(*seconds, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<i32>, D::Error> {
        Option::<RawClock>::deserialize(deserializer)?
            .map(RawClock::into_seconds)
            .transpose()
    }
}
