//! Error type for the planner's boundary layers.
//!
//! The scheduling core never fails: infeasible tasks end up unscheduled and
//! cancellation returns the best solution so far. Errors only come from
//! persistence, configuration and input parsing.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("time window start {start} is after end {end}")]
    InvalidTimeWindow { start: String, end: String },

    #[error("task duration {0} is outside 00:00..=24:00")]
    InvalidDuration(String),

    #[error("shift end {end} must be after shift start {start}")]
    InvalidShift { start: String, end: String },

    #[error("invalid time of day '{0}' (expected HH:MM or HH:MM:SS)")]
    InvalidClock(String),

    #[error("unknown skill '{0}'")]
    UnknownSkill(String),

    #[error("unknown priority '{0}'")]
    UnknownPriority(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
