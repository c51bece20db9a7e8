//! Mandatory break arithmetic.
//!
//! Every technician takes one fixed break per day, `[start, end)`. Nothing
//! advances a technician's clock without going through these functions, so
//! greedy assignment, scoring and commit agree on the same timeline.

use serde::{Deserialize, Serialize};

use crate::clock::{self, hours};
use crate::error::{PlannerError, Result};

/// Fixed daily break window, seconds from midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakWindow {
    #[serde(with = "clock::hhmm")]
    pub start: i32,
    #[serde(with = "clock::hhmm")]
    pub end: i32,
}

impl Default for BreakWindow {
    fn default() -> Self {
        Self {
            start: hours(13),
            end: hours(14),
        }
    }
}

impl BreakWindow {
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if end < start {
            return Err(PlannerError::Config(format!(
                "break end {} is before break start {}",
                clock::format(end),
                clock::format(start)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn duration(&self) -> i32 {
        self.end - self.start
    }

    /// Jump to the end of the break if `time` falls inside it.
    pub fn adjust_for_break(&self, time: i32) -> i32 {
        if time >= self.start && time < self.end {
            self.end
        } else {
            time
        }
    }

    /// Place an activity of `duration` starting at `start`.
    ///
    /// An activity that would straddle the break start is moved wholesale
    /// to begin at the break end. Returns the effective `(start, end)`.
    pub fn schedule_activity(&self, start: i32, duration: i32) -> (i32, i32) {
        let end = start.saturating_add(duration);
        if end <= self.start {
            return (start, end);
        }
        if start < self.start && end > self.start {
            return (self.end, self.end.saturating_add(duration));
        }
        (start, end)
    }

    /// End time of an activity, pushed past the break if it would straddle it.
    pub fn end_time_with_break(&self, start: i32, duration: i32) -> i32 {
        self.schedule_activity(start, duration).1
    }

    /// Advance `current` by `delta` (travel), skipping over the break.
    pub fn add_time_with_break(&self, current: i32, delta: i32) -> i32 {
        let current = self.adjust_for_break(current);
        let projected = current.saturating_add(delta);
        if current < self.start && projected > self.start {
            projected.saturating_add(self.duration())
        } else {
            projected
        }
    }

    /// Elapsed time between `start` and `end` that is not break.
    pub fn working_duration(&self, start: i32, end: i32) -> i32 {
        let total = end.saturating_sub(start);
        if start < self.end && end > self.start {
            total.saturating_sub(self.duration())
        } else {
            total
        }
    }
}
