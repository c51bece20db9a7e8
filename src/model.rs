//! Planner data model: tasks, technicians, per-run schedules and scores.
//!
//! Tasks never hold a reference to their technician; the assignment is an
//! id, resolved through the schedule that owns the task during a run.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::error::{PlannerError, Result};

pub type TaskId = u32;
pub type TechnicianId = u32;

/// Bitmask of capabilities a technician holds or a task requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(u32);

impl SkillSet {
    pub const NONE: SkillSet = SkillSet(0);
    pub const GENERAL: SkillSet = SkillSet(1 << 0);
    pub const ELECTRIC: SkillSet = SkillSet(1 << 1);
    pub const PLUMBING: SkillSet = SkillSet(1 << 2);
    pub const NETWORKING: SkillSet = SkillSet(1 << 3);
    pub const HVAC: SkillSet = SkillSet(1 << 4);
    pub const ALL: SkillSet = SkillSet(0b1_1111);

    const NAMED: [(&'static str, SkillSet); 5] = [
        ("general", SkillSet::GENERAL),
        ("electric", SkillSet::ELECTRIC),
        ("plumbing", SkillSet::PLUMBING),
        ("networking", SkillSet::NETWORKING),
        ("hvac", SkillSet::HVAC),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        SkillSet(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True when every bit of `required` is held.
    pub const fn contains(self, required: SkillSet) -> bool {
        self.0 & required.0 == required.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for SkillSet {
    type Output = SkillSet;

    fn bitor(self, rhs: SkillSet) -> SkillSet {
        SkillSet(self.0 | rhs.0)
    }
}

impl BitOrAssign for SkillSet {
    fn bitor_assign(&mut self, rhs: SkillSet) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for SkillSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = Self::NAMED
            .iter()
            .filter(|(_, skill)| self.contains(*skill))
            .map(|(name, _)| *name)
            .collect();
        f.write_str(&names.join(","))
    }
}

impl FromStr for SkillSet {
    type Err = PlannerError;

    /// Accepts `"electric,plumbing"`, `"all"`, `"none"` or a raw bitmask.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Ok(bits) = s.trim().parse::<u32>() {
            return Ok(SkillSet(bits));
        }
        let mut skills = SkillSet::NONE;
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let lower = part.to_ascii_lowercase();
            match lower.as_str() {
                "all" => skills |= SkillSet::ALL,
                "none" => {}
                _ => {
                    let (_, skill) = Self::NAMED
                        .iter()
                        .find(|(name, _)| *name == lower)
                        .ok_or_else(|| PlannerError::UnknownSkill(part.to_string()))?;
                    skills |= *skill;
                }
            }
        }
        Ok(skills)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Regular,
    High,
    Urgent,
}

impl FromStr for TaskPriority {
    type Err = PlannerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "regular" => Ok(TaskPriority::Regular),
            "high" => Ok(TaskPriority::High),
            "urgent" => Ok(TaskPriority::Urgent),
            _ => Err(PlannerError::UnknownPriority(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    Scheduled,
    Completed,
    Canceled,
}

/// A unit of field work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: TaskId,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub required_skills: SkillSet,
    #[serde(default)]
    pub priority: TaskPriority,
    /// Service duration in seconds.
    #[serde(default, with = "clock::hhmm")]
    pub duration: i32,
    #[serde(default, with = "clock::hhmm_opt", skip_serializing_if = "Option::is_none")]
    pub window_start: Option<i32>,
    #[serde(default, with = "clock::hhmm_opt", skip_serializing_if = "Option::is_none")]
    pub window_end: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_technician_id: Option<TechnicianId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_index: Option<u32>,
    #[serde(default, with = "clock::hhmm_opt", skip_serializing_if = "Option::is_none")]
    pub actual_start_time: Option<i32>,
    #[serde(default, with = "clock::hhmm_opt", skip_serializing_if = "Option::is_none")]
    pub actual_end_time: Option<i32>,
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    pub fn new(id: TaskId, client_name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            client_name: client_name.into(),
            address: String::new(),
            latitude,
            longitude,
            required_skills: SkillSet::NONE,
            priority: TaskPriority::Regular,
            duration: 0,
            window_start: None,
            window_end: None,
            assigned_technician_id: None,
            sequence_index: None,
            actual_start_time: None,
            actual_end_time: None,
            status: TaskStatus::Pending,
        }
    }

    pub fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Tasks that still need a slot; finished or cancelled work is left alone.
    pub fn is_plannable(&self) -> bool {
        matches!(self.status, TaskStatus::Pending | TaskStatus::Scheduled)
    }

    /// Check the time fields are times of day and the window is ordered.
    pub fn validate(&self) -> Result<()> {
        if !within_day(self.duration) {
            return Err(PlannerError::InvalidDuration(clock::format(self.duration)));
        }
        let window_error = || PlannerError::InvalidTimeWindow {
            start: self.window_start.map_or_else(|| "any".to_string(), clock::format),
            end: self.window_end.map_or_else(|| "any".to_string(), clock::format),
        };
        if !self.window_start.is_none_or(within_day) || !self.window_end.is_none_or(within_day) {
            return Err(window_error());
        }
        if let (Some(start), Some(end)) = (self.window_start, self.window_end) {
            if start > end {
                return Err(window_error());
            }
        }
        Ok(())
    }

    /// Drop any scheduling output left from an earlier run.
    pub fn clear_assignment(&mut self) {
        self.assigned_technician_id = None;
        self.sequence_index = None;
        self.actual_start_time = None;
        self.actual_end_time = None;
        self.status = TaskStatus::Pending;
    }
}

fn within_day(seconds: i32) -> bool {
    (0..=clock::SECONDS_PER_DAY).contains(&seconds)
}

fn default_skills() -> SkillSet {
    SkillSet::ALL
}

fn default_capacity() -> u32 {
    1
}

/// A mobile worker with a base, a skill set and a daily shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technician {
    #[serde(default)]
    pub id: TechnicianId,
    pub name: String,
    pub base_latitude: f64,
    pub base_longitude: f64,
    #[serde(default = "default_skills")]
    pub skills: SkillSet,
    #[serde(with = "clock::hhmm")]
    pub shift_start: i32,
    #[serde(with = "clock::hhmm")]
    pub shift_end: i32,
    /// Average travel speed in km/h.
    pub travel_speed_kmh: f64,
    #[serde(default)]
    pub hourly_cost: f64,
    /// Declared capacity; every technician is planned one task at a time.
    #[serde(default = "default_capacity")]
    pub max_concurrent_tasks: u32,
}

impl Technician {
    pub fn new(id: TechnicianId, name: impl Into<String>, base_latitude: f64, base_longitude: f64) -> Self {
        Self {
            id,
            name: name.into(),
            base_latitude,
            base_longitude,
            skills: SkillSet::ALL,
            shift_start: clock::hours(8),
            shift_end: clock::hours(17),
            travel_speed_kmh: 40.0,
            hourly_cost: 0.0,
            max_concurrent_tasks: 1,
        }
    }

    pub fn base_location(&self) -> (f64, f64) {
        (self.base_latitude, self.base_longitude)
    }

    /// Shift bounds must be times of day with the end after the start.
    pub fn validate(&self) -> Result<()> {
        if within_day(self.shift_start) && within_day(self.shift_end) && self.shift_end > self.shift_start {
            return Ok(());
        }
        Err(PlannerError::InvalidShift {
            start: clock::format(self.shift_start),
            end: clock::format(self.shift_end),
        })
    }

    pub fn has_skill(&self, required: SkillSet) -> bool {
        self.skills.contains(required)
    }

    /// Skill match plus a speed that can actually get the technician there.
    pub fn can_perform(&self, task: &Task) -> bool {
        self.has_skill(task.required_skills) && self.travel_speed_kmh.is_finite() && self.travel_speed_kmh > 0.0
    }
}

/// One technician's route for one date.
///
/// `tasks` are working copies in visiting order; the canonical task records
/// only change when the schedule is committed.
#[derive(Debug, Clone)]
pub struct TechnicianSchedule<'a> {
    pub technician: &'a Technician,
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
    pub total_distance_km: f64,
}

impl<'a> TechnicianSchedule<'a> {
    pub fn new(technician: &'a Technician, date: NaiveDate) -> Self {
        Self {
            technician,
            date,
            tasks: Vec::new(),
            total_distance_km: 0.0,
        }
    }

    pub fn technician_id(&self) -> TechnicianId {
        self.technician.id
    }

    pub fn task_ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|task| task.id).collect()
    }
}

/// Output of the greedy construction phase.
#[derive(Debug, Clone)]
pub struct SchedulerResult<'a> {
    pub schedules: Vec<TechnicianSchedule<'a>>,
    pub unscheduled: Vec<Task>,
}

/// Labelled cost terms of a solution. Always derived by replaying routes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub total_travel_minutes: f64,
    pub total_distance_km: f64,
    pub total_delay_minutes: f64,
    pub total_waiting_minutes: f64,
    pub completed_urgent_tasks: u32,
    pub missed_urgent_tasks: u32,
    pub overtime_hours: f64,
    pub working_hours: f64,
    pub unreachable_stops: u32,
    pub final_weighted_score: f64,
}
