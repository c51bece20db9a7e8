//! Test fixtures for fsm-planner.
//!
//! Provides realistic test data including:
//! - Real central-Israel locations (technician bases and client sites)
//! - Builders for tasks and technicians with sensible defaults

#![allow(dead_code)]

pub mod israel_locations;

pub use israel_locations::*;

use chrono::NaiveDate;

use fsm_planner::clock::{hours, minutes};
use fsm_planner::model::{SkillSet, Task, TaskPriority, Technician};

pub fn service_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

/// Builder for test tasks.
#[derive(Clone, Debug)]
pub struct TaskBuilder(Task);

impl TaskBuilder {
    pub fn new(id: u32) -> Self {
        let mut task = Task::new(id, format!("client-{id}"), 0.0, 0.0);
        task.duration = minutes(30);
        task.required_skills = SkillSet::GENERAL;
        Self(task)
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.0.latitude = lat;
        self.0.longitude = lng;
        self
    }

    pub fn located(self, location: &Location) -> Self {
        let mut built = self.at(location.lat, location.lng);
        built.0.client_name = location.name.to_string();
        built
    }

    pub fn requires(mut self, skills: SkillSet) -> Self {
        self.0.required_skills = skills;
        self
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.0.priority = priority;
        self
    }

    pub fn duration(mut self, seconds: i32) -> Self {
        self.0.duration = seconds;
        self
    }

    pub fn window(mut self, start: i32, end: i32) -> Self {
        self.0.window_start = Some(start);
        self.0.window_end = Some(end);
        self
    }

    pub fn build(self) -> Task {
        self.0
    }
}

/// Builder for test technicians.
#[derive(Clone, Debug)]
pub struct TechnicianBuilder(Technician);

impl TechnicianBuilder {
    pub fn new(id: u32) -> Self {
        let mut technician = Technician::new(id, format!("tech-{id}"), 0.0, 0.0);
        technician.skills = SkillSet::ALL;
        technician.shift_start = hours(8);
        technician.shift_end = hours(17);
        technician.travel_speed_kmh = 60.0;
        Self(technician)
    }

    pub fn based_at(mut self, lat: f64, lng: f64) -> Self {
        self.0.base_latitude = lat;
        self.0.base_longitude = lng;
        self
    }

    pub fn skills(mut self, skills: SkillSet) -> Self {
        self.0.skills = skills;
        self
    }

    pub fn shift(mut self, start: i32, end: i32) -> Self {
        self.0.shift_start = start;
        self.0.shift_end = end;
        self
    }

    pub fn speed(mut self, kmh: f64) -> Self {
        self.0.travel_speed_kmh = kmh;
        self
    }

    pub fn build(self) -> Technician {
        self.0
    }
}
