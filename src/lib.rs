//! fsm-planner: field-service dispatch
//!
//! Assigns repair and installation tasks to mobile technicians with a greedy
//! constructor, then refines the routes with simulated annealing against a
//! weighted travel/lateness/waiting/overtime objective.

pub mod annealing;
pub mod break_time;
pub mod clock;
pub mod commit;
pub mod config;
pub mod error;
pub mod greedy;
pub mod haversine;
pub mod model;
pub mod objective;
pub mod repository;
pub mod service;
pub mod timeline;
pub mod traits;

pub use error::{PlannerError, Result};
