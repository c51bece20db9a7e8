//! Seams between the scheduling core and its collaborators.
//!
//! The core needs a way to build an initial schedule, a fitness function,
//! and somewhere to load and save records; concrete apps pick the
//! implementations.

use crate::error::Result;
use crate::model::{ScoreBreakdown, SchedulerResult, Task, Technician, TechnicianSchedule};

/// Builds a first, constraint-feasible set of routes.
pub trait InitialScheduler {
    fn generate_initial_schedule<'a>(&self, technicians: &'a [Technician], tasks: &[Task]) -> SchedulerResult<'a>;
}

/// Cost of a solution. Lower is better.
///
/// Implementations must be pure: scoring the same routes twice yields the
/// same number, and the routes are never modified.
pub trait Objective {
    fn detailed_score(&self, schedules: &[TechnicianSchedule<'_>]) -> ScoreBreakdown;

    fn score(&self, schedules: &[TechnicianSchedule<'_>]) -> f64 {
        self.detailed_score(schedules).final_weighted_score
    }
}

/// Load/save of a whole record collection.
pub trait Repository<T> {
    fn load(&self) -> Result<Vec<T>>;

    fn save(&self, items: &[T]) -> Result<()>;
}
