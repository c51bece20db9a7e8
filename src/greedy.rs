//! Greedy construction of the initial routes.
//!
//! Tasks are taken most-urgent first and each one is appended to the
//! qualified technician who can reach it with the least travel while still
//! finishing inside the shift and becoming ready inside the task's window. Earlier
//! decisions are never revisited; that is the optimizer's job.

use std::cmp::Ordering;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::break_time::BreakWindow;
use crate::model::{SchedulerResult, Task, TaskStatus, Technician, TechnicianSchedule};
use crate::timeline::{next_stop, Stop};
use crate::traits::InitialScheduler;

#[derive(Debug, Clone)]
pub struct GreedyScheduler {
    date: NaiveDate,
    breaks: BreakWindow,
}

impl GreedyScheduler {
    pub fn new(date: NaiveDate, breaks: BreakWindow) -> Self {
        Self { date, breaks }
    }

    /// Where and when this schedule's technician becomes free.
    fn tail(schedule: &TechnicianSchedule<'_>) -> (i32, (f64, f64)) {
        match schedule.tasks.last() {
            Some(last) => (
                last.actual_end_time.unwrap_or(schedule.technician.shift_start),
                last.location(),
            ),
            None => (schedule.technician.shift_start, schedule.technician.base_location()),
        }
    }

    /// Timing of `task` appended to `schedule`, if it respects every hard constraint.
    fn feasible_stop(&self, schedule: &TechnicianSchedule<'_>, task: &Task) -> Option<Stop> {
        let technician = schedule.technician;
        if !technician.has_skill(task.required_skills) {
            return None;
        }

        let (clock, position) = Self::tail(schedule);
        let stop = next_stop(technician, &self.breaks, clock, position, task);

        if !stop.reachable {
            return None;
        }
        // Shift over
        if stop.end > technician.shift_end {
            return None;
        }
        // Window missed; a start pushed only by the break still counts as on time
        if task.window_end.is_some_and(|window_end| stop.ready > window_end) {
            return None;
        }
        Some(stop)
    }
}

/// Priority descending, then earliest window end; tasks without an end go last.
fn dispatch_order(a: &Task, b: &Task) -> Ordering {
    b.priority.cmp(&a.priority).then_with(|| match (a.window_end, b.window_end) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

impl InitialScheduler for GreedyScheduler {
    fn generate_initial_schedule<'a>(&self, technicians: &'a [Technician], tasks: &[Task]) -> SchedulerResult<'a> {
        let mut schedules: Vec<TechnicianSchedule<'a>> = technicians
            .iter()
            .map(|technician| TechnicianSchedule::new(technician, self.date))
            .collect();
        let mut unscheduled = Vec::new();

        let mut ordered: Vec<Task> = tasks.to_vec();
        ordered.sort_by(dispatch_order);

        for mut task in ordered {
            let mut best: Option<(usize, Stop)> = None;

            for (index, schedule) in schedules.iter().enumerate() {
                let Some(stop) = self.feasible_stop(schedule, &task) else {
                    continue;
                };
                let closer = best
                    .as_ref()
                    .is_none_or(|(_, current)| stop.distance_km < current.distance_km);
                if closer {
                    best = Some((index, stop));
                }
            }

            match best {
                Some((index, stop)) => {
                    let schedule = &mut schedules[index];
                    task.assigned_technician_id = Some(schedule.technician.id);
                    task.sequence_index = None;
                    task.actual_start_time = Some(stop.start);
                    task.actual_end_time = Some(stop.end);
                    task.status = TaskStatus::Scheduled;
                    schedule.total_distance_km += stop.distance_km;
                    schedule.tasks.push(task);
                }
                None => {
                    debug!(task_id = task.id, "no qualified technician can fit task");
                    task.clear_assignment();
                    unscheduled.push(task);
                }
            }
        }

        if !unscheduled.is_empty() {
            warn!(count = unscheduled.len(), "tasks left unscheduled after greedy assignment");
        }

        SchedulerResult { schedules, unscheduled }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::hours;
    use crate::model::TaskPriority;

    #[test]
    fn test_dispatch_order_priority_then_window_end() {
        let mut urgent = Task::new(1, "urgent", 0.0, 0.0);
        urgent.priority = TaskPriority::Urgent;
        let mut early = Task::new(2, "early", 0.0, 0.0);
        early.window_end = Some(hours(10));
        let mut late = Task::new(3, "late", 0.0, 0.0);
        late.window_end = Some(hours(15));
        let open = Task::new(4, "open", 0.0, 0.0);

        let mut tasks = vec![open, late, early, urgent];
        tasks.sort_by(dispatch_order);
        let ids: Vec<u32> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }
}
