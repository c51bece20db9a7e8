//! Write an optimized solution back onto the canonical task records.
//!
//! The optimizer only reorders working copies. Commit replays every route
//! once more from shift start and stamps the authoritative assignment,
//! sequence and timing onto the real tasks, matched by id.

use std::collections::HashMap;

use tracing::debug;

use crate::break_time::BreakWindow;
use crate::model::{Task, TaskId, TaskStatus, TechnicianSchedule};
use crate::timeline::replay;

/// Apply `schedules` to `tasks`. Returns the number of tasks committed.
///
/// Route entries whose id has no canonical record are skipped.
pub fn commit_schedules(schedules: &[TechnicianSchedule<'_>], tasks: &mut [Task], breaks: &BreakWindow) -> usize {
    let index: HashMap<TaskId, usize> = tasks.iter().enumerate().map(|(i, task)| (task.id, i)).collect();
    let mut committed = 0;

    for schedule in schedules {
        let timeline = replay(schedule.technician, &schedule.tasks, breaks);

        for (sequence, stop) in timeline.stops.iter().enumerate() {
            let Some(&position) = index.get(&stop.task_id) else {
                debug!(task_id = stop.task_id, "route references unknown task, skipping");
                continue;
            };
            let task = &mut tasks[position];
            task.assigned_technician_id = Some(schedule.technician.id);
            task.sequence_index = Some(sequence as u32 + 1);
            task.actual_start_time = Some(stop.start);
            task.actual_end_time = Some(stop.end);
            task.status = TaskStatus::Scheduled;
            committed += 1;
        }
    }

    committed
}

/// Reset tasks nobody could take back to `Pending` with no assignment.
pub fn release_unscheduled(unscheduled: &[Task], tasks: &mut [Task]) -> usize {
    let mut released = 0;
    for leftover in unscheduled {
        if let Some(task) = tasks.iter_mut().find(|task| task.id == leftover.id) {
            task.clear_assignment();
            released += 1;
        }
    }
    released
}
