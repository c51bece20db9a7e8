//! Forward replay of a technician's route.
//!
//! Starting from shift start at the technician's base, each stop is reached
//! by break-aware travel, waits for its window to open, and is worked with
//! break-aware duration. Greedy assignment, scoring, the optimizer's time
//! refresh and commit all step through the same function, so a route always
//! has exactly one timeline.

use crate::break_time::BreakWindow;
use crate::haversine::{haversine_km, travel_seconds};
use crate::model::{Task, TaskId, Technician, TechnicianSchedule};

/// Computed timing for a single stop.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub task_id: TaskId,
    pub distance_km: f64,
    pub travel_secs: i32,
    pub arrival: i32,
    pub wait_secs: i32,
    /// Earliest start the window allows, before any push past the break.
    pub ready: i32,
    pub start: i32,
    pub end: i32,
    /// Seconds `ready` falls past the window end.
    pub late_secs: i32,
    /// False when the technician's speed cannot cover any distance.
    pub reachable: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteTimeline {
    pub stops: Vec<Stop>,
    pub total_distance_km: f64,
    /// Clock after the last stop, or shift start for an empty route.
    pub finish: i32,
}

/// Advance from `clock` at `from` to the next task.
pub fn next_stop(technician: &Technician, breaks: &BreakWindow, clock: i32, from: (f64, f64), task: &Task) -> Stop {
    let clock = breaks.adjust_for_break(clock);
    let distance_km = haversine_km(from, task.location());
    let (travel_secs, reachable) = match travel_seconds(distance_km, technician.travel_speed_kmh) {
        Some(secs) => (secs, true),
        None => (0, false),
    };

    let arrival = breaks.adjust_for_break(breaks.add_time_with_break(clock, travel_secs));

    // Early arrivals wait for the window to open
    let ready = match task.window_start {
        Some(window_start) if arrival < window_start => window_start,
        _ => arrival,
    };
    let wait_secs = ready.saturating_sub(arrival);

    let (start, end) = breaks.schedule_activity(breaks.adjust_for_break(ready), task.duration);
    let late_secs = task
        .window_end
        .map_or(0, |window_end| ready.saturating_sub(window_end).max(0));

    Stop {
        task_id: task.id,
        distance_km,
        travel_secs,
        arrival,
        wait_secs,
        ready,
        start,
        end,
        late_secs,
        reachable,
    }
}

/// Replay a route from shift start, ignoring any cached times on the tasks.
pub fn replay(technician: &Technician, tasks: &[Task], breaks: &BreakWindow) -> RouteTimeline {
    let mut clock = technician.shift_start;
    let mut position = technician.base_location();
    let mut total_distance_km = 0.0;
    let mut stops = Vec::with_capacity(tasks.len());

    for task in tasks {
        let stop = next_stop(technician, breaks, clock, position, task);
        clock = stop.end;
        position = task.location();
        total_distance_km += stop.distance_km;
        stops.push(stop);
    }

    RouteTimeline {
        stops,
        total_distance_km,
        finish: clock,
    }
}

/// Rewrite the cached times and distance of a schedule's working copies.
pub fn refresh(schedule: &mut TechnicianSchedule<'_>, breaks: &BreakWindow) {
    let timeline = replay(schedule.technician, &schedule.tasks, breaks);
    for (task, stop) in schedule.tasks.iter_mut().zip(&timeline.stops) {
        task.assigned_technician_id = Some(schedule.technician.id);
        task.actual_start_time = Some(stop.start);
        task.actual_end_time = Some(stop.end);
    }
    schedule.total_distance_km = timeline.total_distance_km;
}
