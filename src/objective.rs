//! Weighted multi-term objective.
//!
//! Every route is replayed from shift start, so the score never depends on
//! times or distances cached on the working copies. Lateness is weighted far
//! above travel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::break_time::BreakWindow;
use crate::model::{ScoreBreakdown, TaskPriority, TechnicianSchedule};
use crate::timeline::replay;
use crate::traits::Objective;

/// Route count at which scoring moves onto the rayon pool.
const PARALLEL_ROUTE_THRESHOLD: usize = 8;

/// Penalty weights. Time-based weights are per hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    pub distance_per_km: f64,
    pub waiting_per_hour: f64,
    pub lateness_per_hour: f64,
    pub overtime_per_hour: f64,
    /// Flat cost of a stop the technician has no speed to reach.
    pub unreachable_penalty: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            distance_per_km: 1.0,
            waiting_per_hour: 10.0,
            lateness_per_hour: 1000.0,
            overtime_per_hour: 200.0,
            unreachable_penalty: 1_000_000.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WeightedObjective {
    pub weights: ObjectiveWeights,
    pub breaks: BreakWindow,
}

impl WeightedObjective {
    pub fn new(weights: ObjectiveWeights, breaks: BreakWindow) -> Self {
        Self { weights, breaks }
    }

    fn route_breakdown(&self, schedule: &TechnicianSchedule<'_>) -> ScoreBreakdown {
        let mut route = ScoreBreakdown::default();
        if schedule.tasks.is_empty() {
            return route;
        }

        let technician = schedule.technician;
        let timeline = replay(technician, &schedule.tasks, &self.breaks);
        let w = &self.weights;
        let mut cost = 0.0;

        for (task, stop) in schedule.tasks.iter().zip(&timeline.stops) {
            if !stop.reachable {
                route.unreachable_stops += 1;
                cost += w.unreachable_penalty;
            }

            cost += stop.distance_km * w.distance_per_km;
            route.total_distance_km += stop.distance_km;
            route.total_travel_minutes += f64::from(stop.travel_secs) / 60.0;

            if stop.wait_secs > 0 {
                cost += f64::from(stop.wait_secs) / 3600.0 * w.waiting_per_hour;
                route.total_waiting_minutes += f64::from(stop.wait_secs) / 60.0;
            }

            if stop.late_secs > 0 {
                cost += f64::from(stop.late_secs) / 3600.0 * w.lateness_per_hour;
                route.total_delay_minutes += f64::from(stop.late_secs) / 60.0;
            }

            if task.priority == TaskPriority::Urgent {
                if stop.late_secs > 0 {
                    route.missed_urgent_tasks += 1;
                } else {
                    route.completed_urgent_tasks += 1;
                }
            }
        }

        let overtime_secs = timeline.finish.saturating_sub(technician.shift_end).max(0);
        if overtime_secs > 0 {
            route.overtime_hours = f64::from(overtime_secs) / 3600.0;
            cost += route.overtime_hours * w.overtime_per_hour;
        }

        route.working_hours = f64::from(self.breaks.working_duration(technician.shift_start, timeline.finish)) / 3600.0;
        route.final_weighted_score = cost;
        route
    }
}

impl Objective for WeightedObjective {
    fn detailed_score(&self, schedules: &[TechnicianSchedule<'_>]) -> ScoreBreakdown {
        // Routes are independent; collect in order and sum sequentially so
        // the total is bit-for-bit reproducible.
        let routes: Vec<ScoreBreakdown> = if schedules.len() >= PARALLEL_ROUTE_THRESHOLD {
            schedules
                .par_iter()
                .map(|schedule| self.route_breakdown(schedule))
                .collect()
        } else {
            schedules.iter().map(|schedule| self.route_breakdown(schedule)).collect()
        };

        routes.into_iter().fold(ScoreBreakdown::default(), |mut total, route| {
            total.total_travel_minutes += route.total_travel_minutes;
            total.total_distance_km += route.total_distance_km;
            total.total_delay_minutes += route.total_delay_minutes;
            total.total_waiting_minutes += route.total_waiting_minutes;
            total.completed_urgent_tasks += route.completed_urgent_tasks;
            total.missed_urgent_tasks += route.missed_urgent_tasks;
            total.overtime_hours += route.overtime_hours;
            total.working_hours += route.working_hours;
            total.unreachable_stops += route.unreachable_stops;
            total.final_weighted_score += route.final_weighted_score;
            total
        })
    }
}
