//! Simulated annealing refinement of the greedy routes.
//!
//! The search wanders through `current` solutions, accepting worse ones with
//! the Metropolis probability `exp(-Δ/T)`, while a separate `best` copy
//! keeps the lowest-cost solution seen. The loop is cooperative: it yields to
//! the runtime periodically and stops as soon as cancellation is observed,
//! returning `best`, which is never worse than the input.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::break_time::BreakWindow;
use crate::error::{PlannerError, Result};
use crate::model::TechnicianSchedule;
use crate::timeline::refresh;
use crate::traits::Objective;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealingOptions {
    pub initial_temperature: f64,
    /// Multiplier applied to the temperature after every iteration.
    pub cooling_rate: f64,
    pub min_temperature: f64,
    /// Iterations between cooperative yields to the runtime.
    pub yield_interval: usize,
    /// Fixed seed for reproducible runs; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for AnnealingOptions {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            cooling_rate: 0.995,
            min_temperature: 0.1,
            yield_interval: 64,
            seed: None,
        }
    }
}

impl AnnealingOptions {
    /// Reject schedules that would never cool below `min_temperature` or
    /// never yield to the runtime.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| -> Result<()> { Err(PlannerError::Config(message)) };

        if !(self.min_temperature.is_finite() && self.min_temperature > 0.0) {
            return invalid(format!(
                "min_temperature must be positive and finite (got {})",
                self.min_temperature
            ));
        }
        if !(self.initial_temperature.is_finite() && self.initial_temperature > self.min_temperature) {
            return invalid(format!(
                "initial_temperature must be finite and above min_temperature {} (got {})",
                self.min_temperature, self.initial_temperature
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return invalid(format!("cooling_rate must be between 0 and 1 (got {})", self.cooling_rate));
        }
        if self.yield_interval == 0 {
            return invalid("yield_interval must be at least 1".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AnnealingOptimizer<O> {
    objective: O,
    breaks: BreakWindow,
    options: AnnealingOptions,
}

impl<O: Objective> AnnealingOptimizer<O> {
    pub fn new(objective: O, breaks: BreakWindow, options: AnnealingOptions) -> Self {
        Self {
            objective,
            breaks,
            options,
        }
    }

    pub fn objective(&self) -> &O {
        &self.objective
    }

    pub fn options(&self) -> &AnnealingOptions {
        &self.options
    }

    /// Refine `initial` until the temperature bottoms out or `cancel` fires.
    pub async fn optimize<'a>(
        &self,
        initial: Vec<TechnicianSchedule<'a>>,
        cancel: &CancellationToken,
    ) -> Vec<TechnicianSchedule<'a>> {
        let mut rng = match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut current = initial;
        let mut current_score = self.objective.score(&current);
        let mut best = current.clone();
        let mut best_score = current_score;
        let initial_score = current_score;

        let mut temperature = self.options.initial_temperature;
        let mut iterations: usize = 0;
        let mut accepted: usize = 0;

        info!(initial_score, "annealing started");

        while temperature > self.options.min_temperature && !cancel.is_cancelled() {
            let mut candidate = current.clone();
            apply_random_mutation(&mut candidate, &self.breaks, &mut rng);
            let candidate_score = self.objective.score(&candidate);

            if accept(current_score, candidate_score, temperature, &mut rng) {
                current = candidate;
                current_score = candidate_score;
                accepted += 1;

                if current_score < best_score {
                    best = current.clone();
                    best_score = current_score;
                    debug!(iteration = iterations, best_score, temperature, "new best solution");
                }
            }

            temperature *= self.options.cooling_rate;
            iterations += 1;

            if self.options.yield_interval > 0 && iterations % self.options.yield_interval == 0 {
                tokio::task::yield_now().await;
            }
        }

        info!(
            iterations,
            accepted,
            initial_score,
            best_score,
            cancelled = cancel.is_cancelled(),
            "annealing finished"
        );

        best
    }
}

/// Metropolis criterion: always take an improvement, sometimes take a worse move.
fn accept<R: Rng>(current_score: f64, candidate_score: f64, temperature: f64, rng: &mut R) -> bool {
    if candidate_score < current_score {
        return true;
    }
    let probability = (-(candidate_score - current_score) / temperature).exp();
    probability > rng.gen_range(0.0..1.0)
}

/// Apply one random move. Falls back to the other move type when the
/// chosen one has nothing to act on; does nothing if neither applies.
fn apply_random_mutation<R: Rng>(solution: &mut [TechnicianSchedule<'_>], breaks: &BreakWindow, rng: &mut R) -> bool {
    if rng.gen_bool(0.5) {
        relocate_random_task(solution, breaks, rng) || swap_within_route(solution, breaks, rng)
    } else {
        swap_within_route(solution, breaks, rng) || relocate_random_task(solution, breaks, rng)
    }
}

/// Move a random task to a random position in another qualified technician's route.
fn relocate_random_task<R: Rng>(solution: &mut [TechnicianSchedule<'_>], breaks: &BreakWindow, rng: &mut R) -> bool {
    let total: usize = solution.iter().map(|s| s.tasks.len()).sum();
    if total == 0 {
        return false;
    }

    let mut pick = rng.gen_range(0..total);
    let mut from = 0;
    while pick >= solution[from].tasks.len() {
        pick -= solution[from].tasks.len();
        from += 1;
    }

    let task = &solution[from].tasks[pick];
    let targets: Vec<usize> = solution
        .iter()
        .enumerate()
        .filter(|(index, schedule)| *index != from && schedule.technician.can_perform(task))
        .map(|(index, _)| index)
        .collect();
    if targets.is_empty() {
        return false;
    }

    let to = targets[rng.gen_range(0..targets.len())];
    let mut task = solution[from].tasks.remove(pick);
    task.assigned_technician_id = Some(solution[to].technician.id);
    let position = rng.gen_range(0..=solution[to].tasks.len());
    solution[to].tasks.insert(position, task);

    refresh(&mut solution[from], breaks);
    refresh(&mut solution[to], breaks);
    true
}

/// Swap two stops inside one route.
fn swap_within_route<R: Rng>(solution: &mut [TechnicianSchedule<'_>], breaks: &BreakWindow, rng: &mut R) -> bool {
    let routes: Vec<usize> = solution
        .iter()
        .enumerate()
        .filter(|(_, schedule)| schedule.tasks.len() >= 2)
        .map(|(index, _)| index)
        .collect();
    if routes.is_empty() {
        return false;
    }

    let schedule = &mut solution[routes[rng.gen_range(0..routes.len())]];
    let len = schedule.tasks.len();
    let i = rng.gen_range(0..len);
    let mut j = rng.gen_range(0..len - 1);
    if j >= i {
        j += 1;
    }
    schedule.tasks.swap(i, j);

    refresh(schedule, breaks);
    true
}
