//! Configuration management

use std::path::PathBuf;
use std::str::FromStr;

use crate::annealing::AnnealingOptions;
use crate::break_time::BreakWindow;
use crate::clock;
use crate::error::{PlannerError, Result};
use crate::objective::ObjectiveWeights;

/// Planner configuration
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Directory holding `technicians.json` and `tasks.json`
    pub data_dir: PathBuf,

    /// Mandatory daily break
    pub break_window: BreakWindow,

    /// Objective penalty weights
    pub weights: ObjectiveWeights,

    /// Annealing schedule
    pub annealing: AnnealingOptions,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            break_window: BreakWindow::default(),
            weights: ObjectiveWeights::default(),
            annealing: AnnealingOptions::default(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup; unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("FSM_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));

        let defaults = BreakWindow::default();
        let break_start = match lookup("FSM_BREAK_START") {
            Some(text) => clock::parse(&text).map_err(|e| PlannerError::Config(format!("FSM_BREAK_START: {e}")))?,
            None => defaults.start,
        };
        let break_end = match lookup("FSM_BREAK_END") {
            Some(text) => clock::parse(&text).map_err(|e| PlannerError::Config(format!("FSM_BREAK_END: {e}")))?,
            None => defaults.end,
        };
        let break_window = BreakWindow::new(break_start, break_end)?;

        let mut weights = ObjectiveWeights::default();
        override_with(&lookup, "FSM_WEIGHT_DISTANCE", &mut weights.distance_per_km)?;
        override_with(&lookup, "FSM_WEIGHT_WAITING", &mut weights.waiting_per_hour)?;
        override_with(&lookup, "FSM_WEIGHT_LATENESS", &mut weights.lateness_per_hour)?;
        override_with(&lookup, "FSM_WEIGHT_OVERTIME", &mut weights.overtime_per_hour)?;

        let mut annealing = AnnealingOptions::default();
        override_with(&lookup, "FSM_INITIAL_TEMPERATURE", &mut annealing.initial_temperature)?;
        override_with(&lookup, "FSM_COOLING_RATE", &mut annealing.cooling_rate)?;
        override_with(&lookup, "FSM_MIN_TEMPERATURE", &mut annealing.min_temperature)?;
        override_with(&lookup, "FSM_YIELD_INTERVAL", &mut annealing.yield_interval)?;
        if let Some(text) = lookup("FSM_SEED") {
            annealing.seed = Some(parse_value("FSM_SEED", &text)?);
        }

        annealing.validate()?;

        Ok(Self {
            data_dir,
            break_window,
            weights,
            annealing,
        })
    }

    pub fn technicians_path(&self) -> PathBuf {
        self.data_dir.join("technicians.json")
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join("tasks.json")
    }
}

fn parse_value<T: FromStr>(key: &str, text: &str) -> Result<T> {
    text.trim()
        .parse()
        .map_err(|_| PlannerError::Config(format!("{key} has invalid value '{text}'")))
}

fn override_with<F, T>(lookup: &F, key: &str, target: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(text) = lookup(key) {
        *target = parse_value(key, &text)?;
    }
    Ok(())
}
