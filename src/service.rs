//! End-to-end dispatch: load records, plan, optimize, commit, save.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::annealing::AnnealingOptimizer;
use crate::break_time::BreakWindow;
use crate::clock;
use crate::commit::{commit_schedules, release_unscheduled};
use crate::config::PlannerConfig;
use crate::error::Result;
use crate::greedy::GreedyScheduler;
use crate::model::{ScoreBreakdown, SchedulerResult, Task, TaskId, Technician, TechnicianId, TechnicianSchedule};
use crate::objective::WeightedObjective;
use crate::repository::JsonRepository;
use crate::timeline::replay;
use crate::traits::{InitialScheduler, Objective, Repository};

/// One committed stop, as shown to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopSummary {
    pub task_id: TaskId,
    pub client_name: String,
    pub sequence: u32,
    #[serde(with = "clock::hhmm")]
    pub start: i32,
    #[serde(with = "clock::hhmm")]
    pub end: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub technician_id: TechnicianId,
    pub technician_name: String,
    pub date: NaiveDate,
    pub total_distance_km: f64,
    pub stops: Vec<StopSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleReport {
    pub routes: Vec<RouteSummary>,
    pub unscheduled: Vec<TaskId>,
    pub initial: ScoreBreakdown,
    #[serde(rename = "final")]
    pub final_score: ScoreBreakdown,
}

/// Owns the canonical records and drives a dispatch run over them.
pub struct FsmService<T, K> {
    config: PlannerConfig,
    technician_repo: T,
    task_repo: K,
    technicians: Vec<Technician>,
    tasks: Vec<Task>,
}

impl FsmService<JsonRepository<Technician>, JsonRepository<Task>> {
    /// Open the JSON files under `config.data_dir`.
    pub fn open(config: PlannerConfig) -> Result<Self> {
        let technician_repo = JsonRepository::new(config.technicians_path());
        let task_repo = JsonRepository::new(config.tasks_path());
        Self::new(config, technician_repo, task_repo)
    }
}

impl<T, K> FsmService<T, K>
where
    T: Repository<Technician>,
    K: Repository<Task>,
{
    pub fn new(config: PlannerConfig, technician_repo: T, task_repo: K) -> Result<Self> {
        let mut service = Self {
            config,
            technician_repo,
            task_repo,
            technicians: Vec::new(),
            tasks: Vec::new(),
        };
        service.load()?;
        Ok(service)
    }

    pub fn load(&mut self) -> Result<()> {
        let technicians = self.technician_repo.load()?;
        let tasks = self.task_repo.load()?;
        for technician in &technicians {
            technician.validate()?;
        }
        for task in &tasks {
            task.validate()?;
        }
        self.technicians = technicians;
        self.tasks = tasks;
        info!(
            technicians = self.technicians.len(),
            tasks = self.tasks.len(),
            "records loaded"
        );
        Ok(())
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PlannerConfig {
        &mut self.config
    }

    pub fn technicians(&self) -> &[Technician] {
        &self.technicians
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Validate, assign the next id and persist.
    pub fn add_technician(&mut self, mut technician: Technician) -> Result<&Technician> {
        technician.validate()?;
        technician.id = self.technicians.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        self.technicians.push(technician);
        self.technician_repo.save(&self.technicians)?;
        Ok(&self.technicians[self.technicians.len() - 1])
    }

    pub fn delete_technician(&mut self, id: TechnicianId) -> Result<bool> {
        let Some(position) = self.technicians.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        self.technicians.remove(position);
        self.technician_repo.save(&self.technicians)?;
        Ok(true)
    }

    /// Validate the time fields, assign the next id and persist.
    pub fn add_task(&mut self, mut task: Task) -> Result<&Task> {
        task.validate()?;
        task.id = self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        task.clear_assignment();
        self.tasks.push(task);
        self.task_repo.save(&self.tasks)?;
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<bool> {
        let Some(position) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        self.tasks.remove(position);
        self.task_repo.save(&self.tasks)?;
        Ok(true)
    }

    fn schedule_date() -> NaiveDate {
        Local::now().date_naive()
    }

    fn objective(&self) -> WeightedObjective {
        WeightedObjective::new(self.config.weights, self.config.break_window)
    }

    /// Greedy routes for every plannable task, without touching the records.
    pub fn generate_initial_schedule(&self) -> SchedulerResult<'_> {
        let plannable: Vec<Task> = self.tasks.iter().filter(|t| t.is_plannable()).cloned().collect();
        GreedyScheduler::new(Self::schedule_date(), self.config.break_window)
            .generate_initial_schedule(&self.technicians, &plannable)
    }

    /// Plan, refine until done or cancelled, then commit and save the tasks.
    pub async fn run_optimization(&mut self, cancel: &CancellationToken) -> Result<ScheduleReport> {
        let breaks = self.config.break_window;
        let plannable: Vec<Task> = self.tasks.iter().filter(|t| t.is_plannable()).cloned().collect();
        info!(
            technicians = self.technicians.len(),
            tasks = plannable.len(),
            "starting dispatch run"
        );

        let greedy = GreedyScheduler::new(Self::schedule_date(), breaks);
        let initial = greedy.generate_initial_schedule(&self.technicians, &plannable);

        let optimizer = AnnealingOptimizer::new(self.objective(), breaks, self.config.annealing.clone());
        let initial_breakdown = optimizer.objective().detailed_score(&initial.schedules);
        let solution = optimizer.optimize(initial.schedules, cancel).await;
        let final_breakdown = optimizer.objective().detailed_score(&solution);

        let committed = commit_schedules(&solution, &mut self.tasks, &breaks);
        release_unscheduled(&initial.unscheduled, &mut self.tasks);
        info!(
            committed,
            unscheduled = initial.unscheduled.len(),
            initial_score = initial_breakdown.final_weighted_score,
            final_score = final_breakdown.final_weighted_score,
            "dispatch run committed"
        );

        let report = ScheduleReport {
            routes: solution.iter().map(|s| summarize(s, &breaks)).collect(),
            unscheduled: initial.unscheduled.iter().map(|t| t.id).collect(),
            initial: initial_breakdown,
            final_score: final_breakdown,
        };

        self.task_repo.save(&self.tasks)?;
        Ok(report)
    }
}

fn summarize(schedule: &TechnicianSchedule<'_>, breaks: &BreakWindow) -> RouteSummary {
    let timeline = replay(schedule.technician, &schedule.tasks, breaks);
    let stops = schedule
        .tasks
        .iter()
        .zip(&timeline.stops)
        .enumerate()
        .map(|(index, (task, stop))| StopSummary {
            task_id: task.id,
            client_name: task.client_name.clone(),
            sequence: index as u32 + 1,
            start: stop.start,
            end: stop.end,
        })
        .collect();

    RouteSummary {
        technician_id: schedule.technician.id,
        technician_name: schedule.technician.name.clone(),
        date: schedule.date,
        total_distance_km: timeline.total_distance_km,
        stops,
    }
}
