//! CLI argument parsing for the fsm-planner binary.

use clap::{Args, Parser, Subcommand};

use fsm_planner::clock;
use fsm_planner::model::{SkillSet, TaskPriority};

#[derive(Parser)]
#[command(name = "fsm-planner", about = "Field-service technician dispatch planner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List technicians
    Technicians,
    /// List tasks with their current assignment
    Tasks,
    /// Add a technician
    AddTechnician(NewTechnician),
    /// Add a task
    AddTask(NewTask),
    /// Delete a technician by id
    DeleteTechnician { id: u32 },
    /// Delete a task by id
    DeleteTask { id: u32 },
    /// Plan, optimize and commit today's routes
    Schedule {
        /// Seed for a reproducible optimization run
        #[arg(long)]
        seed: Option<u64>,
        /// Stop optimizing after this many seconds and keep the best so far
        #[arg(long)]
        time_limit: Option<u64>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct NewTechnician {
    #[arg(long)]
    pub name: String,
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
    /// Comma separated skills, e.g. "electric,general"
    #[arg(long, default_value = "all")]
    pub skills: SkillSet,
    #[arg(long, default_value = "08:00", value_parser = clock::parse)]
    pub shift_start: i32,
    #[arg(long, default_value = "17:00", value_parser = clock::parse)]
    pub shift_end: i32,
    /// Average travel speed in km/h
    #[arg(long, default_value_t = 40.0)]
    pub speed: f64,
    #[arg(long, default_value_t = 0.0)]
    pub hourly_cost: f64,
}

#[derive(Args)]
pub struct NewTask {
    #[arg(long)]
    pub client: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
    #[arg(long, default_value = "general")]
    pub skills: SkillSet,
    #[arg(long, default_value = "regular")]
    pub priority: TaskPriority,
    /// Service duration as HH:MM
    #[arg(long, default_value = "01:00", value_parser = clock::parse)]
    pub duration: i32,
    #[arg(long, value_parser = clock::parse)]
    pub window_start: Option<i32>,
    #[arg(long, value_parser = clock::parse)]
    pub window_end: Option<i32>,
}
