//! fsm-planner CLI
//!
//! Manages the technician and task records and runs dispatch over them.

mod cli;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fsm_planner::clock;
use fsm_planner::config::PlannerConfig;
use fsm_planner::model::{Task, Technician};
use fsm_planner::repository::JsonRepository;
use fsm_planner::service::{FsmService, ScheduleReport};

use cli::{Cli, Command, NewTask, NewTechnician};

type Service = FsmService<JsonRepository<Technician>, JsonRepository<Task>>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,fsm_planner=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = PlannerConfig::from_env().context("failed to load configuration")?;
    let data_dir = config.data_dir.clone();
    let mut service = FsmService::open(config)
        .with_context(|| format!("failed to load records from {}", data_dir.display()))?;

    match cli.command {
        Command::Technicians => print_technicians(&service),
        Command::Tasks => print_tasks(&service),
        Command::AddTechnician(new) => {
            let technician = service.add_technician(technician_from(new))?;
            println!("Added technician {} ({})", technician.id, technician.name);
        }
        Command::AddTask(new) => {
            let task = service.add_task(task_from(new))?;
            println!("Added task {} ({})", task.id, task.client_name);
        }
        Command::DeleteTechnician { id } => report_delete("technician", id, service.delete_technician(id)?),
        Command::DeleteTask { id } => report_delete("task", id, service.delete_task(id)?),
        Command::Schedule { seed, time_limit, json } => {
            run_schedule(&mut service, seed, time_limit, json).await?;
        }
    }

    Ok(())
}

async fn run_schedule(service: &mut Service, seed: Option<u64>, time_limit: Option<u64>, json: bool) -> Result<()> {
    if service.tasks().iter().all(|t| !t.is_plannable()) {
        println!("No tasks to schedule. Add a task first.");
        return Ok(());
    }
    if seed.is_some() {
        service.config_mut().annealing.seed = seed;
    }

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let limit = async {
                match time_limit {
                    Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
                    None => std::future::pending::<()>().await,
                }
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => warn!("interrupt received, keeping best routes so far"),
                _ = limit => info!("time limit reached, keeping best routes so far"),
                _ = cancel.cancelled() => return,
            }
            cancel.cancel();
        })
    };

    let report = service.run_optimization(&cancel).await;
    cancel.cancel();
    watcher.await.ok();
    let report = report.context("dispatch run failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn technician_from(new: NewTechnician) -> Technician {
    let mut technician = Technician::new(0, new.name, new.lat, new.lon);
    technician.skills = new.skills;
    technician.shift_start = new.shift_start;
    technician.shift_end = new.shift_end;
    technician.travel_speed_kmh = new.speed;
    technician.hourly_cost = new.hourly_cost;
    technician
}

fn task_from(new: NewTask) -> Task {
    let mut task = Task::new(0, new.client, new.lat, new.lon);
    task.address = new.address;
    task.required_skills = new.skills;
    task.priority = new.priority;
    task.duration = new.duration;
    task.window_start = new.window_start;
    task.window_end = new.window_end;
    task
}

fn report_delete(kind: &str, id: u32, deleted: bool) {
    if deleted {
        println!("Deleted {kind} {id}");
    } else {
        println!("No {kind} with id {id}");
    }
}

fn print_technicians(service: &Service) {
    if service.technicians().is_empty() {
        println!("No technicians found.");
    }
    for t in service.technicians() {
        println!(
            "[ID: {}] {} - skills {} - shift {}-{} - {:.0} km/h",
            t.id,
            t.name,
            t.skills,
            clock::format(t.shift_start),
            clock::format(t.shift_end),
            t.travel_speed_kmh
        );
    }
}

fn print_tasks(service: &Service) {
    if service.tasks().is_empty() {
        println!("No tasks found.");
    }
    for t in service.tasks() {
        let start = t.window_start.map_or_else(|| "Any".to_string(), clock::format);
        let end = t.window_end.map_or_else(|| "Any".to_string(), clock::format);
        let assignment = match (t.assigned_technician_id, t.sequence_index) {
            (Some(tech), Some(seq)) => format!(" -> tech {tech} #{seq}"),
            _ => String::new(),
        };
        println!(
            "[ID: {}] {} - {:?} (Window: {}-{}) {:?}{}",
            t.id, t.client_name, t.priority, start, end, t.status, assignment
        );
    }
}

fn print_report(report: &ScheduleReport) {
    println!("\n--- OPTIMIZED ROUTES ---");
    for route in &report.routes {
        println!(
            "\nTechnician: {} (Count: {}, {:.1} km)",
            route.technician_name,
            route.stops.len(),
            route.total_distance_km
        );
        for stop in &route.stops {
            println!("   -> {} : {}", clock::format(stop.start), stop.client_name);
        }
    }
    if !report.unscheduled.is_empty() {
        println!("\nUnscheduled tasks: {:?}", report.unscheduled);
    }
    println!(
        "\nScore: {:.2} -> {:.2} (travel {:.0} min, delay {:.0} min, overtime {:.2} h)",
        report.initial.final_weighted_score,
        report.final_score.final_weighted_score,
        report.final_score.total_travel_minutes,
        report.final_score.total_delay_minutes,
        report.final_score.overtime_hours
    );
}
