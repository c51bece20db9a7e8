//! Service tests
//!
//! Record management, validation, and full dispatch runs that commit
//! assignments back onto the stored tasks.

mod fixtures;

use std::collections::HashMap;
use std::path::PathBuf;

use fixtures::*;
use fsm_planner::clock::hours;
use fsm_planner::config::PlannerConfig;
use fsm_planner::model::{SkillSet, Task, TaskStatus, Technician};
use fsm_planner::repository::{JsonRepository, MemoryRepository};
use fsm_planner::service::FsmService;
use fsm_planner::traits::Repository;
use fsm_planner::PlannerError;
use tokio_util::sync::CancellationToken;

type MemoryService = FsmService<MemoryRepository<Technician>, MemoryRepository<Task>>;

fn seeded_config() -> PlannerConfig {
    let mut config = PlannerConfig::default();
    config.annealing.seed = Some(2024);
    config
}

fn service(technicians: Vec<Technician>, tasks: Vec<Task>) -> MemoryService {
    FsmService::new(seeded_config(), MemoryRepository::new(technicians), MemoryRepository::new(tasks)).unwrap()
}

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("fsm-planner-{}", uuid::Uuid::new_v4()))
}

// ============================================================================
// Record management
// ============================================================================

#[test]
fn test_add_task_assigns_next_id() {
    let mut service = service(Vec::new(), vec![TaskBuilder::new(5).build(), TaskBuilder::new(2).build()]);

    let added = service.add_task(TaskBuilder::new(0).build()).unwrap();
    assert_eq!(added.id, 6);
    assert_eq!(added.status, TaskStatus::Pending);
    assert_eq!(service.tasks().len(), 3);
}

#[test]
fn test_add_task_rejects_inverted_window() {
    let mut service = service(Vec::new(), Vec::new());

    let result = service.add_task(TaskBuilder::new(0).window(hours(12), hours(9)).build());
    assert!(matches!(result, Err(PlannerError::InvalidTimeWindow { .. })));
    assert!(service.tasks().is_empty());
}

#[test]
fn test_add_task_clears_stale_assignment() {
    let mut service = service(Vec::new(), Vec::new());
    let mut task = TaskBuilder::new(0).build();
    task.assigned_technician_id = Some(9);
    task.sequence_index = Some(3);
    task.status = TaskStatus::Scheduled;

    let added = service.add_task(task).unwrap();
    assert_eq!(added.assigned_technician_id, None);
    assert_eq!(added.sequence_index, None);
    assert_eq!(added.status, TaskStatus::Pending);
}

#[test]
fn test_add_task_rejects_out_of_day_times() {
    let mut service = service(Vec::new(), Vec::new());

    let result = service.add_task(TaskBuilder::new(0).duration(2_147_480_000).build());
    assert!(matches!(result, Err(PlannerError::InvalidDuration(_))));

    let result = service.add_task(TaskBuilder::new(0).duration(-60).build());
    assert!(matches!(result, Err(PlannerError::InvalidDuration(_))));

    let result = service.add_task(TaskBuilder::new(0).window(hours(9), hours(30)).build());
    assert!(matches!(result, Err(PlannerError::InvalidTimeWindow { .. })));
    assert!(service.tasks().is_empty());
}

#[test]
fn test_load_rejects_stored_oversized_duration() {
    let mut task = TaskBuilder::new(1).build();
    task.duration = 2_147_480_000;

    let result = FsmService::new(seeded_config(), MemoryRepository::new(Vec::new()), MemoryRepository::new(vec![task]));
    assert!(matches!(result, Err(PlannerError::InvalidDuration(_))));
}

#[test]
fn test_ids_are_unique_among_live_records() {
    let mut service = service(Vec::new(), vec![TaskBuilder::new(1).build(), TaskBuilder::new(2).build()]);

    assert!(service.delete_task(1).unwrap());
    assert_eq!(service.add_task(TaskBuilder::new(0).build()).unwrap().id, 3);

    // Only the highest id is handed out again once freed
    assert!(service.delete_task(3).unwrap());
    assert_eq!(service.add_task(TaskBuilder::new(0).build()).unwrap().id, 3);

    let ids: Vec<u32> = service.tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn test_add_technician_validates_shift() {
    let mut service = service(vec![TechnicianBuilder::new(3).build()], Vec::new());

    let result = service.add_technician(TechnicianBuilder::new(0).shift(hours(17), hours(8)).build());
    assert!(matches!(result, Err(PlannerError::InvalidShift { .. })));

    let added = service.add_technician(TechnicianBuilder::new(0).build()).unwrap();
    assert_eq!(added.id, 4);
}

#[test]
fn test_delete_reports_missing_ids() {
    let mut service = service(vec![TechnicianBuilder::new(1).build()], vec![TaskBuilder::new(1).build()]);

    assert!(service.delete_task(1).unwrap());
    assert!(!service.delete_task(1).unwrap());
    assert!(service.delete_technician(1).unwrap());
    assert!(!service.delete_technician(42).unwrap());
    assert!(service.tasks().is_empty());
    assert!(service.technicians().is_empty());
}

// ============================================================================
// Dispatch runs
// ============================================================================

#[tokio::test]
async fn test_run_commits_sequences_and_status() {
    let technicians = vec![
        TechnicianBuilder::new(1)
            .based_at(TEL_AVIV.lat, TEL_AVIV.lng)
            .skills(SkillSet::GENERAL | SkillSet::ELECTRIC)
            .build(),
        TechnicianBuilder::new(2)
            .based_at(TEL_AVIV.lat, TEL_AVIV.lng)
            .skills(SkillSet::GENERAL)
            .build(),
    ];
    let mut tasks: Vec<Task> = TEL_AVIV_SITES
        .iter()
        .enumerate()
        .map(|(i, site)| TaskBuilder::new(i as u32 + 1).located(site).build())
        .collect();
    tasks[0].required_skills = SkillSet::ELECTRIC;
    // Nobody on shift does plumbing
    tasks[1].required_skills = SkillSet::PLUMBING;

    let mut finished = TaskBuilder::new(100).located(&TEL_AVIV_SITES[2]).build();
    finished.status = TaskStatus::Completed;
    finished.assigned_technician_id = Some(7);
    finished.sequence_index = Some(1);
    tasks.push(finished.clone());

    let mut service = service(technicians, tasks);
    let report = service.run_optimization(&CancellationToken::new()).await.unwrap();

    assert_eq!(report.unscheduled, vec![2]);
    assert!(report.final_score.final_weighted_score <= report.initial.final_weighted_score);

    let by_id: HashMap<u32, &Task> = service.tasks().iter().map(|t| (t.id, t)).collect();

    for route in &report.routes {
        for (index, stop) in route.stops.iter().enumerate() {
            let task = by_id[&stop.task_id];
            assert_eq!(task.assigned_technician_id, Some(route.technician_id));
            assert_eq!(task.sequence_index, Some(index as u32 + 1));
            assert_eq!(task.status, TaskStatus::Scheduled);
            assert_eq!(task.actual_start_time, Some(stop.start));
            assert_eq!(task.actual_end_time, Some(stop.end));
        }
    }

    let electric = by_id[&1];
    assert_eq!(electric.assigned_technician_id, Some(1));

    let plumbing = by_id[&2];
    assert_eq!(plumbing.status, TaskStatus::Pending);
    assert_eq!(plumbing.assigned_technician_id, None);

    assert_eq!(*by_id[&100], finished);

    let committed: usize = report.routes.iter().map(|r| r.stops.len()).sum();
    assert_eq!(committed, TEL_AVIV_SITES.len() - 1);
}

#[tokio::test]
async fn test_run_with_no_technicians_leaves_everything_pending() {
    let mut service = service(Vec::new(), vec![TaskBuilder::new(1).build(), TaskBuilder::new(2).build()]);

    let report = service.run_optimization(&CancellationToken::new()).await.unwrap();

    assert!(report.routes.is_empty());
    assert_eq!(report.unscheduled.len(), 2);
    assert_eq!(report.final_score.final_weighted_score, 0.0);
    assert!(service.tasks().iter().all(|t| t.status == TaskStatus::Pending));
}

#[tokio::test]
async fn test_run_persists_to_json_files() {
    let dir = temp_dir();
    let mut config = seeded_config();
    config.data_dir = dir.clone();

    {
        let mut service = FsmService::open(config.clone()).unwrap();
        service
            .add_technician(TechnicianBuilder::new(0).based_at(JERUSALEM.lat, JERUSALEM.lng).build())
            .unwrap();
        for site in JERUSALEM_SITES {
            service.add_task(TaskBuilder::new(0).located(site).build()).unwrap();
        }
        service.run_optimization(&CancellationToken::new()).await.unwrap();
    }

    let stored = JsonRepository::<Task>::new(config.tasks_path()).load().unwrap();
    assert_eq!(stored.len(), JERUSALEM_SITES.len());
    let mut sequences: Vec<u32> = stored.iter().filter_map(|t| t.sequence_index).collect();
    sequences.sort_unstable();
    assert_eq!(sequences, vec![1, 2, 3]);
    assert!(stored.iter().all(|t| t.status == TaskStatus::Scheduled && t.assigned_technician_id == Some(1)));

    let reopened = FsmService::open(config).unwrap();
    assert_eq!(reopened.technicians().len(), 1);

    std::fs::remove_dir_all(dir).ok();
}
