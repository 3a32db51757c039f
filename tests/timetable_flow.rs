use std::sync::Arc;
use std::time::Duration;

use timetable_manager::config::Config;
use timetable_manager::context::AppContext;
use timetable_manager::domain::{
    EntityId, NewScenario, NewTimetableEntry, ScenarioPatch, Slot, TimetableEntry,
};
use timetable_manager::generator::{GenerationError, SimulatedGenerator};
use timetable_manager::store::Store;

fn seeded() -> AppContext {
    AppContext::new(Config::default()).unwrap()
}

fn find_entry(ctx: &AppContext, day: u8, start: &str) -> TimetableEntry {
    ctx.store
        .list_entries(None)
        .into_iter()
        .find(|e| e.day_of_week == day && e.start_time.to_string() == start)
        .unwrap()
}

#[test]
fn test_drag_onto_occupied_cell_is_rejected() {
    let ctx = seeded();
    let edu = find_entry(&ctx, 0, "09:00");
    let before = ctx.store.list_entries(None);
    let metrics_before = ctx.scenarios.get_active().unwrap().metrics;

    // PSY201 sits in the same room on Monday 10:00
    let target = Slot::parse(0, "10:00", "11:00").unwrap();
    for _ in 0..2 {
        let err = ctx.planner.move_entry(&edu.id, target).unwrap_err();
        assert_eq!(err.kind(), "Conflict");
    }

    assert_eq!(ctx.store.list_entries(None), before);
    assert_eq!(ctx.scenarios.get_active().unwrap().metrics, metrics_before);
}

#[test]
fn test_drag_to_free_cell_updates_metrics() {
    let ctx = seeded();
    let edu = find_entry(&ctx, 0, "09:00");

    let commit = ctx
        .planner
        .move_entry(&edu.id, Slot::parse(3, "09:00", "10:00").unwrap())
        .unwrap();
    assert_eq!(commit.entry.day_of_week, 3);

    let active = ctx.scenarios.get_active().unwrap();
    assert_eq!(commit.metrics, Some(active.metrics));
    assert_eq!(ctx.scenarios.dashboard().conflicts, 0);
}

#[test]
fn test_switching_scenarios_changes_dashboard() {
    let ctx = seeded();
    let live = ctx.scenarios.get_active().unwrap();
    assert!(live.metrics.room_utilization > 0);

    let draft = ctx
        .store
        .scenarios
        .create(NewScenario::new("Draft").with_description("empty plan"))
        .unwrap();
    ctx.scenarios.activate(&draft.id).unwrap();
    ctx.scenarios.refresh(&draft.id).unwrap();

    let active: Vec<_> = ctx
        .store
        .scenarios
        .list_all()
        .into_iter()
        .filter(|s| s.is_active)
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, draft.id);

    let summary = ctx.scenarios.dashboard();
    assert_eq!(summary.room_utilization, 0);
    assert_eq!(summary.total_students, 2);

    // Faculty hours follow the active scenario
    assert!(ctx.store.faculty.list_all().iter().all(|f| f.current_hours == 0));

    ctx.scenarios.activate(&live.id).unwrap();
    assert!(ctx.store.faculty.list_all().iter().any(|f| f.current_hours > 0));
}

#[test]
fn test_conflicting_entry_in_other_scenario_is_allowed() {
    let ctx = seeded();
    let edu = find_entry(&ctx, 0, "09:00");
    let draft = ctx.store.scenarios.create(NewScenario::new("Draft")).unwrap();

    let copy = NewTimetableEntry::new(
        Some(draft.id.clone()),
        edu.course_id.clone(),
        edu.faculty_id.clone(),
        edu.room_id.clone(),
        edu.slot(),
    );
    let commit = ctx.planner.create_entry(copy).unwrap();
    assert_eq!(commit.metrics.map(|m| m.conflicts), Some(0));

    // The live scenario's stored metrics are untouched
    assert_eq!(ctx.scenarios.get_active().unwrap().metrics.conflicts, 0);
}

#[test]
fn test_dangling_references_are_tolerated() {
    let ctx = seeded();
    let edu = find_entry(&ctx, 0, "09:00");
    assert!(ctx.store.courses.delete(&edu.course_id));

    let report = ctx.planner.check(&edu.placement());
    assert!(report.is_committable());
    assert_eq!(report.unknown_references.len(), 1);

    let scenario_id = edu.scenario_id.clone().unwrap();
    assert!(ctx.scenarios.refresh(&scenario_id).is_ok());
}

#[test]
fn test_metrics_patch_out_of_range_is_rejected() {
    let ctx = seeded();
    let live = ctx.scenarios.get_active().unwrap();
    let mut metrics = live.metrics;
    metrics.room_utilization = 101;

    let err = ctx
        .store
        .scenarios
        .update(&live.id, ScenarioPatch::metrics(metrics))
        .unwrap_err();
    assert_eq!(err.kind(), "InvalidInput");
    assert_eq!(ctx.scenarios.get_active().unwrap(), live);
}

#[tokio::test(start_paused = true)]
async fn test_generation_never_touches_store() {
    let mut cfg = Config::default();
    cfg.generator.timeout_ms = 500;
    let store = Arc::new(Store::in_memory());
    let ctx = AppContext::with_generator(
        cfg,
        store,
        Arc::new(SimulatedGenerator::new(Duration::from_secs(2))),
    )
    .unwrap();
    let before = ctx.store.list_entries(None);

    let err = ctx.generation.request().await.unwrap_err();
    assert!(matches!(err, GenerationError::Timeout(_)));
    assert_eq!(ctx.store.list_entries(None), before);

    let quick = AppContext::with_generator(
        Config::default(),
        Arc::new(Store::in_memory()),
        Arc::new(SimulatedGenerator::new(Duration::from_millis(100))),
    )
    .unwrap();
    let snapshot = quick.generation.request().await.unwrap();
    assert!(snapshot.metrics.student_satisfaction <= 100);
    assert_eq!(quick.store.entries.count(), 4);
    assert!(quick.store.entries.get(&EntityId::from("missing")).is_none());
}
