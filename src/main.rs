use anyhow::Result;
use timetable_manager::{config, context, telemetry, validation};
use config::Config;
use context::AppContext;
use telemetry::init_tracing;
use tracing::{info, warn};
use validation::{credit_report, CreditLoad};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;
    init_tracing(&cfg.telemetry);

    if !cfg.store.seed_fixtures {
        warn!("fixture seeding disabled - starting with an empty store");
    }

    let ctx = AppContext::new(cfg.clone())?;

    match ctx.scenarios.get_active() {
        Some(active) => info!(scenario_id = %active.id, name = %active.name, "active scenario"),
        None => info!("no active scenario"),
    }

    let summary = ctx.scenarios.dashboard();
    info!(
        students = summary.total_students,
        faculty = summary.total_faculty,
        rooms = summary.total_rooms,
        conflicts = summary.conflicts,
        satisfaction = summary.student_satisfaction,
        balance = summary.faculty_balance,
        utilization = summary.room_utilization,
        "dashboard"
    );

    for status in credit_report(&ctx.store.students.list_all()) {
        if status.band == CreditLoad::Normal {
            continue;
        }
        warn!(
            roll_no = %status.roll_no,
            credits = status.total_credits,
            band = %status.band,
            "student credit load outside normal band"
        );
    }

    if cfg.generator.run_on_start {
        match ctx.generation.request().await {
            Ok(snapshot) => info!(snapshot = %serde_json::to_string(&snapshot)?, "generation snapshot"),
            Err(e) => warn!(error = %e, "generation unavailable"),
        }
    }

    info!("timetable manager ready");
    Ok(())
}
