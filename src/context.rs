use anyhow::{Context as _, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::generator::{GenerationService, SimulatedGenerator, TimetableGenerator};
use crate::planner::Planner;
use crate::scenario::ScenarioManager;
use crate::store::{fixtures, Store};

/// The store and the services built around it. Constructed once at startup
/// and handed to whatever serves requests.
#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    pub store: Arc<Store>,
    pub scenarios: Arc<ScenarioManager>,
    pub planner: Arc<Planner>,
    pub generation: GenerationService,
}

impl AppContext {
    pub fn new(cfg: Config) -> Result<Self> {
        let generator = Arc::new(SimulatedGenerator::new(Duration::from_millis(cfg.generator.delay_ms)));
        Self::with_generator(cfg, Arc::new(Store::in_memory()), generator)
    }

    pub fn with_generator(
        cfg: Config,
        store: Arc<Store>,
        generator: Arc<dyn TimetableGenerator>,
    ) -> Result<Self> {
        let scenarios = Arc::new(ScenarioManager::new(
            store.clone(),
            cfg.calendar.clone(),
            cfg.metrics.clone(),
        ));

        if cfg.store.seed_fixtures {
            let active = fixtures::seed(&store).context("seeding fixture data")?;
            scenarios
                .refresh(&active)
                .context("computing metrics of seeded scenario")?;
            scenarios.sync_faculty_hours()?;
            info!(
                students = store.students.count(),
                faculty = store.faculty.count(),
                rooms = store.rooms.count(),
                entries = store.entries.count(),
                "fixture data loaded"
            );
        }

        let planner = Arc::new(Planner::new(store.clone(), scenarios.clone(), cfg.policy));
        let generation = GenerationService::new(generator, Duration::from_millis(cfg.generator.timeout_ms));

        Ok(Self {
            cfg,
            store,
            scenarios,
            planner,
            generation,
        })
    }
}
