use std::sync::Arc;
use tracing::{debug, info};

use super::dashboard::{summarize, DashboardSummary};
use super::metrics::compute_metrics;
use crate::config::{CalendarConfig, MetricsConfig};
use crate::domain::{EntityId, FacultyPatch, Metrics, Scenario, ScenarioPatch, TimetableEntry};
use crate::error::DomainError;
use crate::store::Store;
use crate::validation::faculty_minutes;

/// Owns "the current plan": activation, stored metrics and derived faculty
/// hours.
#[derive(Clone)]
pub struct ScenarioManager {
    store: Arc<Store>,
    calendar: CalendarConfig,
    weights: MetricsConfig,
}

impl ScenarioManager {
    pub fn new(store: Arc<Store>, calendar: CalendarConfig, weights: MetricsConfig) -> Self {
        Self {
            store,
            calendar,
            weights,
        }
    }

    /// Make `scenario_id` the only active scenario. Other scenarios are
    /// released in the same repository write.
    pub fn activate(&self, scenario_id: &EntityId) -> Result<Scenario, DomainError> {
        let scenario = self.store.scenarios.update(scenario_id, ScenarioPatch::activate())?;
        info!(scenario_id = %scenario.id, name = %scenario.name, "scenario activated");
        self.sync_faculty_hours()?;
        Ok(scenario)
    }

    pub fn get_active(&self) -> Option<Scenario> {
        self.store.active_scenario()
    }

    /// Metrics of `entries` against the current rooms and faculty, without
    /// storing them
    pub fn compute(&self, entries: &[TimetableEntry]) -> Metrics {
        let rooms = self.store.rooms.list_all();
        let faculty = self.store.faculty.list_all();
        compute_metrics(entries, &rooms, &faculty, &self.calendar, &self.weights)
    }

    /// Recompute from the full entry set of a scenario and store the result
    pub fn recompute_metrics(
        &self,
        scenario_id: &EntityId,
        entries: &[TimetableEntry],
    ) -> Result<Metrics, DomainError> {
        let metrics = self.compute(entries);
        self.store
            .scenarios
            .update(scenario_id, ScenarioPatch::metrics(metrics))?;
        debug!(
            scenario_id = %scenario_id,
            entries = entries.len(),
            conflicts = metrics.conflicts,
            satisfaction = metrics.student_satisfaction,
            balance = metrics.faculty_balance,
            utilization = metrics.room_utilization,
            "scenario metrics recomputed"
        );
        Ok(metrics)
    }

    /// Recompute using the entries currently stored for the scenario
    pub fn refresh(&self, scenario_id: &EntityId) -> Result<Metrics, DomainError> {
        let entries = self.store.list_entries(Some(scenario_id));
        self.recompute_metrics(scenario_id, &entries)
    }

    /// Set every faculty member's `current_hours` to the rounded weekly hours
    /// of their entries in the active scenario (zero when none is active).
    /// Returns how many records changed.
    pub fn sync_faculty_hours(&self) -> Result<usize, DomainError> {
        let entries = match self.get_active() {
            Some(active) => self.store.list_entries(Some(&active.id)),
            None => Vec::new(),
        };

        let mut changed = 0;
        for faculty in self.store.faculty.list_all() {
            let hours = (faculty_minutes(&faculty.id, &entries, None) + 30) / 60;
            if hours == faculty.current_hours {
                continue;
            }
            let patch = FacultyPatch {
                current_hours: Some(hours),
                ..Default::default()
            };
            self.store.faculty.update(&faculty.id, patch)?;
            changed += 1;
        }
        if changed > 0 {
            debug!(changed, "faculty current hours synced");
        }
        Ok(changed)
    }

    pub fn dashboard(&self) -> DashboardSummary {
        summarize(&self.store)
    }
}
