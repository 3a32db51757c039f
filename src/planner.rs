//! Commit path for timetable entries.
//!
//! Every write runs input validation, the conflict model and the load
//! validators before touching the store, then refreshes the affected
//! scenario's metrics. A rejected write leaves the store unchanged.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::domain::{
    EntityId, Metrics, NewTimetableEntry, Placement, Slot, TimetableEntry, TimetableEntryPatch,
};
use crate::error::DomainError;
use crate::scenario::ScenarioManager;
use crate::schedule::{check_conflict, ConflictResult};
use crate::store::{Record, Store};
use crate::validation::{check_load, LoadInputs, LoadPolicy, LoadViolation};

/// A reference to a record that does not exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownReference {
    pub entity: &'static str,
    pub id: EntityId,
}

/// Everything the pre-commit checks found for one placement
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub conflicts: ConflictResult,
    pub blocking: Vec<LoadViolation>,
    pub advisories: Vec<LoadViolation>,
    pub unknown_references: Vec<UnknownReference>,
}

impl CheckReport {
    pub fn is_committable(&self) -> bool {
        self.conflicts.is_clear() && self.blocking.is_empty()
    }

    /// Conflicts first, then blocking violations
    fn into_verdict(self) -> Result<Vec<LoadViolation>, DomainError> {
        self.conflicts.into_result()?;
        if !self.blocking.is_empty() {
            return Err(DomainError::CapacityExceeded(self.blocking));
        }
        Ok(self.advisories)
    }
}

/// Outcome of an accepted write
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub entry: TimetableEntry,
    pub advisories: Vec<LoadViolation>,
    /// Refreshed metrics of the entry's scenario, if it has one
    pub metrics: Option<Metrics>,
}

pub struct Planner {
    store: Arc<Store>,
    scenarios: Arc<ScenarioManager>,
    policy: LoadPolicy,
    // Serializes check-then-write
    commit_lock: Mutex<()>,
}

impl Planner {
    pub fn new(store: Arc<Store>, scenarios: Arc<ScenarioManager>, policy: LoadPolicy) -> Self {
        Self {
            store,
            scenarios,
            policy,
            commit_lock: Mutex::new(()),
        }
    }

    /// Run the conflict model and every validator without writing.
    /// Compared against the entries of the placement's own scenario.
    pub fn check(&self, placement: &Placement) -> CheckReport {
        let scope = self.store.scenario_entries(placement.scenario_id.as_ref());
        let conflicts = check_conflict(placement, &scope);

        let faculty = self.store.faculty.get(&placement.faculty_id);
        let room = self.store.rooms.get(&placement.room_id);
        let course = self.store.courses.get(&placement.course_id);
        let students = self.store.students.list_all();

        let mut unknown_references = Vec::new();
        if let Some(id) = &placement.scenario_id {
            if self.store.scenarios.get(id).is_none() {
                unknown_references.push(UnknownReference { entity: "scenario", id: id.clone() });
            }
        }
        let lookups = [
            ("course", &placement.course_id, course.is_some()),
            ("faculty", &placement.faculty_id, faculty.is_some()),
            ("room", &placement.room_id, room.is_some()),
        ];
        for (entity, id, found) in lookups {
            if !found {
                unknown_references.push(UnknownReference { entity, id: id.clone() });
            }
        }

        let inputs = LoadInputs {
            faculty: faculty.as_ref(),
            room: room.as_ref(),
            course: course.as_ref(),
            students: &students,
            scope: &scope,
        };
        let (blocking, advisories) = self.policy.partition(check_load(placement, &inputs));

        CheckReport {
            conflicts,
            blocking,
            advisories,
            unknown_references,
        }
    }

    pub fn create_entry(&self, new: NewTimetableEntry) -> Result<Commit, DomainError> {
        new.validate()?;
        new.slot().check()?;

        let _guard = self.commit_lock.lock();
        let report = self.check(&new.placement());
        self.log_unknown(&report);
        let advisories = report.into_verdict().inspect_err(|e| {
            debug!(kind = e.kind(), "entry creation rejected");
        })?;

        let entry = self.store.entries.create(new)?;
        info!(entry_id = %entry.id, slot = %entry.slot(), "timetable entry created");
        let metrics = self.after_commit(entry.scenario_id.as_ref());
        Ok(Commit {
            entry,
            advisories,
            metrics,
        })
    }

    /// Merge `patch` into an entry. The merged entry is checked as a whole
    /// against every other entry of its scenario.
    pub fn update_entry(&self, id: &EntityId, patch: TimetableEntryPatch) -> Result<Commit, DomainError> {
        let _guard = self.commit_lock.lock();
        let existing = self
            .store
            .entries
            .get(id)
            .ok_or_else(|| DomainError::not_found(TimetableEntry::KIND, id.as_str()))?;

        let mut candidate = existing.clone();
        candidate.apply(patch.clone());
        candidate.check()?;

        let report = self.check(&candidate.placement());
        self.log_unknown(&report);
        let advisories = report.into_verdict().inspect_err(|e| {
            debug!(entry_id = %id, kind = e.kind(), "entry update rejected");
        })?;

        let entry = self.store.entries.update(id, patch)?;
        info!(entry_id = %entry.id, slot = %entry.slot(), "timetable entry updated");

        if existing.scenario_id != entry.scenario_id {
            self.after_commit(existing.scenario_id.as_ref());
        }
        let metrics = self.after_commit(entry.scenario_id.as_ref());
        Ok(Commit {
            entry,
            advisories,
            metrics,
        })
    }

    /// Reschedule an entry. An occupied target slot rejects the whole move.
    pub fn move_entry(&self, id: &EntityId, target: Slot) -> Result<Commit, DomainError> {
        target.check()?;
        self.update_entry(id, TimetableEntryPatch::reschedule(target))
    }

    /// `true` if the entry existed and was removed
    pub fn delete_entry(&self, id: &EntityId) -> bool {
        let _guard = self.commit_lock.lock();
        let Some(existing) = self.store.entries.get(id) else {
            return false;
        };
        if !self.store.entries.delete(id) {
            return false;
        }
        info!(entry_id = %id, "timetable entry deleted");
        self.after_commit(existing.scenario_id.as_ref());
        true
    }

    /// Refresh metrics of the touched scenario, and faculty hours when it is
    /// the active one
    fn after_commit(&self, scenario_id: Option<&EntityId>) -> Option<Metrics> {
        let scenario_id = scenario_id?;
        let scenario = self.store.scenarios.get(scenario_id)?;

        let metrics = match self.scenarios.refresh(scenario_id) {
            Ok(metrics) => metrics,
            Err(e) => {
                warn!(scenario_id = %scenario_id, error = %e, "metrics refresh failed");
                return None;
            }
        };
        if scenario.is_active {
            if let Err(e) = self.scenarios.sync_faculty_hours() {
                warn!(error = %e, "faculty hours sync failed");
            }
        }
        Some(metrics)
    }

    fn log_unknown(&self, report: &CheckReport) {
        for unknown in &report.unknown_references {
            warn!(entity = unknown.entity, id = %unknown.id, "placement references unknown record");
        }
    }
}
