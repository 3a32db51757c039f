//! Load/Capacity Validators.
//!
//! Pre-commit checks that run independently of the conflict model: faculty
//! weekly-hour caps, room capacity, availability windows and student credit
//! bands. Validators return violations; whether a violation blocks a write
//! is decided by the caller's [`LoadPolicy`].

pub mod availability;
pub mod credit;
pub mod load;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::domain::{Course, Faculty, Placement, Room, Student, TimetableEntry};

pub use availability::*;
pub use credit::*;
pub use load::*;

/// How a rule's violations are treated at commit time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Enforcement {
    /// Reject the write
    Block,
    /// Commit and report the violation
    #[default]
    Warn,
    /// Do not evaluate
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LoadRule {
    FacultyHours,
    RoomCapacity,
    Availability,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadPolicy {
    pub faculty_hours: Enforcement,
    pub room_capacity: Enforcement,
    pub availability: Enforcement,
}

impl LoadPolicy {
    /// Every rule rejects the write
    pub fn strict() -> Self {
        Self {
            faculty_hours: Enforcement::Block,
            room_capacity: Enforcement::Block,
            availability: Enforcement::Block,
        }
    }

    pub fn enforcement(&self, rule: LoadRule) -> Enforcement {
        match rule {
            LoadRule::FacultyHours => self.faculty_hours,
            LoadRule::RoomCapacity => self.room_capacity,
            LoadRule::Availability => self.availability,
        }
    }

    /// Split violations into (blocking, advisory); rules turned off are dropped
    pub fn partition(&self, violations: Vec<LoadViolation>) -> (Vec<LoadViolation>, Vec<LoadViolation>) {
        let mut blocking = Vec::new();
        let mut advisories = Vec::new();
        for violation in violations {
            match self.enforcement(violation.rule()) {
                Enforcement::Block => blocking.push(violation),
                Enforcement::Warn => advisories.push(violation),
                Enforcement::Off => {}
            }
        }
        (blocking, advisories)
    }
}

/// Records a candidate placement is checked against. Missing references are
/// `None` and their checks are skipped.
#[derive(Debug, Clone, Copy)]
pub struct LoadInputs<'a> {
    pub faculty: Option<&'a Faculty>,
    pub room: Option<&'a Room>,
    pub course: Option<&'a Course>,
    pub students: &'a [Student],
    /// Entries of the candidate's scenario
    pub scope: &'a [TimetableEntry],
}

/// Run every load validator against `candidate`
pub fn check_load(candidate: &Placement, inputs: &LoadInputs<'_>) -> Vec<LoadViolation> {
    let mut violations = Vec::new();

    if let Some(faculty) = inputs.faculty {
        violations.extend(check_faculty_hours(faculty, candidate, inputs.scope));
        violations.extend(check_faculty_availability(faculty, &candidate.slot));
    }
    if let Some(room) = inputs.room {
        let size = section_size(inputs.students, inputs.course, candidate.group());
        violations.extend(check_room_capacity(room, size));
        violations.extend(check_room_availability(room, &candidate.slot));
    }

    violations
}
