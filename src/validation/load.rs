use serde::Serialize;
use thiserror::Error;

use super::LoadRule;
use crate::domain::{Course, EntityId, Faculty, Placement, Room, Slot, Student, TimetableEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilitySubject {
    Faculty,
    Room,
}

/// A load or capacity rule broken by a candidate placement
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LoadViolation {
    #[error("faculty {faculty_id} would teach {scheduled_minutes} min/week, cap is {max_hours} h")]
    FacultyHoursExceeded {
        faculty_id: EntityId,
        scheduled_minutes: u32,
        max_hours: u32,
    },

    #[error("room {room_id} seats {capacity}, section has {section_size}")]
    RoomCapacityExceeded {
        room_id: EntityId,
        section_size: u32,
        capacity: u32,
    },

    #[error("{slot} is outside the availability of {id}")]
    OutsideAvailability {
        subject: AvailabilitySubject,
        id: EntityId,
        slot: Slot,
    },
}

impl LoadViolation {
    pub fn rule(&self) -> LoadRule {
        match self {
            LoadViolation::FacultyHoursExceeded { .. } => LoadRule::FacultyHours,
            LoadViolation::RoomCapacityExceeded { .. } => LoadRule::RoomCapacity,
            LoadViolation::OutsideAvailability { .. } => LoadRule::Availability,
        }
    }
}

/// Weekly minutes taught by `faculty_id` across `entries`, skipping `exclude`
pub fn faculty_minutes(faculty_id: &EntityId, entries: &[TimetableEntry], exclude: Option<&EntityId>) -> u32 {
    entries
        .iter()
        .filter(|e| &e.faculty_id == faculty_id && Some(&e.id) != exclude)
        .map(|e| e.slot().duration_minutes())
        .sum()
}

/// Faculty weekly load including the candidate. The candidate's previous
/// occurrence in `scope` is not counted twice.
pub fn check_faculty_hours(
    faculty: &Faculty,
    candidate: &Placement,
    scope: &[TimetableEntry],
) -> Option<LoadViolation> {
    let existing = faculty_minutes(&faculty.id, scope, candidate.entry_id.as_ref());
    let scheduled_minutes = existing + candidate.slot.duration_minutes();
    (scheduled_minutes > faculty.max_hours_per_week.saturating_mul(60)).then(|| LoadViolation::FacultyHoursExceeded {
        faculty_id: faculty.id.clone(),
        scheduled_minutes,
        max_hours: faculty.max_hours_per_week,
    })
}

/// Expected head count for a session: students whose section matches the
/// group, else the course's enrollment cap, else zero.
pub fn section_size(students: &[Student], course: Option<&Course>, group: Option<&str>) -> u32 {
    let members = group
        .map(|g| {
            students
                .iter()
                .filter(|s| s.section.as_deref().map(str::trim) == Some(g))
                .count() as u32
        })
        .unwrap_or(0);
    if members > 0 {
        return members;
    }
    course.and_then(|c| c.max_enrollment).unwrap_or(0)
}

pub fn check_room_capacity(room: &Room, section_size: u32) -> Option<LoadViolation> {
    (section_size > room.capacity).then(|| LoadViolation::RoomCapacityExceeded {
        room_id: room.id.clone(),
        section_size,
        capacity: room.capacity,
    })
}
