use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{EntityId, Slot, TimeOfDay};
use crate::error::DomainError;
use crate::store::Record;

/// One scheduled class meeting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub id: EntityId,
    /// `None` means the entry is not scoped to any scenario
    pub scenario_id: Option<EntityId>,
    pub course_id: EntityId,
    pub faculty_id: EntityId,
    pub room_id: EntityId,
    pub student_group: Option<String>,
    pub day_of_week: u8,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub created_at: DateTime<Utc>,
}

impl TimetableEntry {
    pub fn slot(&self) -> Slot {
        Slot {
            day_of_week: self.day_of_week,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    pub fn placement(&self) -> Placement {
        Placement {
            entry_id: Some(self.id.clone()),
            scenario_id: self.scenario_id.clone(),
            course_id: self.course_id.clone(),
            faculty_id: self.faculty_id.clone(),
            room_id: self.room_id.clone(),
            student_group: self.student_group.clone(),
            slot: self.slot(),
        }
    }

    pub fn in_scope(&self, scenario_id: Option<&EntityId>) -> bool {
        self.scenario_id.as_ref() == scenario_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTimetableEntry {
    #[serde(default)]
    pub scenario_id: Option<EntityId>,
    pub course_id: EntityId,
    pub faculty_id: EntityId,
    pub room_id: EntityId,
    #[serde(default)]
    pub student_group: Option<String>,
    #[validate(range(max = 6))]
    pub day_of_week: u8,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl NewTimetableEntry {
    pub fn new(
        scenario_id: Option<EntityId>,
        course_id: EntityId,
        faculty_id: EntityId,
        room_id: EntityId,
        slot: Slot,
    ) -> Self {
        Self {
            scenario_id,
            course_id,
            faculty_id,
            room_id,
            student_group: None,
            day_of_week: slot.day_of_week,
            start_time: slot.start_time,
            end_time: slot.end_time,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.student_group = Some(group.into());
        self
    }

    pub fn slot(&self) -> Slot {
        Slot {
            day_of_week: self.day_of_week,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    pub fn placement(&self) -> Placement {
        Placement {
            entry_id: None,
            scenario_id: self.scenario_id.clone(),
            course_id: self.course_id.clone(),
            faculty_id: self.faculty_id.clone(),
            room_id: self.room_id.clone(),
            student_group: self.student_group.clone(),
            slot: self.slot(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimetableEntryPatch {
    #[serde(deserialize_with = "super::types::deserialize_nullable", skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<Option<EntityId>>,
    pub course_id: Option<EntityId>,
    pub faculty_id: Option<EntityId>,
    pub room_id: Option<EntityId>,
    #[serde(deserialize_with = "super::types::deserialize_nullable", skip_serializing_if = "Option::is_none")]
    pub student_group: Option<Option<String>>,
    pub day_of_week: Option<u8>,
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
}

impl TimetableEntryPatch {
    /// Patch that only relocates the entry to another slot
    pub fn reschedule(slot: Slot) -> Self {
        Self {
            day_of_week: Some(slot.day_of_week),
            start_time: Some(slot.start_time),
            end_time: Some(slot.end_time),
            ..Default::default()
        }
    }
}

impl Record for TimetableEntry {
    type New = NewTimetableEntry;
    type Patch = TimetableEntryPatch;
    const KIND: &'static str = "timetable entry";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn build(id: EntityId, created_at: DateTime<Utc>, new: NewTimetableEntry) -> Self {
        Self {
            id,
            scenario_id: new.scenario_id,
            course_id: new.course_id,
            faculty_id: new.faculty_id,
            room_id: new.room_id,
            student_group: new.student_group,
            day_of_week: new.day_of_week,
            start_time: new.start_time,
            end_time: new.end_time,
            created_at,
        }
    }

    fn apply(&mut self, patch: TimetableEntryPatch) {
        if let Some(v) = patch.scenario_id {
            self.scenario_id = v;
        }
        if let Some(v) = patch.course_id {
            self.course_id = v;
        }
        if let Some(v) = patch.faculty_id {
            self.faculty_id = v;
        }
        if let Some(v) = patch.room_id {
            self.room_id = v;
        }
        if let Some(v) = patch.student_group {
            self.student_group = v;
        }
        if let Some(v) = patch.day_of_week {
            self.day_of_week = v;
        }
        if let Some(v) = patch.start_time {
            self.start_time = v;
        }
        if let Some(v) = patch.end_time {
            self.end_time = v;
        }
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.course_id.is_empty() || self.faculty_id.is_empty() || self.room_id.is_empty() {
            return Err(DomainError::invalid("courseId, facultyId and roomId are required"));
        }
        self.slot().check()
    }
}

/// Where an entry sits, or would sit: the input of the conflict model and
/// the load validators. `entry_id` is `None` for an entry not yet created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub entry_id: Option<EntityId>,
    pub scenario_id: Option<EntityId>,
    pub course_id: EntityId,
    pub faculty_id: EntityId,
    pub room_id: EntityId,
    pub student_group: Option<String>,
    pub slot: Slot,
}

impl Placement {
    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slot = slot;
        self
    }

    /// Whether `entry` is the same row as this placement
    pub fn is_entry(&self, entry: &TimetableEntry) -> bool {
        self.entry_id.as_ref() == Some(&entry.id)
    }

    /// Non-blank student group, if any
    pub fn group(&self) -> Option<&str> {
        normalized_group(self.student_group.as_deref())
    }
}

pub(crate) fn normalized_group(group: Option<&str>) -> Option<&str> {
    group.map(str::trim).filter(|g| !g.is_empty())
}
