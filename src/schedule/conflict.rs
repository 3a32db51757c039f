use serde::{Deserialize, Serialize};
use strum::Display;

use crate::domain::{normalized_group, EntityId, Placement, Slot, TimetableEntry};
use crate::error::DomainError;

/// Scope on which two entries compete for the same time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConflictDimension {
    Room,
    Faculty,
    Group,
}

/// An existing entry that collides with a candidate on one dimension
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub dimension: ConflictDimension,
    pub entry_id: EntityId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictResult {
    pub conflicts: Vec<Conflict>,
}

impl ConflictResult {
    /// Empty result: the candidate may be committed
    pub fn is_clear(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn on(&self, dimension: ConflictDimension) -> impl Iterator<Item = &Conflict> {
        self.conflicts.iter().filter(move |c| c.dimension == dimension)
    }

    /// Distinct conflicting entries, in the order first reported
    pub fn entry_ids(&self) -> Vec<&EntityId> {
        let mut ids: Vec<&EntityId> = Vec::new();
        for c in &self.conflicts {
            if !ids.contains(&&c.entry_id) {
                ids.push(&c.entry_id);
            }
        }
        ids
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_clear() {
            Ok(())
        } else {
            Err(DomainError::Conflict(self.conflicts))
        }
    }
}

/// Two entries that conflict, with every dimension they share
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictPair {
    pub first: EntityId,
    pub second: EntityId,
    pub dimensions: Vec<ConflictDimension>,
}

struct ScopeKeys<'a> {
    room: &'a EntityId,
    faculty: &'a EntityId,
    group: Option<&'a str>,
    slot: Slot,
}

impl<'a> From<&'a Placement> for ScopeKeys<'a> {
    fn from(p: &'a Placement) -> Self {
        Self {
            room: &p.room_id,
            faculty: &p.faculty_id,
            group: p.group(),
            slot: p.slot,
        }
    }
}

impl<'a> From<&'a TimetableEntry> for ScopeKeys<'a> {
    fn from(e: &'a TimetableEntry) -> Self {
        Self {
            room: &e.room_id,
            faculty: &e.faculty_id,
            group: normalized_group(e.student_group.as_deref()),
            slot: e.slot(),
        }
    }
}

/// Dimensions on which `a` and `b` collide. Empty when the slots do not
/// overlap. Entries without a student group never collide on the group
/// dimension.
fn colliding_dimensions(a: &ScopeKeys<'_>, b: &ScopeKeys<'_>) -> Vec<ConflictDimension> {
    if !a.slot.overlaps(&b.slot) {
        return Vec::new();
    }
    let mut dims = Vec::with_capacity(3);
    if a.room == b.room {
        dims.push(ConflictDimension::Room);
    }
    if a.faculty == b.faculty {
        dims.push(ConflictDimension::Faculty);
    }
    if let (Some(ga), Some(gb)) = (a.group, b.group) {
        if ga == gb {
            dims.push(ConflictDimension::Group);
        }
    }
    dims
}

/// Entries in `existing` that conflict with `candidate`, one item per
/// colliding dimension. The candidate's own row is skipped.
///
/// Pure: the caller picks the comparison set, normally every entry of the
/// candidate's scenario.
pub fn check_conflict(candidate: &Placement, existing: &[TimetableEntry]) -> ConflictResult {
    let keys = ScopeKeys::from(candidate);
    let conflicts = existing
        .iter()
        .filter(|entry| !candidate.is_entry(entry))
        .flat_map(|entry| {
            colliding_dimensions(&keys, &ScopeKeys::from(entry))
                .into_iter()
                .map(move |dimension| Conflict {
                    dimension,
                    entry_id: entry.id.clone(),
                })
        })
        .collect();
    ConflictResult { conflicts }
}

/// Conflict check for relocating `entry` to `target`
pub fn check_move(entry: &TimetableEntry, target: Slot, scope: &[TimetableEntry]) -> ConflictResult {
    check_conflict(&entry.placement().with_slot(target), scope)
}

/// Every conflicting pair in `entries`, each pair reported once
pub fn conflicting_pairs(entries: &[TimetableEntry]) -> Vec<ConflictPair> {
    let keys: Vec<ScopeKeys<'_>> = entries.iter().map(ScopeKeys::from).collect();
    let mut pairs = Vec::new();
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let dimensions = colliding_dimensions(&keys[i], &keys[j]);
            if !dimensions.is_empty() {
                pairs.push(ConflictPair {
                    first: entries[i].id.clone(),
                    second: entries[j].id.clone(),
                    dimensions,
                });
            }
        }
    }
    pairs
}

pub fn count_conflicting_pairs(entries: &[TimetableEntry]) -> u32 {
    conflicting_pairs(entries).len() as u32
}
