use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumString};
use validator::Validate;

use super::{Availability, EntityId};
use crate::error::DomainError;
use crate::store::{Record, UniqueKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoomType {
    Classroom,
    Lab,
    Auditorium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub capacity: u32,
    pub building: Option<String>,
    pub floor: Option<i32>,
    pub features: BTreeSet<String>,
    pub availability: Availability,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    #[validate(range(min = 1))]
    pub capacity: u32,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub features: BTreeSet<String>,
    #[serde(default)]
    pub availability: Availability,
}

impl NewRoom {
    pub fn new(name: impl Into<String>, room_type: RoomType, capacity: u32) -> Self {
        Self {
            name: name.into(),
            room_type,
            capacity,
            building: None,
            floor: None,
            features: BTreeSet::new(),
            availability: Availability::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub room_type: Option<RoomType>,
    pub capacity: Option<u32>,
    #[serde(deserialize_with = "super::types::deserialize_nullable", skip_serializing_if = "Option::is_none")]
    pub building: Option<Option<String>>,
    #[serde(deserialize_with = "super::types::deserialize_nullable", skip_serializing_if = "Option::is_none")]
    pub floor: Option<Option<i32>>,
    pub features: Option<BTreeSet<String>>,
    pub availability: Option<Availability>,
}

impl Record for Room {
    type New = NewRoom;
    type Patch = RoomPatch;
    const KIND: &'static str = "room";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn build(id: EntityId, created_at: DateTime<Utc>, new: NewRoom) -> Self {
        Self {
            id,
            name: new.name,
            room_type: new.room_type,
            capacity: new.capacity,
            building: new.building,
            floor: new.floor,
            features: new.features,
            availability: new.availability,
            created_at,
        }
    }

    fn apply(&mut self, patch: RoomPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.room_type {
            self.room_type = v;
        }
        if let Some(v) = patch.capacity {
            self.capacity = v;
        }
        if let Some(v) = patch.building {
            self.building = v;
        }
        if let Some(v) = patch.floor {
            self.floor = v;
        }
        if let Some(v) = patch.features {
            self.features = v;
        }
        if let Some(v) = patch.availability {
            self.availability = v;
        }
    }

    fn unique_key(&self) -> Option<UniqueKey<'_>> {
        Some(UniqueKey::new("name", &self.name))
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid("room name is required"));
        }
        if self.capacity == 0 {
            return Err(DomainError::invalid("room capacity must be positive"));
        }
        Ok(())
    }
}
