use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

use super::types::{check_email, require_text};
use super::{Availability, EntityId};
use crate::error::DomainError;
use crate::store::{Record, UniqueKey};

pub const DEFAULT_MAX_HOURS_PER_WEEK: u32 = 20;

fn default_max_hours() -> u32 {
    DEFAULT_MAX_HOURS_PER_WEEK
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub id: EntityId,
    pub employee_id: String,
    pub name: String,
    pub email: Option<String>,
    pub department: String,
    pub expertise: BTreeSet<String>,
    pub max_hours_per_week: u32,
    /// Weekly teaching hours in the active scenario
    pub current_hours: u32,
    pub availability: Availability,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewFaculty {
    #[validate(length(min = 1))]
    pub employee_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub department: String,
    #[serde(default)]
    pub expertise: BTreeSet<String>,
    #[validate(range(min = 1))]
    #[serde(default = "default_max_hours")]
    pub max_hours_per_week: u32,
    #[serde(default)]
    pub current_hours: u32,
    #[serde(default)]
    pub availability: Availability,
}

impl NewFaculty {
    pub fn new(employee_id: impl Into<String>, name: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            name: name.into(),
            email: None,
            department: department.into(),
            expertise: BTreeSet::new(),
            max_hours_per_week: DEFAULT_MAX_HOURS_PER_WEEK,
            current_hours: 0,
            availability: Availability::new(),
        }
    }

    pub fn with_max_hours(mut self, hours: u32) -> Self {
        self.max_hours_per_week = hours;
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FacultyPatch {
    pub employee_id: Option<String>,
    pub name: Option<String>,
    #[serde(deserialize_with = "super::types::deserialize_nullable", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    pub department: Option<String>,
    pub expertise: Option<BTreeSet<String>>,
    pub max_hours_per_week: Option<u32>,
    pub current_hours: Option<u32>,
    pub availability: Option<Availability>,
}

impl Record for Faculty {
    type New = NewFaculty;
    type Patch = FacultyPatch;
    const KIND: &'static str = "faculty";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn build(id: EntityId, created_at: DateTime<Utc>, new: NewFaculty) -> Self {
        Self {
            id,
            employee_id: new.employee_id,
            name: new.name,
            email: new.email,
            department: new.department,
            expertise: new.expertise,
            max_hours_per_week: new.max_hours_per_week,
            current_hours: new.current_hours,
            availability: new.availability,
            created_at,
        }
    }

    fn apply(&mut self, patch: FacultyPatch) {
        if let Some(v) = patch.employee_id {
            self.employee_id = v;
        }
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.department {
            self.department = v;
        }
        if let Some(v) = patch.expertise {
            self.expertise = v;
        }
        if let Some(v) = patch.max_hours_per_week {
            self.max_hours_per_week = v;
        }
        if let Some(v) = patch.current_hours {
            self.current_hours = v;
        }
        if let Some(v) = patch.availability {
            self.availability = v;
        }
    }

    fn unique_key(&self) -> Option<UniqueKey<'_>> {
        Some(UniqueKey::new("employeeId", &self.employee_id))
    }

    fn check(&self) -> Result<(), DomainError> {
        require_text("employeeId", &self.employee_id)?;
        require_text("name", &self.name)?;
        require_text("department", &self.department)?;
        check_email(self.email.as_deref())?;
        if self.max_hours_per_week == 0 {
            return Err(DomainError::invalid("maxHoursPerWeek must be positive"));
        }
        Ok(())
    }
}
