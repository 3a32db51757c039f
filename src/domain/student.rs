use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

use super::types::check_email;
use super::EntityId;
use crate::error::DomainError;
use crate::store::{Record, UniqueKey};

/// Degree programme a student is enrolled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Program {
    #[serde(rename = "B.Ed.")]
    #[strum(serialize = "B.Ed.")]
    BEd,
    #[serde(rename = "M.Ed.")]
    #[strum(serialize = "M.Ed.")]
    MEd,
    #[serde(rename = "FYUP")]
    #[strum(serialize = "FYUP")]
    Fyup,
    #[serde(rename = "ITEP")]
    #[strum(serialize = "ITEP")]
    Itep,
}

/// Course preference lists by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub majors: Vec<String>,
    #[serde(default)]
    pub minors: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub aec: Vec<String>,
    #[serde(default)]
    pub vac: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: EntityId,
    pub roll_no: String,
    pub name: String,
    pub email: Option<String>,
    pub program: Program,
    pub semester: u32,
    pub total_credits: u32,
    pub preferences: Preferences,
    pub section: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    #[validate(length(min = 1))]
    pub roll_no: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,
    pub program: Program,
    #[validate(range(min = 1))]
    pub semester: u32,
    #[serde(default)]
    pub total_credits: u32,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub section: Option<String>,
}

impl NewStudent {
    pub fn new(roll_no: impl Into<String>, name: impl Into<String>, program: Program, semester: u32) -> Self {
        Self {
            roll_no: roll_no.into(),
            name: name.into(),
            email: None,
            program,
            semester,
            total_credits: 0,
            preferences: Preferences::default(),
            section: None,
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_credits(mut self, total_credits: u32) -> Self {
        self.total_credits = total_credits;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentPatch {
    pub roll_no: Option<String>,
    pub name: Option<String>,
    #[serde(deserialize_with = "super::types::deserialize_nullable", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    pub program: Option<Program>,
    pub semester: Option<u32>,
    pub total_credits: Option<u32>,
    pub preferences: Option<Preferences>,
    #[serde(deserialize_with = "super::types::deserialize_nullable", skip_serializing_if = "Option::is_none")]
    pub section: Option<Option<String>>,
}

impl Record for Student {
    type New = NewStudent;
    type Patch = StudentPatch;
    const KIND: &'static str = "student";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn build(id: EntityId, created_at: DateTime<Utc>, new: NewStudent) -> Self {
        Self {
            id,
            roll_no: new.roll_no,
            name: new.name,
            email: new.email,
            program: new.program,
            semester: new.semester,
            total_credits: new.total_credits,
            preferences: new.preferences,
            section: new.section,
            created_at,
        }
    }

    fn apply(&mut self, patch: StudentPatch) {
        if let Some(v) = patch.roll_no {
            self.roll_no = v;
        }
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.program {
            self.program = v;
        }
        if let Some(v) = patch.semester {
            self.semester = v;
        }
        if let Some(v) = patch.total_credits {
            self.total_credits = v;
        }
        if let Some(v) = patch.preferences {
            self.preferences = v;
        }
        if let Some(v) = patch.section {
            self.section = v;
        }
    }

    fn unique_key(&self) -> Option<UniqueKey<'_>> {
        Some(UniqueKey::new("rollNo", &self.roll_no))
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.roll_no.trim().is_empty() || self.name.trim().is_empty() {
            return Err(DomainError::invalid("student rollNo and name are required"));
        }
        if self.semester == 0 {
            return Err(DomainError::invalid("semester must be positive"));
        }
        check_email(self.email.as_deref())
    }
}
