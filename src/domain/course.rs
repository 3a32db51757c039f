use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

use super::EntityId;
use crate::error::DomainError;
use crate::store::{Record, UniqueKey};

/// Curriculum category of a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum CourseType {
    Major,
    Minor,
    Skill,
    #[serde(rename = "AEC")]
    #[strum(serialize = "AEC")]
    Aec,
    #[serde(rename = "VAC")]
    #[strum(serialize = "VAC")]
    Vac,
    Lab,
    #[serde(rename = "TP")]
    #[strum(serialize = "TP")]
    Tp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: EntityId,
    pub code: String,
    pub title: String,
    pub credits: u32,
    #[serde(rename = "type")]
    pub course_type: CourseType,
    pub theory_hours: u32,
    pub practical_hours: u32,
    pub max_enrollment: Option<u32>,
    /// Course codes that must be completed first
    pub prerequisites: Vec<String>,
    pub department: Option<String>,
    pub semester: Option<u32>,
    pub is_elective: bool,
    pub created_at: DateTime<Utc>,
}

impl Course {
    pub fn weekly_contact_hours(&self) -> u32 {
        self.theory_hours + self.practical_hours
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    #[validate(length(min = 1))]
    pub code: String,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(range(min = 1))]
    pub credits: u32,
    #[serde(rename = "type")]
    pub course_type: CourseType,
    #[serde(default)]
    pub theory_hours: u32,
    #[serde(default)]
    pub practical_hours: u32,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub max_enrollment: Option<u32>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub semester: Option<u32>,
    #[serde(default)]
    pub is_elective: bool,
}

impl NewCourse {
    pub fn new(code: impl Into<String>, title: impl Into<String>, credits: u32, course_type: CourseType) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            credits,
            course_type,
            theory_hours: 0,
            practical_hours: 0,
            max_enrollment: None,
            prerequisites: Vec::new(),
            department: None,
            semester: None,
            is_elective: false,
        }
    }

    pub fn with_max_enrollment(mut self, max: u32) -> Self {
        self.max_enrollment = Some(max);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoursePatch {
    pub code: Option<String>,
    pub title: Option<String>,
    pub credits: Option<u32>,
    #[serde(rename = "type")]
    pub course_type: Option<CourseType>,
    pub theory_hours: Option<u32>,
    pub practical_hours: Option<u32>,
    #[serde(deserialize_with = "super::types::deserialize_nullable", skip_serializing_if = "Option::is_none")]
    pub max_enrollment: Option<Option<u32>>,
    pub prerequisites: Option<Vec<String>>,
    #[serde(deserialize_with = "super::types::deserialize_nullable", skip_serializing_if = "Option::is_none")]
    pub department: Option<Option<String>>,
    #[serde(deserialize_with = "super::types::deserialize_nullable", skip_serializing_if = "Option::is_none")]
    pub semester: Option<Option<u32>>,
    pub is_elective: Option<bool>,
}

impl Record for Course {
    type New = NewCourse;
    type Patch = CoursePatch;
    const KIND: &'static str = "course";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn build(id: EntityId, created_at: DateTime<Utc>, new: NewCourse) -> Self {
        Self {
            id,
            code: new.code,
            title: new.title,
            credits: new.credits,
            course_type: new.course_type,
            theory_hours: new.theory_hours,
            practical_hours: new.practical_hours,
            max_enrollment: new.max_enrollment,
            prerequisites: new.prerequisites,
            department: new.department,
            semester: new.semester,
            is_elective: new.is_elective,
            created_at,
        }
    }

    fn apply(&mut self, patch: CoursePatch) {
        if let Some(v) = patch.code {
            self.code = v;
        }
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.credits {
            self.credits = v;
        }
        if let Some(v) = patch.course_type {
            self.course_type = v;
        }
        if let Some(v) = patch.theory_hours {
            self.theory_hours = v;
        }
        if let Some(v) = patch.practical_hours {
            self.practical_hours = v;
        }
        if let Some(v) = patch.max_enrollment {
            self.max_enrollment = v;
        }
        if let Some(v) = patch.prerequisites {
            self.prerequisites = v;
        }
        if let Some(v) = patch.department {
            self.department = v;
        }
        if let Some(v) = patch.semester {
            self.semester = v;
        }
        if let Some(v) = patch.is_elective {
            self.is_elective = v;
        }
    }

    fn unique_key(&self) -> Option<UniqueKey<'_>> {
        Some(UniqueKey::new("code", &self.code))
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.code.trim().is_empty() || self.title.trim().is_empty() {
            return Err(DomainError::invalid("course code and title are required"));
        }
        if self.credits == 0 {
            return Err(DomainError::invalid("credits must be positive"));
        }
        if self.max_enrollment == Some(0) {
            return Err(DomainError::invalid("maxEnrollment must be positive"));
        }
        Ok(())
    }
}
