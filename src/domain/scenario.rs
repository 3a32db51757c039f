use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::EntityId;
use crate::error::DomainError;
use crate::store::Record;

/// Summary health indicators of a scenario. Scores are percentages in [0, 100].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub conflicts: u32,
    pub student_satisfaction: u8,
    pub faculty_balance: u8,
    pub room_utilization: u8,
}

impl Metrics {
    pub fn check(&self) -> Result<(), DomainError> {
        let scores = [
            ("studentSatisfaction", self.student_satisfaction),
            ("facultyBalance", self.faculty_balance),
            ("roomUtilization", self.room_utilization),
        ];
        for (name, value) in scores {
            if value > 100 {
                return Err(DomainError::invalid(format!("{name} must be within 0-100, got {value}")));
            }
        }
        Ok(())
    }
}

/// A named, independently trackable version of the weekly timetable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub metrics: Metrics,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewScenario {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub metrics: Metrics,
}

impl NewScenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_active: false,
            metrics: Metrics::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn active(mut self) -> Self {
        self.is_active = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenarioPatch {
    pub name: Option<String>,
    #[serde(deserialize_with = "super::types::deserialize_nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub metrics: Option<Metrics>,
}

impl ScenarioPatch {
    pub fn activate() -> Self {
        Self {
            is_active: Some(true),
            ..Default::default()
        }
    }

    pub fn metrics(metrics: Metrics) -> Self {
        Self {
            metrics: Some(metrics),
            ..Default::default()
        }
    }
}

impl Record for Scenario {
    type New = NewScenario;
    type Patch = ScenarioPatch;
    const KIND: &'static str = "scenario";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn build(id: EntityId, created_at: DateTime<Utc>, new: NewScenario) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            is_active: new.is_active,
            metrics: new.metrics,
            created_at,
        }
    }

    fn apply(&mut self, patch: ScenarioPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.is_active {
            self.is_active = v;
        }
        if let Some(v) = patch.metrics {
            self.metrics = v;
        }
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid("scenario name is required"));
        }
        self.metrics.check()
    }

    // At most one scenario may be active.
    fn holds_exclusive_flag(&self) -> bool {
        self.is_active
    }

    fn release_exclusive_flag(&mut self) {
        self.is_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_bounds() {
        let ok = Metrics {
            conflicts: 3,
            student_satisfaction: 100,
            faculty_balance: 0,
            room_utilization: 55,
        };
        assert!(ok.check().is_ok());

        let bad = Metrics {
            room_utilization: 101,
            ..ok
        };
        assert!(bad.check().is_err());
    }

    #[test]
    fn test_metrics_wire_shape() {
        let json = serde_json::to_value(Metrics::default()).unwrap();
        assert_eq!(json["studentSatisfaction"], 0);
        assert_eq!(json["roomUtilization"], 0);
    }
}
