use thiserror::Error;

use crate::schedule::Conflict;
use crate::validation::LoadViolation;

/// Domain error taxonomy shared by the store, the conflict model and the
/// planner. An outer transport maps these kinds onto responses.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("duplicate {entity} {field}: {value}")]
    DuplicateKey {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("slot conflicts with {} existing entries", .0.len())]
    Conflict(Vec<Conflict>),

    #[error("capacity exceeded: {} violation(s)", .0.len())]
    CapacityExceeded(Vec<LoadViolation>),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        DomainError::InvalidInput(message.into())
    }

    /// Stable kind string for this error
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "NotFound",
            DomainError::DuplicateKey { .. } => "DuplicateKey",
            DomainError::InvalidInput(_) => "InvalidInput",
            DomainError::Conflict(_) => "Conflict",
            DomainError::CapacityExceeded(_) => "CapacityExceeded",
        }
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::InvalidInput(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityId;
    use crate::schedule::ConflictDimension;

    #[test]
    fn test_error_kinds() {
        assert_eq!(DomainError::not_found("room", "r1").kind(), "NotFound");
        assert_eq!(DomainError::invalid("bad").kind(), "InvalidInput");
        assert_eq!(DomainError::CapacityExceeded(vec![]).kind(), "CapacityExceeded");
    }

    #[test]
    fn test_error_display() {
        let error = DomainError::DuplicateKey {
            entity: "course",
            field: "code",
            value: "EDU101".to_string(),
        };
        assert_eq!(error.to_string(), "duplicate course code: EDU101");

        let conflict = DomainError::Conflict(vec![Conflict {
            dimension: ConflictDimension::Room,
            entry_id: EntityId::from("e1"),
        }]);
        assert_eq!(conflict.to_string(), "slot conflicts with 1 existing entries");
    }
}
