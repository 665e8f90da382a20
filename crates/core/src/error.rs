//! Domain error model.

use thiserror::Error;

use crate::entity::EntityKind;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// identity collisions, missing or dangling references). Storage and I/O
/// concerns belong to the infrastructure crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field value failed validation (empty name, negative age, bad email...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier is already taken within its entity type.
    #[error("{kind} already exists: {id}")]
    DuplicateKey { kind: EntityKind, id: String },

    /// An operation referenced an identifier that does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// A stored link points at an entity that does not exist.
    #[error("dangling reference: {0}")]
    Reference(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn duplicate(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::DuplicateKey {
            kind,
            id: id.into(),
        }
    }

    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn reference(msg: impl Into<String>) -> Self {
        Self::Reference(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_entity_kind_and_id() {
        let err = DomainError::duplicate(EntityKind::Student, "S1");
        assert_eq!(err.to_string(), "student already exists: S1");

        let err = DomainError::not_found(EntityKind::Course, "C9");
        assert_eq!(err.to_string(), "course not found: C9");
    }
}
