use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::SectionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// The field may never be written through the form surface.
    ImmutableField,
    /// The external field identifier does not map to any known field.
    UnknownField,
    /// A required field was empty on submit.
    RequiredField,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind:?}: {field}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub field: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, field: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
        }
    }

    pub fn immutable(field: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::ImmutableField, field)
    }

    pub fn required(field: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::RequiredField, field)
    }
}

/// Misuse of the draft editing protocol. These are caller errors, not
/// persistence failures; the committed record is never affected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("section is not in edit mode")]
    NotEditing,
    #[error("section is already in edit mode")]
    AlreadyEditing,
    #[error("section {active:?} is being edited; commit or cancel it first")]
    SectionLocked { active: SectionId },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
