use lotto_core::{SettleError, TierError, ValidationErrors};
use schemars::JsonSchema;
use serde::Serialize;

use crate::models::UserError;

/// One rejected input field.
#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    /// Every rejected field, never only the first.
    #[error("validation failed: {}", format_fields(.0))]
    Invalid(Vec<FieldError>),
    #[error("{0}")]
    Conflict(String),
    /// Caller bug, not retryable.
    #[error("{0}")]
    Mismatch(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

fn format_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ServiceError {
    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{what} {id} not found"))
    }

    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Invalid(vec![FieldError::new(field, message)])
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

impl From<diesel::result::Error> for ServiceError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Internal(anyhow::Error::new(error))
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(
            errors
                .iter()
                .map(|e| FieldError::new(e.field(), e.to_string()))
                .collect(),
        )
    }
}

impl From<Vec<UserError>> for ServiceError {
    fn from(errors: Vec<UserError>) -> Self {
        Self::Invalid(
            errors
                .iter()
                .map(|e| FieldError::new(e.field(), e.to_string()))
                .collect(),
        )
    }
}

impl From<TierError> for ServiceError {
    fn from(error: TierError) -> Self {
        Self::invalid("categories", error.to_string())
    }
}

impl From<SettleError> for ServiceError {
    fn from(error: SettleError) -> Self {
        match error {
            SettleError::GameTypeMismatch { .. } => Self::Mismatch(error.to_string()),
            SettleError::NotValidated { .. } => Self::Internal(anyhow::Error::new(error)),
        }
    }
}
