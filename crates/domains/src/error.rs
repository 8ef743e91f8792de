//! # AppError
//!
//! Centralized error handling for the Critica ecosystem.
//! Maps domain-specific failures to actionable error types.

use serde::Serialize;
use thiserror::Error;

/// A single rejected input field, as carried in validation failures and
/// surfaced to clients in 400 response bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
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

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Title, Review, Comment), including
    /// lookups scoped to the wrong parent.
    #[error("{0} not found with ID {1}")]
    NotFound(&'static str, String),

    /// Input rejected (e.g., score out of bounds, duplicate review)
    #[error("validation error: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    /// Missing or unusable credentials
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the role/ownership rules deny the action
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Storage-level constraint violation (unique or foreign key); the
    /// service layer translates this into a validation outcome.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (e.g., DB down)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        AppError::NotFound(resource, id.to_string())
    }

    /// Shorthand for a single-field validation failure.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }
}

/// A specialized Result type for Critica logic.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_lists_fields() {
        let err = AppError::Validation(vec![
            FieldError::new("score", "must be between 1 and 10"),
            FieldError::new("text", "must not be empty"),
        ]);
        let rendered = err.to_string();
        assert!(rendered.contains("score: must be between 1 and 10"));
        assert!(rendered.contains("text: must not be empty"));
    }

    #[test]
    fn not_found_names_the_resource() {
        let err = AppError::not_found("review", 42);
        assert_eq!(err.to_string(), "review not found with ID 42");
    }
}
