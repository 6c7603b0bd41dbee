//! Application error type shared by the domain and service layers.

use serde_json::Value;
use thiserror::Error;

/// Errors produced by game, guess and service operations.
///
/// Every variant is returned before any state is mutated, so a failed
/// operation never leaves a partially recorded game or guess behind.
#[derive(Debug, Error)]
pub enum AppError {
    /// A named input property failed validation.
    #[error("{property} {message}")]
    Validation {
        property: &'static str,
        message: String,
    },

    /// A guess was submitted against a game that is already solved.
    #[error("Game already solved")]
    AlreadySolved,

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_property(property: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            property,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::AlreadySolved => "already_solved",
            AppError::NotFound { .. } => "not_found",
            AppError::Internal { .. } => "internal_error",
        }
    }

    /// Returns the offending property name for validation errors.
    pub fn property(&self) -> Option<&'static str> {
        match self {
            AppError::Validation { property, .. } => Some(property),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_display_joins_property_and_message() {
        let err = AppError::invalid_property("pool", "must not be empty");
        assert_eq!(err.to_string(), "pool must not be empty");
        assert_eq!(err.property(), Some("pool"));
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn test_codes() {
        assert_eq!(AppError::AlreadySolved.code(), "already_solved");
        assert_eq!(
            AppError::not_found("Game not found", json!({})).code(),
            "not_found"
        );
        assert_eq!(
            AppError::internal("boom", json!({})).code(),
            "internal_error"
        );
    }

    #[test]
    fn test_property_absent_for_non_validation() {
        assert!(AppError::AlreadySolved.property().is_none());
    }
}
