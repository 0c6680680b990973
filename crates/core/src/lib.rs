//! Shared primitives for all Rust crates in Galley.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use auth::VerifiedUser;

/// Result type used across Galley crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Identity-provider user identifier; also the primary key of a profile row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Creates a user identifier, rejecting blank values.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("user id must not be empty".to_owned()));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but blocked by role policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A server-side secret or integration setting is absent.
    #[error("not configured: {0}")]
    Configuration(String),

    /// A vendor API answered with a failure or could not be reached.
    #[error("upstream error: {message}")]
    Upstream {
        /// Summary of the failed upstream call.
        message: String,
        /// Vendor response body, kept for diagnostics.
        details: Option<Value>,
    },

    /// A dependency required to verify the caller is unreachable.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds an upstream error without a vendor body.
    #[must_use]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString, UserId};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn user_id_is_trimmed() {
        let user_id = UserId::new("  u1 ");
        assert!(user_id.is_ok());
        assert_eq!(
            user_id.map(|value| value.to_string()).unwrap_or_default(),
            "u1"
        );
    }

    #[test]
    fn user_id_rejects_blank_values() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("\t").is_err());
    }

    #[test]
    fn upstream_error_formats_message_only() {
        let error = AppError::Upstream {
            message: "records vendor returned 422".to_owned(),
            details: Some(serde_json::json!({"error": "INVALID_FILTER"})),
        };
        assert_eq!(
            error.to_string(),
            "upstream error: records vendor returned 422"
        );
    }
}
