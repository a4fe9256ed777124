/// Core failure taxonomy
///
/// Every lifecycle operation returns `Result<T, CoreError>`. The variants
/// are transport-agnostic; the HTTP layer maps them onto status codes.
///
/// Two deliberate properties of the taxonomy:
///
/// - `NotFound` covers both "does not exist" and "exists but is not
///   visible to the caller", so callers cannot probe for the existence of
///   entities they may not see.
/// - `Forbidden` is only produced on paths where visibility was already
///   established (e.g. a project member without mutation rights), so it
///   never leaks existence either.

use crate::store::StoreError;

/// Result alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Failure returned by the lifecycle services
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed or out-of-bounds input; names the offending field
    #[error("{field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    /// Entity absent or not visible to the caller
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Entity visible but the caller lacks mutation rights
    #[error("{0}")]
    Forbidden(&'static str),

    /// Duplicate membership or duplicate unique field
    #[error("{0}")]
    Conflict(String),

    /// Persistence failure; detail is logged, never shown to callers
    #[error("storage failure: {0}")]
    Storage(String),
}

impl CoreError {
    /// Builds a validation failure for a named field
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        CoreError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => CoreError::Conflict(format!("duplicate value for {field}")),
            other => CoreError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::validation("name", "must not be empty");
        assert_eq!(err.to_string(), "name: must not be empty");

        let err = CoreError::NotFound("project");
        assert_eq!(err.to_string(), "project not found");
    }

    #[test]
    fn test_duplicate_store_error_becomes_conflict() {
        let err = CoreError::from(StoreError::Duplicate("email"));
        assert!(matches!(err, CoreError::Conflict(_)));
        assert!(err.to_string().contains("email"));
    }
}
