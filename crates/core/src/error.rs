//! Domain error type shared by the repository and HTTP layers.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The target resource is in a state that does not allow the operation.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build a [`CoreError::Conflict`] describing a rejected status change.
    pub fn invalid_transition(entity: &str, action: &str, current: &str) -> Self {
        CoreError::Conflict(format!(
            "Cannot {action} {entity} while it is '{current}'"
        ))
    }
}
