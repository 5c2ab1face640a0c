//! Domain error type shared by every crate in the workspace.

use crate::types::DbId;

/// Errors raised by domain logic, independent of transport.
///
/// The API layer maps each variant onto an HTTP status; the CLI simply
/// prints them.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A write referenced a parent row (genus, species, ...) that does not exist.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

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
    /// Shorthand for a [`CoreError::Validation`] built from anything displayable.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
