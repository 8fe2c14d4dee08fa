//! Domain-level error taxonomy shared by all crates.

use crate::types::DbId;

/// Domain errors produced below the HTTP layer.
///
/// The API crate maps these onto HTTP statuses; repository code returns
/// `Ok(None)` for missing single records and reserves [`CoreError::NotFound`]
/// for callers that require the entity to exist.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity id did not resolve where the caller required it to.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Caller input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with existing state (e.g. duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Invariant violation or unexpected internal failure.
    ///
    /// Also covers the consistency-violation case where a read immediately
    /// following a write inside the same transaction returns nothing.
    #[error("Internal error: {0}")]
    Internal(String),
}
