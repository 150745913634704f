//! Error types for the alumni data model.
//!
//! Every error here is per-operation and caller-recoverable except
//! `Store`, which wraps infrastructure failures (connection loss,
//! malformed rows) that propagate unchanged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("missing reference: {entity} {id} does not exist")]
    MissingReference { entity: &'static str, id: i64 },

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("not found: {entity} {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("delete restricted: {entity} {id} still has {dependent} rows")]
    RestrictedDelete {
        entity: &'static str,
        id: i64,
        dependent: &'static str,
    },

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl ModelError {
    /// Convenience constructor for field-level validation failures.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP status the (out-of-scope) transport layer would map this to.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::MissingReference { .. } => 422,
            Self::UniqueViolation(_) => 409,
            Self::NotFound { .. } => 404,
            Self::RestrictedDelete { .. } => 409,
            Self::InvalidTransition { .. } => 422,
            Self::Store(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_distinguishes_domain_errors() {
        assert_eq!(ModelError::validation("x").http_status(), 400);
        assert_eq!(
            ModelError::MissingReference { entity: "users", id: 9 }.http_status(),
            422
        );
        assert_eq!(
            ModelError::UniqueViolation("email".into()).http_status(),
            409
        );
        assert_eq!(
            ModelError::NotFound { entity: "articles", id: 1 }.http_status(),
            404
        );
        assert_eq!(
            ModelError::Store(anyhow::anyhow!("connection reset")).http_status(),
            500
        );
    }

    #[test]
    fn display_names_the_offending_entity() {
        let err = ModelError::RestrictedDelete {
            entity: "donation_programs",
            id: 4,
            dependent: "manual_donation_entries",
        };
        let msg = err.to_string();
        assert!(msg.contains("donation_programs"));
        assert!(msg.contains("manual_donation_entries"));
    }
}
