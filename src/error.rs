//! Error types for the projection engine

use thiserror::Error;

/// Errors raised by the projection engine
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    /// A required parameter is structurally invalid (zero horizon, non-finite value,
    /// non-positive divisor)
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },
}

impl ProjectionError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ProjectionError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ProjectionError::InvalidParameter { field, .. } => field,
        }
    }
}
