//! Domain error model.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type used across the analytics layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures caused by caller input
/// (validation, bad windows, bad parameters). Source and IO failures belong
/// to the infra crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed query parameter).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A date window whose start lies after its end.
    #[error("invalid date window: {start} is after {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    /// Quantile cutoffs outside `[0, 1]` or not ordered.
    #[error("invalid quantile cutoffs: {0}")]
    InvalidQuantiles(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_quantiles(msg: impl Into<String>) -> Self {
        Self::InvalidQuantiles(msg.into())
    }
}
