use thiserror::Error;

/// Errors produced by the calculation core.
///
/// Data-store failures never appear here: handlers propagate `sqlx::Error`
/// unchanged and map it to a 500 at the edge. Division guards are plain
/// branches that short-circuit to zero, not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// A required field is absent and no documented default applies.
    #[error("missing input: {field}")]
    MissingInput { field: &'static str },

    /// A numerically impossible input (negative rate, negative hours).
    /// Always surfaced with the offending value, never clamped.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl CalcError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            reason: reason.into(),
        }
    }
}

pub type CalcResult<T> = Result<T, CalcError>;
