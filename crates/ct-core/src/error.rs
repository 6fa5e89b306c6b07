use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoreError {
    /// User-facing and recoverable: empty selection, parameter out of bounds.
    #[error("validation error: {0}")]
    Validation(String),
    /// Bucket counts broke conservation or monotonicity. A bug, never user input.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
