//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Coarse error taxonomy shared by every layer.
///
/// Callers that only need to decide *how* to react (fix input, refresh state,
/// report a bug) match on the kind instead of the concrete variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or semantically invalid input. Recoverable by the caller.
    InvalidArgument,
    /// The aggregate's current status forbids the operation.
    InvalidState,
    /// The requested aggregate does not exist.
    NotFound,
    /// An invariant was found broken. Indicates a bug, not a user error.
    Internal,
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// state guards, invariants). Infrastructure concerns belong elsewhere.
///
/// Every failing domain operation leaves the aggregate exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (blank field, negative amount, bad identifier...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No order line exists for the referenced product.
    #[error("invalid argument: no order line found for product {product}")]
    LineNotFound { product: String },

    /// The operation is not permitted from the aggregate's current status.
    #[error("invalid state: cannot {operation} while {status}: {message}")]
    InvalidState {
        status: String,
        operation: String,
        message: String,
    },

    /// A requested aggregate was not found (domain-level).
    #[error("not found")]
    NotFound,

    /// A defensive invariant check failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn line_not_found(product: impl core::fmt::Display) -> Self {
        Self::LineNotFound {
            product: product.to_string(),
        }
    }

    pub fn invalid_state(
        status: impl core::fmt::Display,
        operation: impl core::fmt::Display,
        msg: impl Into<String>,
    ) -> Self {
        Self::InvalidState {
            status: status.to_string(),
            operation: operation.to_string(),
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Classify this error within the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) | Self::LineNotFound { .. } => ErrorKind::InvalidArgument,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::NotFound => ErrorKind::NotFound,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}
