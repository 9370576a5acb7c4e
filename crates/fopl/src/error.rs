//! Error types for symbol, substitution and formula operations

use crate::term::{Term, Variable};
use crate::unification::UnificationError;
use thiserror::Error;

/// Result type for fallible operations in this crate
pub type Result<T> = std::result::Result<T, FoplError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FoplError {
    /// An argument was malformed: an empty or missing symbol name, a wrong
    /// operand count for a connective, or the tail of an empty operator
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested operation is not defined for this value
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Bindings are add-only
    #[error("variable {variable} is already bound to {existing}")]
    AlreadyBound { variable: Variable, existing: Term },

    #[error("variable {0} is not bound")]
    UnboundVariable(Variable),

    /// Binding would let a lookup reach the variable again
    #[error("binding {variable} to {term} would create a cycle")]
    CyclicBinding { variable: Variable, term: Term },

    /// Composing would need a binding whose term mentions a bound variable
    #[error("composition cannot bind {variable} to {term}: {term} mentions a bound variable")]
    UnrepresentableComposition { variable: Variable, term: Term },

    #[error(transparent)]
    Unification(#[from] UnificationError),
}

impl FoplError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        FoplError::InvalidArgument(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        FoplError::Unsupported(message.into())
    }
}
