//! Error taxonomy for the proving pipeline.

use core::fmt;
use std::path::PathBuf;

use fibstark_field::FieldError;
use fibstark_merkle::MerkleError;
use thiserror::Error;

/// Which constraint quotient failed to divide exactly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    /// `f(x) - 1` over `x - 1`.
    BoundaryFirst,
    /// `f(x) - a[1022]` over `x - g^1022`.
    BoundaryLast,
    /// `f(g²x) - f(gx)² - f(x)²` over the trimmed vanishing polynomial.
    Transition,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BoundaryFirst => "first-value boundary",
            Self::BoundaryLast => "last-value boundary",
            Self::Transition => "transition",
        })
    }
}

/// Pipeline errors.
#[derive(Debug, Error)]
pub enum StarkError {
    /// Malformed caller input (lengths, configuration).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The trace does not satisfy the program.
    #[error("trace violates the {constraint} constraint: quotient has a non-zero remainder")]
    InvalidTrace {
        /// Failing constraint.
        constraint: ConstraintKind,
    },

    /// Domain construction or an internal exactness check went wrong.
    #[error("domain integrity check failed: {0}")]
    DomainIntegrity(String),

    /// Query index plus offset past the end of a domain.
    #[error("index {index} + offset {offset} out of range for {len} elements")]
    IndexOutOfRange {
        /// Base index.
        index: usize,
        /// Offset added to the base.
        offset: usize,
        /// Domain size.
        len: usize,
    },

    /// Merkle construction/opening failure.
    #[error(transparent)]
    Merkle(#[from] MerkleError),

    /// Field or polynomial failure.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Verifier rejection.
    #[error("proof rejected: {0}")]
    Rejected(String),

    /// Filesystem failure.
    #[error("i/o on {}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Encoding or decoding failure.
    #[error("codec: {0}")]
    Codec(String),
}

impl StarkError {
    /// True when the failure means "the trace is wrong" rather than a bug.
    #[must_use]
    pub const fn is_invalid_trace(&self) -> bool {
        matches!(self, Self::InvalidTrace { .. })
    }

    pub(crate) fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}

/// Crate result alias.
pub type Result<T, E = StarkError> = core::result::Result<T, E>;
