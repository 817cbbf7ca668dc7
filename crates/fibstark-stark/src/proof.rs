//! Structured proof objects.

use fibstark_crypto::{Digest32, TranscriptEntry};
use fibstark_merkle::AuditPath;
use serde::{Deserialize, Serialize};

/// One authenticated value of a committed evaluation vector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    /// Position in the vector.
    pub index: usize,
    /// Canonical field value.
    pub value: u64,
    /// Path to the vector's root.
    pub path: AuditPath,
}

/// Value/sibling pair for one non-final FRI layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerOpening {
    /// Value at `idx mod len`.
    pub element: Opening,
    /// Value at `(idx + len/2) mod len`.
    pub sibling: Opening,
}

/// Everything sent for one query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDecommitment {
    /// Drawn index into the evaluation domain.
    pub index: usize,
    /// Trace evaluations at `idx`, `idx + 8`, `idx + 16` (`x`, `g·x`, `g²·x`).
    pub trace: Vec<Opening>,
    /// One pair per FRI layer except the last.
    pub layers: Vec<LayerOpening>,
    /// First element of the last layer.
    pub last_element: u64,
}

/// Non-interactive proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarkProof {
    /// Hash name (`blake3` / `sha3`).
    pub hash: String,
    /// Root of the trace evaluations.
    pub trace_root: Digest32,
    /// FRI roots; index 0 is the composition polynomial.
    pub fri_roots: Vec<Digest32>,
    /// Constant term of the last FRI polynomial.
    pub final_constant: u64,
    /// Per-query openings.
    pub queries: Vec<QueryDecommitment>,
    /// Complete channel log.
    pub transcript: Vec<TranscriptEntry>,
}
