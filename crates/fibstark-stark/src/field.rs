//! Field aliases and leaf encodings shared by the commitment stages.

pub use fibstark_field::{Felt, FeltPoly, FieldContext, FIB_FIELD, FIB_MODULUS};

/// Commitment leaves: minimal big-endian bytes of each value.
#[must_use]
pub fn to_leaves(vals: &[Felt]) -> Vec<Vec<u8>> {
    vals.iter().map(|v| v.to_be_bytes_trimmed()).collect()
}

