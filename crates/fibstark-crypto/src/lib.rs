//! Crypto substrate for FibSTARK: a 256-bit hash primitive and the
//! Fiat-Shamir [`Channel`] that turns prover messages into verifier randomness.
//!
//! The same [`HashFunction`] drives both the channel and the Merkle trees, so
//! swapping it (BLAKE3 ↔ SHA3-256) changes every proof byte but not the
//! protocol.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

pub mod channel;
pub mod hash;

pub use channel::{Channel, TranscriptEntry};
pub use hash::{Blake3Hash, Digest32, HashFunction, HashKind, Sha3Hash};
