//! FibSTARK: a STARK over the Fibonacci-square recurrence
//! `a[i] = a[i-1]² + a[i-2]²` (1023 rows, `a[0] = 1`, `a[1] = 3141592`).
//!
//! Pipeline (one [`fibstark_crypto::Channel`] threaded through every stage
//! after the first commitment):
//!
//! 1. [`domain`]: trace, subgroups `G` (1024) and `H` (8192), the coset
//!    evaluation domain, the trace interpolant and its committed evaluations.
//! 2. [`constraints`]: two boundary and one transition constraint as exact
//!    polynomial divisions.
//! 3. [`composition`]: random linear combination of the quotients, committed.
//! 4. [`fri`]: fold/commit until degree 0, then send the constant.
//! 5. [`decommit`]: channel-drawn queries answered with authenticated
//!    openings of the trace and every FRI layer.
//!
//! [`verify`] replays the channel and rechecks every opening and fold.
//! [`io`] persists domain parameters (JSON) and proofs (JSON/CBOR).

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
#![allow(clippy::module_name_repetitions, clippy::cast_possible_truncation)]

pub mod composition;
pub mod config;
pub mod constraints;
pub mod decommit;
pub mod domain;
pub mod error;
pub mod field;
pub mod fri;
pub mod io;
pub mod params;
pub mod proof;
pub mod prover;
pub mod trace;
pub mod verify;

pub use config::ProverConfig;
pub use domain::DomainParameters;
pub use error::{ConstraintKind, Result, StarkError};
pub use proof::StarkProof;
pub use prover::{prove, prove_parameters, prove_trace, prove_with_config};
pub use verify::{verify, verify_proof};
