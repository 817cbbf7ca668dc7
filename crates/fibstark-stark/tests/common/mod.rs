//! Shared fixtures. Building the domain parameters interpolates 1023 points
//! and evaluates over 8192, so each test binary does it once.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::OnceLock;

use fibstark_crypto::{Blake3Hash, Sha3Hash};
use fibstark_stark::field::{Felt, FIB_FIELD};
use fibstark_stark::{prove_parameters, DomainParameters, StarkProof};

pub fn params() -> &'static DomainParameters {
    static PARAMS: OnceLock<DomainParameters> = OnceLock::new();
    PARAMS.get_or_init(|| {
        DomainParameters::generate::<Blake3Hash>(&FIB_FIELD)
            .expect("fixed trace parameters")
            .0
    })
}

pub fn sha3_params() -> &'static DomainParameters {
    static PARAMS: OnceLock<DomainParameters> = OnceLock::new();
    PARAMS.get_or_init(|| {
        DomainParameters::generate::<Sha3Hash>(&FIB_FIELD)
            .expect("fixed trace parameters")
            .0
    })
}

/// Blake3 proof with three queries.
pub fn proof() -> &'static StarkProof {
    static PROOF: OnceLock<StarkProof> = OnceLock::new();
    PROOF.get_or_init(|| prove_parameters::<Blake3Hash>(params(), 3).expect("prove"))
}

pub fn felt(v: u64) -> Felt {
    Felt::from_u64(v)
}
