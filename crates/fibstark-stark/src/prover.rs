//! Proving session: parameters → constraints → composition → FRI commit →
//! decommitment, all threaded through one channel.

use fibstark_crypto::{Blake3Hash, HashFunction, HashKind, Sha3Hash};
use tracing::{info, info_span};

use crate::composition::commit_composition;
use crate::config::ProverConfig;
use crate::constraints::encode_constraints;
use crate::decommit::decommit_fri;
use crate::domain::DomainParameters;
use crate::error::{Result, StarkError};
use crate::field::{Felt, FieldContext, FIB_MODULUS};
use crate::fri::fri_commit;
use crate::proof::StarkProof;

/// Prove the fixed trace with hash `H`.
pub fn prove<H: HashFunction>(ctx: &FieldContext<FIB_MODULUS>, num_queries: usize) -> Result<StarkProof> {
    let (params, _) = DomainParameters::generate::<H>(ctx)?;
    prove_parameters::<H>(&params, num_queries)
}

/// Prove an arbitrary 1023-row trace (fails with
/// [`StarkError::InvalidTrace`] when it does not satisfy the program).
pub fn prove_trace<H: HashFunction>(
    ctx: &FieldContext<FIB_MODULUS>,
    trace: Vec<Felt>,
    num_queries: usize,
) -> Result<StarkProof> {
    let params = DomainParameters::from_trace::<H>(ctx, trace)?;
    prove_parameters::<H>(&params, num_queries)
}

/// Run the pipeline from prepared (or loaded) domain parameters.
pub fn prove_parameters<H: HashFunction>(params: &DomainParameters, num_queries: usize) -> Result<StarkProof> {
    let _span = info_span!("prove", hash = H::NAME, num_queries).entered();
    if num_queries == 0 {
        return Err(StarkError::InvalidInput("num_queries must be at least 1".into()));
    }

    let trace_tree = params.evaluation_tree::<H>()?;
    if trace_tree.root() != params.evaluation_root {
        return Err(StarkError::InvalidInput(format!(
            "evaluation commitment was not computed with {}",
            H::NAME
        )));
    }

    let mut channel = params.channel::<H>();
    let quotients = encode_constraints(&params.trace_polynomial, params.g)?;
    let cp = commit_composition(&quotients, &params.evaluation_domain, &mut channel)?;
    let fri = fri_commit(
        cp.polynomial,
        params.evaluation_domain.clone(),
        cp.evaluations,
        cp.tree,
        &mut channel,
    )?;
    let queries = decommit_fri(num_queries, &params.evaluations, &trace_tree, &fri, &mut channel)?;

    info!(
        layers = fri.len(),
        queries = queries.len(),
        channel_state = %channel.state_hex(),
        "proof complete"
    );
    Ok(StarkProof {
        hash: H::NAME.to_owned(),
        trace_root: params.evaluation_root,
        fri_roots: fri.roots(),
        final_constant: fri.final_constant().as_u64(),
        queries,
        transcript: channel.into_transcript(),
    })
}

/// [`prove`] with the hash and query count taken from `cfg`.
pub fn prove_with_config(ctx: &FieldContext<FIB_MODULUS>, cfg: &ProverConfig) -> Result<StarkProof> {
    cfg.validate()?;
    match cfg.hash {
        HashKind::Blake3 => prove::<Blake3Hash>(ctx, cfg.num_queries),
        HashKind::Sha3 => prove::<Sha3Hash>(ctx, cfg.num_queries),
    }
}

/// [`prove_parameters`] with the hash and query count taken from `cfg`.
///
/// The parameters' commitment must have been computed with the same hash.
pub fn prove_parameters_with_config(params: &DomainParameters, cfg: &ProverConfig) -> Result<StarkProof> {
    cfg.validate()?;
    match cfg.hash {
        HashKind::Blake3 => prove_parameters::<Blake3Hash>(params, cfg.num_queries),
        HashKind::Sha3 => prove_parameters::<Sha3Hash>(params, cfg.num_queries),
    }
}
