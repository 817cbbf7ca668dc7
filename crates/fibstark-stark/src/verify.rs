//! Verifier: replays the channel from the proof's public messages and checks
//! every opening, the composition value at layer 0, and each FRI fold.

use fibstark_crypto::{Blake3Hash, Channel, Digest32, HashFunction, HashKind, Sha3Hash};
use fibstark_merkle::MerkleTree;
use tracing::{debug, info, info_span};

use crate::composition::{composition_at, draw_alphas};
use crate::decommit::query_index;
use crate::error::{Result, StarkError};
use crate::field::{Felt, FIB_FIELD, FIB_MODULUS};
use crate::params::{BLOWUP, FRI_NUM_LAYERS, G_ORDER, H_ORDER};
use crate::proof::{Opening, StarkProof};

/// Public constants every check needs.
struct Ctx {
    shift: Felt,
    g: Felt,
    h: Felt,
    two_inv: Felt,
}

/// Verify a proof made with hash `H` and `num_queries` queries.
pub fn verify_proof<H: HashFunction>(proof: &StarkProof, num_queries: usize) -> Result<()> {
    let _span = info_span!("verify", hash = H::NAME, num_queries).entered();

    if proof.hash != H::NAME {
        return Err(StarkError::rejected(format!(
            "proof uses hash '{}', verifier expects '{}'",
            proof.hash,
            H::NAME
        )));
    }
    if proof.queries.len() != num_queries {
        return Err(StarkError::rejected(format!(
            "expected {num_queries} queries, proof has {}",
            proof.queries.len()
        )));
    }
    if proof.fri_roots.len() != FRI_NUM_LAYERS {
        return Err(StarkError::rejected(format!(
            "expected {FRI_NUM_LAYERS} FRI layers, proof has {}",
            proof.fri_roots.len()
        )));
    }
    let final_constant = canonical(proof.final_constant, "final constant")?;

    let ctx = Ctx {
        shift: FIB_FIELD.generator(),
        g: FIB_FIELD.element_of_order(G_ORDER as u64)?,
        h: FIB_FIELD.element_of_order(H_ORDER as u64)?,
        two_inv: Felt::from_u64(2)
            .try_inv()
            .ok_or_else(|| StarkError::DomainIntegrity("2 is not invertible".into()))?,
    };

    // Commit phase replay.
    let mut ch = Channel::<H>::new();
    ch.send(&proof.trace_root);
    let alphas = draw_alphas(&mut ch);
    ch.send(&proof.fri_roots[0]);
    let mut betas = Vec::with_capacity(FRI_NUM_LAYERS - 1);
    for root in &proof.fri_roots[1..] {
        betas.push(ch.receive_random_field_element::<FIB_MODULUS>());
        ch.send(root);
    }
    ch.send(&final_constant.to_be_bytes_trimmed());

    // Decommit phase replay.
    for (q, query) in proof.queries.iter().enumerate() {
        let idx = query_index(&mut ch)?;
        if idx != query.index {
            return Err(StarkError::rejected(format!(
                "query {q}: index {} differs from channel draw {idx}",
                query.index
            )));
        }

        if query.trace.len() != 3 {
            return Err(StarkError::rejected(format!(
                "query {q}: expected 3 trace openings, got {}",
                query.trace.len()
            )));
        }
        let mut f = [Felt::zero(); 3];
        for (k, (opening, slot)) in query.trace.iter().zip(f.iter_mut()).enumerate() {
            let want = idx + k * BLOWUP;
            *slot = check_opening::<H>(opening, want, &proof.trace_root, "trace")?;
            send_opening(&mut ch, *slot, opening);
        }

        let x = ctx.shift * ctx.h.pow(idx as u64);
        let mut expected = composition_at(x, ctx.g, f[0], f[1], f[2], &alphas)
            .ok_or_else(|| StarkError::rejected(format!("query {q}: point hits a constraint root")))?;

        if query.layers.len() != FRI_NUM_LAYERS - 1 {
            return Err(StarkError::rejected(format!(
                "query {q}: expected {} layer openings, got {}",
                FRI_NUM_LAYERS - 1,
                query.layers.len()
            )));
        }
        for (i, layer) in query.layers.iter().enumerate() {
            let len = H_ORDER >> i;
            let ii = idx % len;
            let sib = (ii + len / 2) % len;
            let root = &proof.fri_roots[i];
            let a = check_opening::<H>(&layer.element, ii, root, "fri element")?;
            send_opening(&mut ch, a, &layer.element);
            let b = check_opening::<H>(&layer.sibling, sib, root, "fri sibling")?;
            send_opening(&mut ch, b, &layer.sibling);

            if a != expected {
                return Err(StarkError::rejected(format!(
                    "query {q}: layer {i} value {a} inconsistent with {}",
                    if i == 0 { "the trace openings" } else { "the previous fold" }
                )));
            }
            // x_i = (w·h^ii)^(2^i)
            let mut xi = ctx.shift * ctx.h.pow(ii as u64);
            for _ in 0..i {
                xi = xi.square();
            }
            let xi_inv = xi
                .try_inv()
                .ok_or_else(|| StarkError::rejected("zero FRI domain point"))?;
            let even = (a + b) * ctx.two_inv;
            let odd = (a - b) * ctx.two_inv * xi_inv;
            expected = even + betas[i] * odd;
        }

        let last = canonical(query.last_element, "last element")?;
        if last != final_constant || expected != final_constant {
            return Err(StarkError::rejected(format!(
                "query {q}: final fold {expected} / last element {last} differ from constant {final_constant}"
            )));
        }
        ch.send(&last.to_be_bytes_trimmed());
        debug!(query = q, idx, "query accepted");
    }

    if ch.transcript() != proof.transcript.as_slice() {
        return Err(StarkError::rejected("replayed transcript differs from the recorded one"));
    }
    info!(state = %ch.state_hex(), "proof accepted");
    Ok(())
}

/// Verify, picking the hash from the proof itself.
pub fn verify(proof: &StarkProof, num_queries: usize) -> Result<()> {
    let kind: HashKind = proof.hash.parse().map_err(StarkError::Rejected)?;
    match kind {
        HashKind::Blake3 => verify_proof::<Blake3Hash>(proof, num_queries),
        HashKind::Sha3 => verify_proof::<Sha3Hash>(proof, num_queries),
    }
}

fn canonical(v: u64, what: &str) -> Result<Felt> {
    if v >= FIB_MODULUS {
        return Err(StarkError::rejected(format!("{what} {v} is not a field element")));
    }
    Ok(Felt::from_u64(v))
}

fn check_opening<H: HashFunction>(
    opening: &Opening,
    want_index: usize,
    root: &Digest32,
    what: &str,
) -> Result<Felt> {
    if opening.index != want_index {
        return Err(StarkError::rejected(format!(
            "{what} opened at {}, expected {want_index}",
            opening.index
        )));
    }
    let value = canonical(opening.value, what)?;
    if !MerkleTree::<H>::verify(root, &value.to_be_bytes_trimmed(), &opening.path) {
        return Err(StarkError::rejected(format!(
            "{what} at {want_index}: audit path does not reach the root"
        )));
    }
    Ok(value)
}

fn send_opening<H: HashFunction>(ch: &mut Channel<H>, value: Felt, opening: &Opening) {
    ch.send(&value.to_be_bytes_trimmed());
    ch.send(&opening.path.to_bytes());
}
