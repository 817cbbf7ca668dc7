//! Domain parameter generation: trace, subgroups `G` and `H`, the coset
//! evaluation domain, the trace interpolant, its low-degree extension and
//! the commitment to it.

use fibstark_crypto::{Channel, Digest32, HashFunction};
use fibstark_merkle::MerkleTree;
use tracing::{debug, info, info_span};

use crate::error::{Result, StarkError};
use crate::field::{to_leaves, Felt, FeltPoly, FieldContext, FIB_MODULUS};
use crate::params::{G_ORDER, H_ORDER, TRACE_LEN};
use crate::trace::fib_square_trace;

/// Everything derived from the trace before any verifier randomness.
///
/// Immutable after construction; the unit of persistence (see
/// [`crate::io::DomainParametersRecord`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainParameters {
    /// Claimed execution trace (1023 rows).
    pub trace: Vec<Felt>,
    /// Generator of `G` (order 1024).
    pub g: Felt,
    /// `g^0 .. g^1023`.
    pub g_subgroup: Vec<Felt>,
    /// Generator of `H` (order 8192).
    pub h: Felt,
    /// `h^0 .. h^8191`.
    pub h_subgroup: Vec<Felt>,
    /// `w · h^i` with `w` the field generator.
    pub evaluation_domain: Vec<Felt>,
    /// Interpolant of the trace over `G[..1023]`.
    pub trace_polynomial: FeltPoly,
    /// Trace polynomial evaluated over the evaluation domain.
    pub evaluations: Vec<Felt>,
    /// Merkle root of `evaluations`.
    pub evaluation_root: Digest32,
}

impl DomainParameters {
    /// Build parameters for the fixed trace and open a channel seeded with
    /// the evaluation root.
    pub fn generate<H: HashFunction>(ctx: &FieldContext<FIB_MODULUS>) -> Result<(Self, Channel<H>)> {
        let params = Self::from_trace::<H>(ctx, fib_square_trace())?;
        let channel = params.channel::<H>();
        Ok((params, channel))
    }

    /// Build parameters for an arbitrary 1023-row trace.
    pub fn from_trace<H: HashFunction>(ctx: &FieldContext<FIB_MODULUS>, trace: Vec<Felt>) -> Result<Self> {
        let _span = info_span!("domain_parameters", hash = H::NAME).entered();
        if trace.len() != TRACE_LEN {
            return Err(StarkError::InvalidInput(format!(
                "trace has {} rows, expected {TRACE_LEN}",
                trace.len()
            )));
        }

        let g_group = ctx.subgroup(G_ORDER)?;
        let h_group = ctx.subgroup(H_ORDER)?;
        let g_subgroup = g_group.elements();
        let h_subgroup = h_group.elements();
        let evaluation_domain = h_group.clone().coset(ctx.generator()).elements();
        check_evaluation_domain(ctx, h_group.gen, &evaluation_domain)?;

        let trace_polynomial = FeltPoly::interpolate(&g_subgroup[..TRACE_LEN], &trace)?;
        debug!(degree = ?trace_polynomial.degree(), "interpolated trace");

        let evaluations = trace_polynomial.eval_many(&evaluation_domain);
        let evaluation_root = MerkleTree::<H>::new(&to_leaves(&evaluations))?.root();
        info!(
            trace_len = trace.len(),
            g = %g_group.gen,
            commitment = %hex::encode(evaluation_root),
            "domain parameters ready"
        );

        Ok(Self {
            trace,
            g: g_group.gen,
            g_subgroup,
            h: h_group.gen,
            h_subgroup,
            evaluation_domain,
            trace_polynomial,
            evaluations,
            evaluation_root,
        })
    }

    /// Fresh channel whose first message is the evaluation root.
    #[must_use]
    pub fn channel<H: HashFunction>(&self) -> Channel<H> {
        let mut ch = Channel::new();
        ch.send(&self.evaluation_root);
        ch
    }

    /// Merkle tree over the trace evaluations, for openings.
    pub fn evaluation_tree<H: HashFunction>(&self) -> Result<MerkleTree<H>> {
        Ok(MerkleTree::new(&to_leaves(&self.evaluations))?)
    }

    /// Re-derive everything that follows from the trace and compare:
    /// sizes, generators, subgroup powers, coset shape, the interpolant on
    /// `G` and its evaluations over the coset.
    ///
    /// Used after loading persisted parameters. The commitment depends on the
    /// hash and is checked by the prover.
    pub fn validate(&self, ctx: &FieldContext<FIB_MODULUS>) -> Result<()> {
        let lens = [
            ("trace", self.trace.len(), TRACE_LEN),
            ("g_subgroup", self.g_subgroup.len(), G_ORDER),
            ("h_subgroup", self.h_subgroup.len(), H_ORDER),
            ("evaluation_domain", self.evaluation_domain.len(), H_ORDER),
            ("polynomial_evaluations", self.evaluations.len(), H_ORDER),
        ];
        for (name, got, want) in lens {
            if got != want {
                return Err(StarkError::InvalidInput(format!(
                    "{name} has {got} elements, expected {want}"
                )));
            }
        }
        if self.g != ctx.element_of_order(G_ORDER as u64)? || self.h != ctx.element_of_order(H_ORDER as u64)? {
            return Err(StarkError::DomainIntegrity("subgroup generators do not match the field".into()));
        }
        check_powers("g_subgroup", self.g, &self.g_subgroup)?;
        check_powers("h_subgroup", self.h, &self.h_subgroup)?;
        check_evaluation_domain(ctx, self.h, &self.evaluation_domain)?;

        if self.trace_polynomial.coeffs().len() > TRACE_LEN {
            return Err(StarkError::DomainIntegrity(format!(
                "interpolant has {} coefficients, at most {TRACE_LEN} allowed",
                self.trace_polynomial.coeffs().len()
            )));
        }
        for (i, (&x, &y)) in self.g_subgroup.iter().zip(&self.trace).enumerate() {
            let got = self.trace_polynomial.eval(x);
            if got != y {
                return Err(StarkError::DomainIntegrity(format!(
                    "interpolant gives {got} at trace row {i}, trace holds {y}"
                )));
            }
        }
        let expected = self.trace_polynomial.eval_many(&self.evaluation_domain);
        if let Some(i) = expected.iter().zip(&self.evaluations).position(|(a, b)| a != b) {
            return Err(StarkError::DomainIntegrity(format!(
                "evaluation {i} is {}, interpolant gives {}",
                self.evaluations[i], expected[i]
            )));
        }
        debug!("domain parameters validated");
        Ok(())
    }
}

/// `elems[i] == gen^i` for every `i`.
fn check_powers(name: &str, gen: Felt, elems: &[Felt]) -> Result<()> {
    let mut expect = Felt::one();
    for (i, &e) in elems.iter().enumerate() {
        if e != expect {
            return Err(StarkError::DomainIntegrity(format!(
                "{name} element {i} is {e}, expected {expect}"
            )));
        }
        expect *= gen;
    }
    Ok(())
}

/// Every element must equal `w · (w⁻¹·d[1])^i` with `w⁻¹·d[1] = h`, and `w`
/// must lie outside `H` so the coset is disjoint from it.
fn check_evaluation_domain(ctx: &FieldContext<FIB_MODULUS>, h: Felt, domain: &[Felt]) -> Result<()> {
    let w = ctx.generator();
    let w_inv = w
        .try_inv()
        .ok_or_else(|| StarkError::DomainIntegrity("field generator is zero".into()))?;
    let step = domain
        .get(1)
        .map(|&d1| w_inv * d1)
        .ok_or_else(|| StarkError::DomainIntegrity("evaluation domain too small".into()))?;
    if step != h {
        return Err(StarkError::DomainIntegrity(format!(
            "coset step {step} differs from h = {h}"
        )));
    }
    if w.pow(domain.len() as u64) == Felt::one() {
        return Err(StarkError::DomainIntegrity("coset shift lies inside H".into()));
    }
    let mut expect = w;
    for (i, &d) in domain.iter().enumerate() {
        if d != expect {
            return Err(StarkError::DomainIntegrity(format!(
                "evaluation domain element {i} is {d}, expected {expect}"
            )));
        }
        expect *= step;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FIB_FIELD;

    #[test]
    fn tampered_domain_is_detected() {
        let h = FIB_FIELD.subgroup(H_ORDER).unwrap();
        let mut domain = h.clone().coset(FIB_FIELD.generator()).elements();
        assert!(check_evaluation_domain(&FIB_FIELD, h.gen, &domain).is_ok());
        domain[17] += Felt::one();
        assert!(matches!(
            check_evaluation_domain(&FIB_FIELD, h.gen, &domain),
            Err(StarkError::DomainIntegrity(_))
        ));
    }

    #[test]
    fn subgroup_used_as_domain_is_rejected() {
        let h = FIB_FIELD.subgroup(H_ORDER).unwrap();
        let plain = h.elements();
        // d[1] / w != h when the shift is 1
        assert!(check_evaluation_domain(&FIB_FIELD, h.gen, &plain).is_err());
    }

    #[test]
    fn subgroup_powers_are_checked() {
        let g = FIB_FIELD.subgroup(G_ORDER).unwrap();
        let mut elems = g.elements();
        assert!(check_powers("g_subgroup", g.gen, &elems).is_ok());
        elems[9] = Felt::from_u64(42);
        let err = check_powers("g_subgroup", g.gen, &elems).unwrap_err();
        assert!(err.to_string().contains("element 9"), "{err}");
    }

    #[test]
    fn short_trace_is_invalid_input() {
        let err = DomainParameters::from_trace::<fibstark_crypto::Blake3Hash>(
            &FIB_FIELD,
            vec![Felt::one(); 10],
        )
        .unwrap_err();
        assert!(matches!(err, StarkError::InvalidInput(_)));
    }
}
