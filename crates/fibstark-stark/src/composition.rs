//! Composition polynomial: a channel-derived random linear combination of the
//! constraint quotients, evaluated over the evaluation domain and committed.

use fibstark_crypto::{Channel, Digest32, HashFunction};
use fibstark_merkle::MerkleTree;
use tracing::{debug, info_span};

use crate::constraints::ConstraintQuotients;
use crate::error::Result;
use crate::field::{to_leaves, Felt, FeltPoly, FIB_MODULUS};
use crate::params::{
    G_ORDER, LAST_ROW_EXP, NUM_CONSTRAINTS, TRACE_FIRST, TRACE_LAST, TRANSITION_EXCLUDED_EXPS,
};

/// Committed composition polynomial (FRI layer 0).
#[derive(Debug)]
pub struct CompositionCommitment<H: HashFunction> {
    /// Combination coefficients, in constraint order.
    pub alphas: [Felt; NUM_CONSTRAINTS],
    /// `Σ αᵢ·pᵢ`.
    pub polynomial: FeltPoly,
    /// Evaluations over the evaluation domain.
    pub evaluations: Vec<Felt>,
    /// Tree over `evaluations`.
    pub tree: MerkleTree<H>,
}

impl<H: HashFunction> CompositionCommitment<H> {
    /// Root of the evaluation tree.
    #[must_use]
    pub fn root(&self) -> Digest32 {
        self.tree.root()
    }
}

/// Draw one coefficient per constraint.
pub fn draw_alphas<H: HashFunction>(channel: &mut Channel<H>) -> [Felt; NUM_CONSTRAINTS] {
    [(); NUM_CONSTRAINTS].map(|()| channel.receive_random_field_element::<FIB_MODULUS>())
}

/// `α₀·p₀ + α₁·p₁ + α₂·p₂`.
#[must_use]
pub fn composition_polynomial(q: &ConstraintQuotients, alphas: &[Felt; NUM_CONSTRAINTS]) -> FeltPoly {
    q.as_array()
        .into_iter()
        .zip(alphas)
        .fold(FeltPoly::zero(), |acc, (p, &a)| &acc + &p.scale(a))
}

/// Draw coefficients, build the composition, evaluate it over `domain`,
/// commit, and send the root.
pub fn commit_composition<H: HashFunction>(
    q: &ConstraintQuotients,
    domain: &[Felt],
    channel: &mut Channel<H>,
) -> Result<CompositionCommitment<H>> {
    let _span = info_span!("composition").entered();
    let alphas = draw_alphas(channel);
    let polynomial = composition_polynomial(q, &alphas);
    let evaluations = polynomial.eval_many(domain);
    let tree = MerkleTree::<H>::new(&to_leaves(&evaluations))?;
    channel.send(&tree.root());
    debug!(degree = ?polynomial.degree(), root = %hex::encode(tree.root()), "composition committed");
    Ok(CompositionCommitment {
        alphas,
        polynomial,
        evaluations,
        tree,
    })
}

/// Composition value at one point from the trace values `f(x)`, `f(gx)`,
/// `f(g²x)`, without the quotient polynomials.
///
/// Returns `None` when `x` hits a denominator root.
#[must_use]
pub fn composition_at(
    x: Felt,
    g: Felt,
    f_x: Felt,
    f_gx: Felt,
    f_g2x: Felt,
    alphas: &[Felt; NUM_CONSTRAINTS],
) -> Option<Felt> {
    let p0 = (f_x - Felt::from_u64(TRACE_FIRST)) * (x - Felt::one()).try_inv()?;
    let p1 = (f_x - Felt::from_u64(TRACE_LAST)) * (x - g.pow(LAST_ROW_EXP)).try_inv()?;
    let excluded = TRANSITION_EXCLUDED_EXPS
        .iter()
        .fold(Felt::one(), |acc, &e| acc * (x - g.pow(e)));
    let vanishing = x.pow(G_ORDER as u64) - Felt::one();
    let denom = vanishing * excluded.try_inv()?;
    let p2 = (f_g2x - f_gx.square() - f_x.square()) * denom.try_inv()?;
    Some(alphas[0] * p0 + alphas[1] * p1 + alphas[2] * p2)
}
