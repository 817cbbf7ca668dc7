//! FRI commit phase.
//!
//! Folding rule: with `P(X) = E(X²) + X·O(X²)` (split by coefficient index),
//!   `P'(Y) = E(Y) + β·O(Y)` over the domain `{x² : x ∈ D[..|D|/2]}`.
//! Each layer is Merkle-committed and its root sent before the next `β` is
//! drawn. When the polynomial reaches degree 0 its constant is sent in the
//! clear and the chain ends.

use fibstark_crypto::{Channel, Digest32, HashFunction};
use fibstark_merkle::MerkleTree;
use tracing::{debug, info, info_span};

use crate::error::{Result, StarkError};
use crate::field::{to_leaves, Felt, FeltPoly, FIB_MODULUS};

/// The full layer chain. Index 0 is the composition polynomial.
#[derive(Debug)]
pub struct FriLayers<H: HashFunction> {
    /// Shrinking evaluation domains.
    pub domains: Vec<Vec<Felt>>,
    /// Folded polynomials; the last has degree 0.
    pub polynomials: Vec<FeltPoly>,
    /// Evaluations of `polynomials[i]` over `domains[i]`.
    pub layers: Vec<Vec<Felt>>,
    /// Commitment trees over `layers[i]`.
    pub trees: Vec<MerkleTree<H>>,
    /// Folding coefficients; `betas[i]` maps layer `i` to `i + 1`.
    pub betas: Vec<Felt>,
}

impl<H: HashFunction> FriLayers<H> {
    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Never true for a committed chain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Merkle roots, layer order.
    #[must_use]
    pub fn roots(&self) -> Vec<Digest32> {
        self.trees.iter().map(MerkleTree::root).collect()
    }

    /// Constant term of the last polynomial.
    #[must_use]
    pub fn final_constant(&self) -> Felt {
        self.polynomials
            .last()
            .map_or_else(Felt::zero, FeltPoly::constant_term)
    }
}

/// Square the first half of `domain`.
#[must_use]
pub fn next_fri_domain(domain: &[Felt]) -> Vec<Felt> {
    domain[..domain.len() / 2].iter().map(|x| x.square()).collect()
}

/// `Even(P) + β·Odd(P)`.
#[must_use]
pub fn next_fri_polynomial(poly: &FeltPoly, beta: Felt) -> FeltPoly {
    &poly.even_part() + &poly.odd_part().scale(beta)
}

/// One fold: next domain, next polynomial, and its evaluations.
#[must_use]
pub fn next_fri_layer(domain: &[Felt], poly: &FeltPoly, beta: Felt) -> (Vec<Felt>, FeltPoly, Vec<Felt>) {
    let next_domain = next_fri_domain(domain);
    let next_poly = next_fri_polynomial(poly, beta);
    let next_layer = next_poly.eval_many(&next_domain);
    (next_domain, next_poly, next_layer)
}

/// Build the layer chain from a committed composition polynomial whose root
/// is already in the channel.
pub fn fri_commit<H: HashFunction>(
    cp: FeltPoly,
    domain: Vec<Felt>,
    cp_eval: Vec<Felt>,
    cp_tree: MerkleTree<H>,
    channel: &mut Channel<H>,
) -> Result<FriLayers<H>> {
    let _span = info_span!("fri_commit").entered();
    if domain.len() != cp_eval.len() || cp_tree.len() != cp_eval.len() {
        return Err(StarkError::InvalidInput(format!(
            "domain ({}), evaluations ({}) and tree ({}) differ in length",
            domain.len(),
            cp_eval.len(),
            cp_tree.len()
        )));
    }

    let mut fri = FriLayers {
        domains: vec![domain],
        polynomials: vec![cp],
        layers: vec![cp_eval],
        trees: vec![cp_tree],
        betas: Vec::new(),
    };

    loop {
        let (Some(poly), Some(domain)) = (fri.polynomials.last(), fri.domains.last()) else {
            break;
        };
        if !poly.degree().is_some_and(|d| d > 0) {
            break;
        }
        if domain.len() < 2 {
            return Err(StarkError::DomainIntegrity(format!(
                "FRI domain exhausted with polynomial degree {:?}",
                poly.degree()
            )));
        }

        let beta = channel.receive_random_field_element::<FIB_MODULUS>();
        let (next_domain, next_poly, next_layer) = next_fri_layer(domain, poly, beta);
        let tree = MerkleTree::<H>::new(&to_leaves(&next_layer))?;
        channel.send(&tree.root());
        debug!(
            layer = fri.layers.len(),
            size = next_layer.len(),
            degree = ?next_poly.degree(),
            root = %hex::encode(tree.root()),
            "fri layer committed"
        );

        fri.betas.push(beta);
        fri.domains.push(next_domain);
        fri.polynomials.push(next_poly);
        fri.layers.push(next_layer);
        fri.trees.push(tree);
    }

    let constant = fri.final_constant();
    channel.send(&constant.to_be_bytes_trimmed());
    info!(
        layers = fri.len(),
        last_size = fri.layers.last().map_or(0, Vec::len),
        constant = %constant,
        "fri commit done"
    );
    Ok(fri)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn felts(v: &[u64]) -> Vec<Felt> {
        v.iter().map(|&x| Felt::from_u64(x)).collect()
    }

    #[test]
    fn single_fold_example() {
        let poly = FeltPoly::from_u64s(&[2, 3, 0, 1]);
        let (dom, next, layer) = next_fri_layer(&felts(&[3, 5]), &poly, Felt::from_u64(7));
        assert_eq!(next, FeltPoly::from_u64s(&[23, 7]));
        assert_eq!(dom, felts(&[9]));
        assert_eq!(layer, felts(&[86]));
    }

    #[test]
    fn constant_input_sends_only_its_value() {
        let domain = felts(&[3, 5, 7, 11]);
        let cp = FeltPoly::constant(Felt::from_u64(9));
        let evals = cp.eval_many(&domain);
        let tree = MerkleTree::<fibstark_crypto::Blake3Hash>::new(&to_leaves(&evals)).unwrap();
        let mut ch = Channel::new();
        let fri = fri_commit(cp, domain, evals, tree, &mut ch).unwrap();
        assert_eq!(fri.len(), 1);
        assert!(fri.betas.is_empty());
        assert_eq!(ch.transcript().len(), 1);
        assert_eq!(fri.final_constant().as_u64(), 9);
    }

    #[test]
    fn exhausted_domain_is_an_integrity_error() {
        let domain = felts(&[3, 5]);
        let cp = FeltPoly::from_u64s(&[1, 2, 3, 4, 5]);
        let evals = cp.eval_many(&domain);
        let tree = MerkleTree::<fibstark_crypto::Blake3Hash>::new(&to_leaves(&evals)).unwrap();
        let mut ch = Channel::new();
        assert!(matches!(
            fri_commit(cp, domain, evals, tree, &mut ch),
            Err(StarkError::DomainIntegrity(_))
        ));
    }
}
