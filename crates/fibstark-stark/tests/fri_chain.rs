//! FRI commit on the fixed instance, plus folding laws on small cosets.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{felt, params};
use fibstark_crypto::{Blake3Hash, TranscriptEntry};
use fibstark_stark::composition::{commit_composition, composition_at};
use fibstark_stark::constraints::encode_constraints;
use fibstark_stark::decommit::decommit_on_query;
use fibstark_stark::field::{Felt, FeltPoly, FIB_FIELD, FIB_MODULUS};
use fibstark_stark::fri::{fri_commit, next_fri_domain, next_fri_layer, next_fri_polynomial, FriLayers};
use fibstark_stark::params::{BLOWUP, FRI_NUM_LAYERS, H_ORDER, MAX_QUERY_INDEX};
use fibstark_stark::StarkError;
use proptest::prelude::*;

fn commit() -> FriLayers<Blake3Hash> {
    let p = params();
    let mut ch = p.channel::<Blake3Hash>();
    let q = encode_constraints(&p.trace_polynomial, p.g).unwrap();
    let cp = commit_composition(&q, &p.evaluation_domain, &mut ch).unwrap();
    assert_eq!(cp.polynomial.degree(), Some(1023));

    // Spot-check the committed evaluations against the pointwise formula.
    for idx in [0usize, 1234, 8000] {
        let x = p.evaluation_domain[idx];
        let f = |k: usize| p.evaluations[(idx + k * BLOWUP) % H_ORDER];
        let want = composition_at(x, p.g, f(0), f(1), f(2), &cp.alphas).unwrap();
        assert_eq!(cp.evaluations[idx], want, "index {idx}");
    }

    let before = ch.transcript().len();
    let fri = fri_commit(
        cp.polynomial,
        p.evaluation_domain.clone(),
        cp.evaluations,
        cp.tree,
        &mut ch,
    )
    .unwrap();
    // beta + root per fold, then the constant
    assert_eq!(ch.transcript().len() - before, 2 * (FRI_NUM_LAYERS - 1) + 1);
    assert!(matches!(
        ch.transcript().last(),
        Some(TranscriptEntry::Send(_))
    ));
    fri
}

#[test]
fn chain_terminates_at_a_constant() {
    let fri = commit();
    assert_eq!(fri.len(), FRI_NUM_LAYERS);
    assert_eq!(fri.betas.len(), FRI_NUM_LAYERS - 1);
    for (i, layer) in fri.layers.iter().enumerate() {
        assert_eq!(layer.len(), H_ORDER >> i, "layer {i}");
        assert_eq!(fri.domains[i].len(), layer.len());
        assert_eq!(fri.trees[i].len(), layer.len());
    }

    let last = fri.layers.last().unwrap();
    assert_eq!(last.len(), 8);
    assert!(!fri.polynomials.last().unwrap().degree().is_some_and(|d| d > 0));
    assert!(last.iter().all(|&v| v == fri.final_constant()));

    for (i, poly) in fri.polynomials.iter().enumerate() {
        let bound = 1023usize >> i;
        assert!(poly.degree().unwrap_or(0) <= bound, "layer {i}");
    }
}

#[test]
fn domains_are_successive_squares() {
    let fri = commit();
    for w in fri.domains.windows(2) {
        let (cur, next) = (&w[0], &w[1]);
        assert_eq!(next.len(), cur.len() / 2);
        for (j, y) in next.iter().enumerate() {
            assert_eq!(*y, cur[j].square());
            assert_eq!(*y, cur[j + cur.len() / 2].square());
        }
    }
}

#[test]
fn query_past_the_last_index_is_not_clamped() {
    let p = params();
    let fri = commit();
    let tree = p.evaluation_tree::<Blake3Hash>().unwrap();
    let last = usize::try_from(MAX_QUERY_INDEX).unwrap();

    let mut ch = p.channel::<Blake3Hash>();
    let q = decommit_on_query(last, &p.evaluations, &tree, &fri, &mut ch).unwrap();
    assert_eq!(q.index, last);
    assert_eq!(q.trace[2].index, H_ORDER - 1);

    let mut ch = p.channel::<Blake3Hash>();
    let before = ch.transcript().len();
    let err = decommit_on_query(last + 1, &p.evaluations, &tree, &fri, &mut ch).unwrap_err();
    assert!(
        matches!(
            err,
            StarkError::IndexOutOfRange { index, offset: 16, len: H_ORDER } if index == last + 1
        ),
        "{err}"
    );
    assert_eq!(ch.transcript().len(), before);
}

fn coset16() -> Vec<Felt> {
    FIB_FIELD
        .subgroup(16)
        .unwrap()
        .coset(FIB_FIELD.generator())
        .elements()
}

fn poly(max_len: usize) -> impl Strategy<Value = FeltPoly> {
    prop::collection::vec((0..FIB_MODULUS).prop_map(Felt::from_u64), 0..max_len)
        .prop_map(FeltPoly::new)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn next_domain_squares_the_first_half(
        half in prop::collection::vec((0..FIB_MODULUS).prop_map(Felt::from_u64), 0..64),
        tail in prop::collection::vec((0..FIB_MODULUS).prop_map(Felt::from_u64), 64),
    ) {
        // even length 2·|half|, arbitrary contents
        let mut domain = half.clone();
        domain.extend_from_slice(&tail[..half.len()]);
        let next = next_fri_domain(&domain);
        prop_assert_eq!(next.len(), domain.len() / 2);
        for (j, y) in next.iter().enumerate() {
            prop_assert_eq!(*y, domain[j].square());
        }
    }

    #[test]
    fn folding_halves_the_degree(p in poly(16), beta in 0..FIB_MODULUS) {
        let next = next_fri_polynomial(&p, Felt::from_u64(beta));
        if let (Some(d), Some(n)) = (p.degree(), next.degree()) {
            prop_assert!(n <= d / 2);
        }
    }

    #[test]
    fn layer_values_follow_the_pointwise_fold(p in poly(16), beta in 0..FIB_MODULUS) {
        let domain = coset16();
        let beta = Felt::from_u64(beta);
        let (next_domain, _, next_layer) = next_fri_layer(&domain, &p, beta);
        prop_assert_eq!(&next_domain, &next_fri_domain(&domain));
        prop_assert_eq!(next_layer.len(), 8);

        let two_inv = felt(2).inv();
        for (j, v) in next_layer.iter().enumerate() {
            let x = domain[j];
            let a = p.eval(x);
            let b = p.eval(domain[j + 8]);
            let want = (a + b) * two_inv + beta * (a - b) * two_inv * x.inv();
            prop_assert_eq!(*v, want);
        }
    }
}
