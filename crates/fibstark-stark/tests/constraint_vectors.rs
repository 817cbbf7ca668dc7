//! Reference values for the fixed instance: trace end, interpolant, and the
//! three constraint quotients at known points.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{felt, params};
use fibstark_crypto::Blake3Hash;
use fibstark_stark::constraints::{
    encode_constraints, first_value_quotient, last_value_quotient, transition_quotient,
};
use fibstark_stark::field::FIB_FIELD;
use fibstark_stark::params::{COMPOSITION_DEGREE_BOUND, TRACE_LAST, TRACE_LEN};
use fibstark_stark::{prove_trace, ConstraintKind, StarkError};

#[test]
fn trace_ends_at_claimed_value() {
    let p = params();
    assert_eq!(p.trace.len(), TRACE_LEN);
    assert_eq!(p.trace[0], felt(1));
    assert_eq!(p.trace[1], felt(3_141_592));
    assert_eq!(p.trace[1022], felt(TRACE_LAST));
}

#[test]
fn interpolant_matches_reference_point() {
    let f = &params().trace_polynomial;
    assert_eq!(f.degree(), Some(1022));
    assert_eq!(f.eval(felt(2)), felt(1_302_089_273));
    for (i, a) in params().trace.iter().enumerate().step_by(97) {
        assert_eq!(f.eval(params().g_subgroup[i]), *a, "row {i}");
    }
}

#[test]
fn boundary_quotients() {
    let p = params();
    let p0 = first_value_quotient(&p.trace_polynomial).unwrap();
    assert_eq!(p0.eval(felt(2718)), felt(2_509_888_982));
    let p1 = last_value_quotient(&p.trace_polynomial, p.g).unwrap();
    assert_eq!(p1.eval(felt(5772)), felt(232_961_446));
}

#[test]
fn transition_quotient_value_and_degree() {
    let p = params();
    let p2 = transition_quotient(&p.trace_polynomial, p.g).unwrap();
    assert_eq!(p2.degree(), Some(COMPOSITION_DEGREE_BOUND));
    assert_eq!(p2.eval(felt(31415)), felt(2_090_051_528));
}

#[test]
fn encode_constraints_agrees_with_individual_quotients() {
    let p = params();
    let q = encode_constraints(&p.trace_polynomial, p.g).unwrap();
    assert_eq!(q.first.degree(), Some(1021));
    assert_eq!(q.last.degree(), Some(1021));
    assert_eq!(q.transition.eval(felt(31415)), felt(2_090_051_528));
}

fn tampered(row: usize) -> StarkError {
    let mut trace = params().trace.clone();
    trace[row] = trace[row] + felt(1);
    prove_trace::<Blake3Hash>(&FIB_FIELD, trace, 1).expect_err("tampered trace must not prove")
}

#[test]
fn wrong_first_row_fails_first_boundary() {
    let err = tampered(0);
    assert!(err.is_invalid_trace());
    assert!(matches!(
        err,
        StarkError::InvalidTrace {
            constraint: ConstraintKind::BoundaryFirst
        }
    ));
}

#[test]
fn wrong_last_row_fails_last_boundary() {
    assert!(matches!(
        tampered(1022),
        StarkError::InvalidTrace {
            constraint: ConstraintKind::BoundaryLast
        }
    ));
}

#[test]
fn wrong_middle_row_fails_transition() {
    assert!(matches!(
        tampered(511),
        StarkError::InvalidTrace {
            constraint: ConstraintKind::Transition
        }
    ));
}

#[test]
fn short_trace_is_invalid_input() {
    let trace = params().trace[..100].to_vec();
    let err = prove_trace::<Blake3Hash>(&FIB_FIELD, trace, 1).unwrap_err();
    assert!(matches!(err, StarkError::InvalidInput(_)));
    assert!(!err.is_invalid_trace());
}
