//! Constraint encoder: each correctness constraint becomes an exact
//! polynomial division whose quotient is low degree iff the trace is valid.

use tracing::{debug, info_span};

use crate::error::{ConstraintKind, Result, StarkError};
use crate::field::{Felt, FeltPoly};
use crate::params::{G_ORDER, LAST_ROW_EXP, TRACE_FIRST, TRACE_LAST, TRANSITION_EXCLUDED_EXPS};

/// The three constraint quotients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintQuotients {
    /// `(f(x) - 1) / (x - 1)`.
    pub first: FeltPoly,
    /// `(f(x) - a[1022]) / (x - g^1022)`.
    pub last: FeltPoly,
    /// `(f(g²x) - f(gx)² - f(x)²) / transition_denominator(g)`.
    pub transition: FeltPoly,
}

impl ConstraintQuotients {
    /// Quotients in composition order.
    #[must_use]
    pub fn as_array(&self) -> [&FeltPoly; 3] {
        [&self.first, &self.last, &self.transition]
    }
}

/// Encode all three constraints; fails with [`StarkError::InvalidTrace`]
/// naming the first constraint whose division is not exact.
pub fn encode_constraints(f: &FeltPoly, g: Felt) -> Result<ConstraintQuotients> {
    let _span = info_span!("constraints").entered();
    let first = first_value_quotient(f)?;
    let last = last_value_quotient(f, g)?;
    let transition = transition_quotient(f, g)?;
    debug!(
        first = ?first.degree(),
        last = ?last.degree(),
        transition = ?transition.degree(),
        "constraint quotient degrees"
    );
    Ok(ConstraintQuotients {
        first,
        last,
        transition,
    })
}

/// `(f(x) - 1) / (x - 1)`.
pub fn first_value_quotient(f: &FeltPoly) -> Result<FeltPoly> {
    let numer = f - &FeltPoly::constant(Felt::from_u64(TRACE_FIRST));
    exact(&numer, &FeltPoly::linear_root(Felt::one()), ConstraintKind::BoundaryFirst)
}

/// `(f(x) - 2338775057) / (x - g^1022)`.
pub fn last_value_quotient(f: &FeltPoly, g: Felt) -> Result<FeltPoly> {
    let numer = f - &FeltPoly::constant(Felt::from_u64(TRACE_LAST));
    let denom = FeltPoly::linear_root(g.pow(LAST_ROW_EXP));
    exact(&numer, &denom, ConstraintKind::BoundaryLast)
}

/// `(f(g²x) - f(gx)² - f(x)²) / transition_denominator(g)`.
pub fn transition_quotient(f: &FeltPoly, g: Felt) -> Result<FeltPoly> {
    let f_gx = f.compose(&FeltPoly::monomial(1, g));
    let f_g2x = f.compose(&FeltPoly::monomial(1, g.square()));
    let numer = &(&f_g2x - &f_gx.pow(2)) - &f.pow(2);
    let denom = transition_denominator(g)?;
    exact(&numer, &denom, ConstraintKind::Transition)
}

/// `(x^1024 - 1) / ((x - g^1021)(x - g^1022)(x - g^1023))`: vanishes on `G`
/// except the last three powers of `g`.
pub fn transition_denominator(g: Felt) -> Result<FeltPoly> {
    let vanishing = &FeltPoly::monomial(G_ORDER, Felt::one()) - &FeltPoly::constant(Felt::one());
    let excluded = TRANSITION_EXCLUDED_EXPS
        .iter()
        .fold(FeltPoly::constant(Felt::one()), |acc, &e| {
            &acc * &FeltPoly::linear_root(g.pow(e))
        });
    vanishing.div_exact(&excluded)?.ok_or_else(|| {
        StarkError::DomainIntegrity(
            "excluded roots do not divide the vanishing polynomial of G".into(),
        )
    })
}

fn exact(numer: &FeltPoly, denom: &FeltPoly, constraint: ConstraintKind) -> Result<FeltPoly> {
    numer
        .div_exact(denom)?
        .ok_or(StarkError::InvalidTrace { constraint })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FIB_FIELD;

    #[test]
    fn transition_denominator_shape() {
        let g = FIB_FIELD.element_of_order(1024).unwrap();
        let d = transition_denominator(g).unwrap();
        assert_eq!(d.degree(), Some(1021));
        assert_eq!(d.eval(g.pow(5)), Felt::zero());
        assert_ne!(d.eval(g.pow(1022)), Felt::zero());
    }

    #[test]
    fn non_generator_breaks_denominator() {
        // g^1021 for an element of order != 1024 is not a root of x^1024 - 1
        let not_g = Felt::from_u64(2);
        assert!(matches!(
            transition_denominator(not_g),
            Err(StarkError::DomainIntegrity(_))
        ));
    }

    #[test]
    fn boundary_quotient_of_constant_polynomial() {
        let f = FeltPoly::constant(Felt::one());
        assert!(first_value_quotient(&f).unwrap().is_zero());
        let g = FIB_FIELD.element_of_order(1024).unwrap();
        assert!(matches!(
            last_value_quotient(&f, g),
            Err(StarkError::InvalidTrace {
                constraint: ConstraintKind::BoundaryLast
            })
        ));
    }
}
