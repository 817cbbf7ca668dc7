//! Dense univariate polynomials in coefficient form.
//!
//! Coefficients are stored lowest degree first and trimmed so the last
//! stored coefficient is non-zero; the zero polynomial has no coefficients
//! and no degree.

use core::ops::{Add, Mul, Neg, Sub};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{FieldError, Fp64};

/// Polynomial over `Fp64<P>`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Polynomial<const P: u64> {
    coeffs: Vec<Fp64<P>>,
}

fn trim<const P: u64>(coeffs: &mut Vec<Fp64<P>>) {
    while coeffs.last().is_some_and(|c| c.is_zero()) {
        coeffs.pop();
    }
}

fn horner<const P: u64>(coeffs: &[Fp64<P>], x: Fp64<P>) -> Fp64<P> {
    coeffs
        .iter()
        .rev()
        .fold(Fp64::zero(), |acc, &c| acc * x + c)
}

impl<const P: u64> Polynomial<P> {
    /// Build from coefficients (lowest degree first); trailing zeros dropped.
    #[must_use]
    pub fn new(mut coeffs: Vec<Fp64<P>>) -> Self {
        trim(&mut coeffs);
        Self { coeffs }
    }

    /// Build from integer coefficients reduced mod `P`.
    #[must_use]
    pub fn from_u64s(coeffs: &[u64]) -> Self {
        Self::new(coeffs.iter().map(|&c| Fp64::from_u64(c)).collect())
    }

    /// Build from signed integer coefficients.
    #[must_use]
    pub fn from_i64s(coeffs: &[i64]) -> Self {
        Self::new(coeffs.iter().map(|&c| Fp64::from_i64(c)).collect())
    }

    /// The zero polynomial.
    #[must_use]
    pub const fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// Constant polynomial.
    #[must_use]
    pub fn constant(c: Fp64<P>) -> Self {
        Self::new(vec![c])
    }

    /// `coeff · X^degree`.
    #[must_use]
    pub fn monomial(degree: usize, coeff: Fp64<P>) -> Self {
        let mut v = vec![Fp64::zero(); degree + 1];
        v[degree] = coeff;
        Self::new(v)
    }

    /// `X - root`.
    #[must_use]
    pub fn linear_root(root: Fp64<P>) -> Self {
        Self::new(vec![-root, Fp64::one()])
    }

    /// Coefficients, lowest degree first.
    #[must_use]
    pub fn coeffs(&self) -> &[Fp64<P>] {
        &self.coeffs
    }

    /// Degree, `None` for the zero polynomial.
    #[must_use]
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Whether this is the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Coefficient of `X^i` (zero past the degree).
    #[must_use]
    pub fn coeff(&self, i: usize) -> Fp64<P> {
        self.coeffs.get(i).copied().unwrap_or_default()
    }

    /// Coefficient of `X^0`.
    #[must_use]
    pub fn constant_term(&self) -> Fp64<P> {
        self.coeff(0)
    }

    /// Horner evaluation.
    #[must_use]
    pub fn eval(&self, x: Fp64<P>) -> Fp64<P> {
        horner(&self.coeffs, x)
    }

    /// Evaluate at every point, preserving order.
    #[must_use]
    pub fn eval_many(&self, points: &[Fp64<P>]) -> Vec<Fp64<P>> {
        #[cfg(feature = "parallel")]
        {
            points.par_iter().map(|&x| self.eval(x)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            points.iter().map(|&x| self.eval(x)).collect()
        }
    }

    /// Multiply every coefficient by `c`.
    #[must_use]
    pub fn scale(&self, c: Fp64<P>) -> Self {
        Self::new(self.coeffs.iter().map(|&a| a * c).collect())
    }

    /// Long division: returns `(q, r)` with `self = q·divisor + r` and
    /// `deg r < deg divisor`.
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self), FieldError> {
        let Some(dd) = divisor.degree() else {
            return Err(FieldError::DivisionByZero);
        };
        let Some(nd) = self.degree() else {
            return Ok((Self::zero(), Self::zero()));
        };
        if nd < dd {
            return Ok((Self::zero(), self.clone()));
        }
        let lead_inv = divisor.coeffs[dd]
            .try_inv()
            .ok_or(FieldError::DivisionByZero)?;

        let mut rem = self.coeffs.clone();
        let mut quo = vec![Fp64::zero(); nd - dd + 1];
        for i in (0..=nd - dd).rev() {
            let c = rem[i + dd] * lead_inv;
            quo[i] = c;
            if c.is_zero() {
                continue;
            }
            for (j, &d) in divisor.coeffs.iter().enumerate() {
                rem[i + j] -= c * d;
            }
        }
        rem.truncate(dd);
        Ok((Self::new(quo), Self::new(rem)))
    }

    /// Exact division; `Ok(None)` when the remainder is non-zero.
    pub fn div_exact(&self, divisor: &Self) -> Result<Option<Self>, FieldError> {
        let (q, r) = self.div_rem(divisor)?;
        Ok(r.is_zero().then_some(q))
    }

    /// Composition `self(inner(X))`.
    #[must_use]
    pub fn compose(&self, inner: &Self) -> Self {
        self.coeffs.iter().rev().fold(Self::zero(), |acc, &c| {
            &(&acc * inner) + &Self::constant(c)
        })
    }

    /// `self^e` by repeated squaring.
    #[must_use]
    pub fn pow(&self, mut e: u64) -> Self {
        let mut base = self.clone();
        let mut acc = Self::constant(Fp64::one());
        while e > 0 {
            if e & 1 == 1 {
                acc = &acc * &base;
            }
            e >>= 1;
            if e > 0 {
                base = &base * &base;
            }
        }
        acc
    }

    /// Even-indexed coefficients as a polynomial: `E` with `P(X) = E(X²) + X·O(X²)`.
    #[must_use]
    pub fn even_part(&self) -> Self {
        Self::new(self.coeffs.iter().step_by(2).copied().collect())
    }

    /// Odd-indexed coefficients as a polynomial: `O` with `P(X) = E(X²) + X·O(X²)`.
    #[must_use]
    pub fn odd_part(&self) -> Self {
        Self::new(self.coeffs.iter().skip(1).step_by(2).copied().collect())
    }

    /// Lagrange interpolation: the unique polynomial of degree `< n` with
    /// `p(xs[i]) = ys[i]`.
    ///
    /// Builds the vanishing polynomial once and divides out each root
    /// synthetically, so the cost is `O(n²)` field operations.
    pub fn interpolate(xs: &[Fp64<P>], ys: &[Fp64<P>]) -> Result<Self, FieldError> {
        if xs.len() != ys.len() {
            return Err(FieldError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        let n = xs.len();
        if n == 0 {
            return Ok(Self::zero());
        }

        // Z(X) = Π (X - x_i), n + 1 coefficients.
        let mut z = vec![Fp64::<P>::one()];
        for &xi in xs {
            z.push(Fp64::zero());
            for k in (1..z.len()).rev() {
                z[k] = z[k - 1] - xi * z[k];
            }
            z[0] = -(xi * z[0]);
        }

        let mut acc = vec![Fp64::<P>::zero(); n];
        let mut q = vec![Fp64::<P>::zero(); n];
        for (i, (&xi, &yi)) in xs.iter().zip(ys).enumerate() {
            // q = Z / (X - x_i)
            q[n - 1] = z[n];
            for k in (1..n).rev() {
                q[k - 1] = z[k] + xi * q[k];
            }
            let denom = horner(&q, xi);
            let inv = denom
                .try_inv()
                .ok_or(FieldError::DuplicatePoint { index: i })?;
            let w = yi * inv;
            if w.is_zero() {
                continue;
            }
            for (a, &qk) in acc.iter_mut().zip(&q) {
                *a += w * qk;
            }
        }
        Ok(Self::new(acc))
    }
}

impl<const P: u64> From<Fp64<P>> for Polynomial<P> {
    fn from(c: Fp64<P>) -> Self {
        Self::constant(c)
    }
}

impl<'b, const P: u64> Add<&'b Polynomial<P>> for &Polynomial<P> {
    type Output = Polynomial<P>;

    fn add(self, rhs: &'b Polynomial<P>) -> Polynomial<P> {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        Polynomial::new((0..n).map(|i| self.coeff(i) + rhs.coeff(i)).collect())
    }
}

impl<'b, const P: u64> Sub<&'b Polynomial<P>> for &Polynomial<P> {
    type Output = Polynomial<P>;

    fn sub(self, rhs: &'b Polynomial<P>) -> Polynomial<P> {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        Polynomial::new((0..n).map(|i| self.coeff(i) - rhs.coeff(i)).collect())
    }
}

impl<'b, const P: u64> Mul<&'b Polynomial<P>> for &Polynomial<P> {
    type Output = Polynomial<P>;

    fn mul(self, rhs: &'b Polynomial<P>) -> Polynomial<P> {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::zero();
        }
        let mut out = vec![Fp64::zero(); self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, &b) in rhs.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Polynomial::new(out)
    }
}

impl<const P: u64> Neg for &Polynomial<P> {
    type Output = Polynomial<P>;

    fn neg(self) -> Polynomial<P> {
        Polynomial::new(self.coeffs.iter().map(|&c| -c).collect())
    }
}

macro_rules! owned_binop {
    ($tr:ident, $m:ident) => {
        impl<const P: u64> $tr for Polynomial<P> {
            type Output = Polynomial<P>;
            fn $m(self, rhs: Self) -> Polynomial<P> {
                (&self).$m(&rhs)
            }
        }
    };
}
owned_binop!(Add, add);
owned_binop!(Sub, sub);
owned_binop!(Mul, mul);

impl<const P: u64> Neg for Polynomial<P> {
    type Output = Self;
    fn neg(self) -> Self {
        -&self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: u64 = 97;
    type F = Fp64<P>;
    type Poly = Polynomial<P>;

    #[test]
    fn trims_trailing_zeros() {
        let p = Poly::from_u64s(&[1, 2, 0, 0]);
        assert_eq!(p.degree(), Some(1));
        assert!(Poly::from_u64s(&[0, 0]).is_zero());
        assert_eq!(Poly::zero().degree(), None);
    }

    #[test]
    fn arithmetic_and_eval() {
        let a = Poly::from_u64s(&[1, 2]); // 1 + 2x
        let b = Poly::from_u64s(&[3, 0, 1]); // 3 + x^2
        let x = F::from_u64(5);
        assert_eq!((&a + &b).eval(x), a.eval(x) + b.eval(x));
        assert_eq!((&a - &b).eval(x), a.eval(x) - b.eval(x));
        assert_eq!((&a * &b).eval(x), a.eval(x) * b.eval(x));
        assert_eq!((-&a).eval(x), -a.eval(x));
        assert_eq!((&a - &a), Poly::zero());
    }

    #[test]
    fn division_by_linear_factor() {
        // (x - 3)(x + 4) = x^2 + x - 12
        let p = Poly::from_i64s(&[-12, 1, 1]);
        let q = p.div_exact(&Poly::linear_root(F::from_u64(3))).unwrap().unwrap();
        assert_eq!(q, Poly::from_u64s(&[4, 1]));
        let (_, r) = p.div_rem(&Poly::linear_root(F::from_u64(2))).unwrap();
        assert_eq!(r, Poly::constant(p.eval(F::from_u64(2))));
        assert_eq!(p.div_rem(&Poly::zero()), Err(FieldError::DivisionByZero));
    }

    #[test]
    fn compose_and_pow() {
        let p = Poly::from_u64s(&[1, 0, 1]); // 1 + x^2
        let inner = Poly::from_u64s(&[0, 2]); // 2x
        assert_eq!(p.compose(&inner), Poly::from_u64s(&[1, 0, 4]));
        let sq = p.pow(2);
        assert_eq!(sq, &p * &p);
        assert_eq!(p.pow(0), Poly::constant(F::one()));
    }

    #[test]
    fn even_odd_split_by_index() {
        let p = Poly::from_u64s(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(p.even_part(), Poly::from_u64s(&[1, 3, 5]));
        assert_eq!(p.odd_part(), Poly::from_u64s(&[2, 4, 6]));
        let x = F::from_u64(7);
        let x2 = x.square();
        assert_eq!(p.eval(x), p.even_part().eval(x2) + x * p.odd_part().eval(x2));
    }

    #[test]
    fn interpolation_hits_points() {
        let xs: Vec<F> = [2u64, 5, 7, 11].iter().map(|&v| F::from_u64(v)).collect();
        let ys: Vec<F> = [3u64, 0, 96, 40].iter().map(|&v| F::from_u64(v)).collect();
        let p = Poly::interpolate(&xs, &ys).unwrap();
        assert!(p.degree().unwrap_or(0) < 4);
        for (x, y) in xs.iter().zip(&ys) {
            assert_eq!(p.eval(*x), *y);
        }
    }

    #[test]
    fn interpolation_rejects_bad_input() {
        let xs = [F::from_u64(1), F::from_u64(1)];
        let ys = [F::from_u64(2), F::from_u64(3)];
        assert_eq!(
            Poly::interpolate(&xs, &ys),
            Err(FieldError::DuplicatePoint { index: 0 })
        );
        assert!(matches!(
            Poly::interpolate(&xs, &ys[..1]),
            Err(FieldError::LengthMismatch { xs: 2, ys: 1 })
        ));
    }
}
