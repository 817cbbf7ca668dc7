//! Small prime fields, dense polynomials and multiplicative domains.
//!
//! - `Fp64<P>`: prime field modulo a 64-bit prime `P` (const generic).
//! - [`FieldContext`]: the explicit field context (modulus + multiplicative
//!   generator) handed to every pipeline stage instead of global state.
//! - [`Polynomial`]: dense coefficient-form polynomials with the algebra the
//!   constraint encoder and FRI need (division with remainder, composition,
//!   Lagrange interpolation, even/odd split).
//! - [`domain`]: multiplicative subgroups and their cosets.
//!
//! The FibSTARK field is `q = 3·2^30 + 1 = 3221225473` with generator `5`;
//! see [`FIB_MODULUS`] / [`FIB_FIELD`]. Toy moduli (17, 97, ...) work the same
//! way and keep unit tests fast.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::doc_markdown
)]
#![allow(clippy::cast_possible_truncation, clippy::module_name_repetitions)]

pub mod domain;
pub use domain::{Coset, Subgroup};

pub mod poly;
pub use poly::Polynomial;

mod error;
pub use error::FieldError;

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use core::str::FromStr;

/// 64-bit prime field element (const generic modulus).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fp64<const P: u64>(
    /// Canonical residue in `[0, P)`.
    pub u64,
);

impl<const P: u64> Fp64<P> {
    /// Zero.
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// One.
    #[inline]
    #[must_use]
    pub const fn one() -> Self {
        Self(1 % P)
    }

    /// Square-and-multiply, scanning `e` from its top bit down.
    #[must_use]
    pub fn pow(self, e: u64) -> Self {
        (0..u64::BITS - e.leading_zeros()).rev().fold(Self::one(), |acc, bit| {
            let acc = acc.square();
            if (e >> bit) & 1 == 1 {
                acc * self
            } else {
                acc
            }
        })
    }

    /// `self * self`.
    #[inline]
    #[must_use]
    pub fn square(self) -> Self {
        self * self
    }

    /// Multiplicative inverse, `None` for zero (P assumed prime).
    #[inline]
    #[must_use]
    pub fn try_inv(self) -> Option<Self> {
        if self.0 == 0 {
            None
        } else {
            Some(self.pow(P - 2))
        }
    }

    /// Multiplicative inverse. Zero maps to zero; use [`Self::try_inv`] when
    /// the operand may vanish.
    #[inline]
    #[must_use]
    pub fn inv(self) -> Self {
        self.pow(P - 2)
    }

    /// Signed integer; negatives wrap to `P - |x| mod P`.
    #[must_use]
    pub const fn from_i64(x: i64) -> Self {
        let m = x.unsigned_abs() % P;
        if x < 0 && m != 0 {
            Self(P - m)
        } else {
            Self(m)
        }
    }

    /// From `u64` reduced mod `P`.
    #[inline]
    #[must_use]
    pub const fn from_u64(x: u64) -> Self {
        Self(x % P)
    }

    /// Canonical integer representative in `[0, P)`.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Whether this is the additive identity.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Minimal big-endian encoding of the canonical representative.
    ///
    /// Leading zero bytes are stripped, so zero encodes as the empty string
    /// (the usual big-integer byte convention).
    #[must_use]
    pub fn to_be_bytes_trimmed(self) -> Vec<u8> {
        let be = self.0.to_be_bytes();
        let first = be.iter().position(|&b| b != 0).unwrap_or(be.len());
        be[first..].to_vec()
    }

    /// Inverse of [`Self::to_be_bytes_trimmed`]; rejects non-canonical values.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, FieldError> {
        let significant = bytes.iter().skip_while(|&&b| b == 0).count();
        if significant > 8 {
            return Err(FieldError::NonCanonical {
                value: format!("0x{}", bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()),
                modulus: P,
            });
        }
        let v = bytes
            .iter()
            .skip_while(|&&b| b == 0)
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        if v >= P {
            return Err(FieldError::NonCanonical {
                value: v.to_string(),
                modulus: P,
            });
        }
        Ok(Self(v))
    }

}

impl<const P: u64> Default for Fp64<P> {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl<const P: u64> fmt::Display for Fp64<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a canonical decimal representative.
impl<const P: u64> FromStr for Fp64<P> {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v: u64 = s.trim().parse().map_err(|_| FieldError::NonCanonical {
            value: s.to_owned(),
            modulus: P,
        })?;
        if v >= P {
            return Err(FieldError::NonCanonical {
                value: s.to_owned(),
                modulus: P,
            });
        }
        Ok(Self(v))
    }
}

// Residues stay below `P`, so sums and differences need at most one
// correction and products fit in 128 bits.
impl<const P: u64> Add for Fp64<P> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        let (s, carry) = self.0.overflowing_add(rhs.0);
        Self(if carry || s >= P { s.wrapping_sub(P) } else { s })
    }
}
impl<const P: u64> Sub for Fp64<P> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        let (d, borrow) = self.0.overflowing_sub(rhs.0);
        Self(if borrow { d.wrapping_add(P) } else { d })
    }
}
impl<const P: u64> Mul for Fp64<P> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self((u128::from(self.0) * u128::from(rhs.0) % u128::from(P)) as u64)
    }
}
impl<const P: u64> AddAssign for Fp64<P> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl<const P: u64> SubAssign for Fp64<P> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
impl<const P: u64> MulAssign for Fp64<P> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
impl<const P: u64> Neg for Fp64<P> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::zero() - self
    }
}
impl<const P: u64> Sum for Fp64<P> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}

/* ---------------------------- Field context ---------------------------- */

/// Explicit field context: the modulus (carried by the type) plus a generator
/// of the full multiplicative group.
///
/// Pipeline stages receive this value instead of reading process-wide
/// constants, so the same code runs over toy fields in tests.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldContext<const P: u64> {
    generator: Fp64<P>,
}

impl<const P: u64> FieldContext<P> {
    /// Build a context, checking that `generator` has order exactly `P - 1`.
    pub fn new(generator: u64) -> Result<Self, FieldError> {
        let g = Fp64::<P>::from_u64(generator);
        if !has_exact_order(g, P - 1) {
            return Err(FieldError::NotAGenerator {
                element: g.0,
                order: P - 1,
            });
        }
        Ok(Self { generator: g })
    }

    /// Build a context without checking the generator order.
    #[must_use]
    pub const fn new_unchecked(generator: u64) -> Self {
        Self {
            generator: Fp64::<P>::from_u64(generator),
        }
    }

    /// Field modulus.
    #[inline]
    #[must_use]
    pub const fn modulus(&self) -> u64 {
        P
    }

    /// Generator of the multiplicative group.
    #[inline]
    #[must_use]
    pub const fn generator(&self) -> Fp64<P> {
        self.generator
    }

    /// Order of the multiplicative group (`P - 1`).
    #[inline]
    #[must_use]
    pub const fn group_order(&self) -> u64 {
        P - 1
    }

    /// Element of exact multiplicative order `order`: `generator^((P-1)/order)`.
    pub fn element_of_order(&self, order: u64) -> Result<Fp64<P>, FieldError> {
        if order == 0 || (P - 1) % order != 0 {
            return Err(FieldError::UnsupportedOrder {
                order,
                group_order: P - 1,
            });
        }
        let w = self.generator.pow((P - 1) / order);
        if !has_exact_order(w, order) {
            return Err(FieldError::NotAGenerator { element: w.0, order });
        }
        Ok(w)
    }

    /// Multiplicative subgroup of the given order.
    pub fn subgroup(&self, order: usize) -> Result<Subgroup<P>, FieldError> {
        let gen = self.element_of_order(order as u64)?;
        Ok(Subgroup { size: order, gen })
    }
}

/// Whether `x` has multiplicative order exactly `order`.
#[must_use]
pub fn has_exact_order<const P: u64>(x: Fp64<P>, order: u64) -> bool {
    if order == 0 || x.pow(order) != Fp64::one() {
        return false;
    }
    prime_factors(order)
        .into_iter()
        .all(|q| x.pow(order / q) != Fp64::one())
}

/// Distinct prime factors by trial division (orders here are tiny or smooth).
fn prime_factors(mut n: u64) -> Vec<u64> {
    let mut out = Vec::new();
    let mut d = 2u64;
    while d.saturating_mul(d) <= n {
        if n % d == 0 {
            out.push(d);
            while n % d == 0 {
                n /= d;
            }
        }
        d += 1;
    }
    if n > 1 {
        out.push(n);
    }
    out
}

/* ---------------------------- FibSTARK field --------------------------- */

/// FibSTARK prime `q = 3·2^30 + 1`.
pub const FIB_MODULUS: u64 = 3_221_225_473;

/// Generator of the multiplicative group of [`FIB_MODULUS`].
pub const FIB_GENERATOR: u64 = 5;

/// FibSTARK field element type.
pub type Felt = Fp64<FIB_MODULUS>;

/// FibSTARK polynomial type.
pub type FeltPoly = Polynomial<FIB_MODULUS>;

/// Field context for [`FIB_MODULUS`] (generator verified in tests).
pub const FIB_FIELD: FieldContext<FIB_MODULUS> = FieldContext::new_unchecked(FIB_GENERATOR);
