//! Multiplicative subgroups and their cosets.
//!
//! A [`Subgroup`] of order `n` is `⟨gen⟩ = {gen^0, ..., gen^(n-1)}`; a
//! [`Coset`] is `shift · ⟨gen⟩`. Both enumerate elements in power order,
//! which is the order every commitment in the prover relies on.

use crate::Fp64;

/// A multiplicative subgroup domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subgroup<const P: u64> {
    /// Subgroup order.
    pub size: usize,
    /// A generator of the subgroup.
    pub gen: Fp64<P>,
}

impl<const P: u64> Subgroup<P> {
    /// Return the `i`-th element: `gen^i`.
    #[inline]
    #[must_use]
    pub fn element(&self, i: usize) -> Fp64<P> {
        self.gen.pow(i as u64)
    }

    /// All elements `gen^0 .. gen^(size-1)`, by repeated multiplication.
    #[must_use]
    pub fn elements(&self) -> Vec<Fp64<P>> {
        let mut out = Vec::with_capacity(self.size);
        let mut cur = Fp64::<P>::one();
        for _ in 0..self.size {
            out.push(cur);
            cur *= self.gen;
        }
        out
    }

    /// Membership test: `x^size == 1`.
    #[must_use]
    pub fn contains(&self, x: Fp64<P>) -> bool {
        !x.is_zero() && x.pow(self.size as u64) == Fp64::one()
    }

    /// Shift this subgroup into a coset.
    #[must_use]
    pub fn coset(self, shift: Fp64<P>) -> Coset<P> {
        Coset { base: self, shift }
    }
}

/// A multiplicative coset `shift · ⟨gen⟩`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coset<const P: u64> {
    /// Base subgroup.
    pub base: Subgroup<P>,
    /// Coset representative.
    pub shift: Fp64<P>,
}

impl<const P: u64> Coset<P> {
    /// Number of elements in the coset (same as base).
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.base.size
    }

    /// `i`-th element: `shift * gen^i`.
    #[inline]
    #[must_use]
    pub fn element(&self, i: usize) -> Fp64<P> {
        self.shift * self.base.element(i)
    }

    /// All elements in power order.
    #[must_use]
    pub fn elements(&self) -> Vec<Fp64<P>> {
        self.base
            .elements()
            .into_iter()
            .map(|w| self.shift * w)
            .collect()
    }

    /// Membership test: `(x / shift)^size == 1`.
    #[must_use]
    pub fn contains(&self, x: Fp64<P>) -> bool {
        self.shift
            .try_inv()
            .is_some_and(|s_inv| self.base.contains(x * s_inv))
    }
}
