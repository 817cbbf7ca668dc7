//! The Fibonacci-square trace: `a[i] = a[i-1]² + a[i-2]²`.

use crate::field::Felt;
use crate::params::{TRACE_FIRST, TRACE_LEN, TRACE_SECOND};

/// `len` terms of the Fibonacci-square sequence seeded with `a0, a1`.
#[must_use]
pub fn fibonacci_square(a0: Felt, a1: Felt, len: usize) -> Vec<Felt> {
    let mut a = Vec::with_capacity(len);
    a.extend([a0, a1].into_iter().take(len));
    for i in 2..len {
        let next = a[i - 1].square() + a[i - 2].square();
        a.push(next);
    }
    a
}

/// The fixed 1023-row trace with `a[0] = 1`, `a[1] = 3141592`.
#[must_use]
pub fn fib_square_trace() -> Vec<Felt> {
    fibonacci_square(
        Felt::from_u64(TRACE_FIRST),
        Felt::from_u64(TRACE_SECOND),
        TRACE_LEN,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::TRACE_LAST;

    #[test]
    fn known_terms() {
        let a = fib_square_trace();
        assert_eq!(a.len(), TRACE_LEN);
        assert_eq!(a[0].as_u64(), 1);
        assert_eq!(a[1].as_u64(), 3_141_592);
        assert_eq!(a[2].as_u64(), (3_141_592u64 * 3_141_592 + 1) % 3_221_225_473);
        assert_eq!(a[TRACE_LEN - 1].as_u64(), TRACE_LAST);
    }

    #[test]
    fn short_lengths() {
        let one = Felt::one();
        assert!(fibonacci_square(one, one, 0).is_empty());
        assert_eq!(fibonacci_square(one, one, 1), vec![one]);
        assert_eq!(fibonacci_square(one, one, 3)[2].as_u64(), 2);
    }
}
