use thiserror::Error;

/// Errors raised by field, polynomial and domain helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Interpolation got a different number of points and values.
    #[error("interpolation inputs differ in length: {xs} points vs {ys} values")]
    LengthMismatch {
        /// Number of x-coordinates.
        xs: usize,
        /// Number of y-values.
        ys: usize,
    },

    /// Interpolation point repeated.
    #[error("interpolation point at index {index} is repeated")]
    DuplicatePoint {
        /// Position of the offending point.
        index: usize,
    },

    /// Division by the zero polynomial.
    #[error("polynomial division by the zero polynomial")]
    DivisionByZero,

    /// Requested subgroup order does not divide the group order.
    #[error("no subgroup of order {order} in a multiplicative group of order {group_order}")]
    UnsupportedOrder {
        /// Requested order.
        order: u64,
        /// `P - 1`.
        group_order: u64,
    },

    /// Element does not have the expected multiplicative order.
    #[error("{element} does not have multiplicative order {order}")]
    NotAGenerator {
        /// Offending element.
        element: u64,
        /// Expected order.
        order: u64,
    },

    /// Encoded value is not in `[0, P)`.
    #[error("{value} is not a canonical element of the field of order {modulus}")]
    NonCanonical {
        /// Input as seen by the parser.
        value: String,
        /// Field modulus.
        modulus: u64,
    },
}
