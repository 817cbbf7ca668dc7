//! Protocol constants. These are fixed by the trace length and must not be
//! derived at runtime.

/* ------------------------------ Trace shape -------------------------------- */

/// Number of trace rows.
pub const TRACE_LEN: usize = 1023;

/// `a[0]`.
pub const TRACE_FIRST: u64 = 1;

/// `a[1]`.
pub const TRACE_SECOND: u64 = 3_141_592;

/// Claimed `a[1022]`.
pub const TRACE_LAST: u64 = 2_338_775_057;

/* -------------------------------- Domains ---------------------------------- */

/// Order of the trace subgroup `G`.
pub const G_ORDER: usize = 1024;

/// Order of the evaluation subgroup `H`.
pub const H_ORDER: usize = 8192;

/// `|H| / |G|`; also the index offset between `x` and `g·x` in the
/// evaluation domain.
pub const BLOWUP: usize = H_ORDER / G_ORDER;

/* ------------------------------- Constraints ------------------------------- */

/// Exponent of `g` in the last-value boundary constraint.
pub const LAST_ROW_EXP: u64 = 1022;

/// Exponents of `g` excluded from the transition vanishing set.
pub const TRANSITION_EXCLUDED_EXPS: [u64; 3] = [1021, 1022, 1023];

/// Number of constraint quotients (and composition coefficients).
pub const NUM_CONSTRAINTS: usize = 3;

/* --------------------------------- Queries --------------------------------- */

/// Default number of independent queries.
pub const DEFAULT_NUM_QUERIES: usize = 3;

/// Largest index a query may start at, leaving room for the `x·g` and
/// `x·g²` reads at `+BLOWUP` and `+2·BLOWUP`.
pub const MAX_QUERY_INDEX: u64 = (H_ORDER - 1 - 2 * BLOWUP) as u64;

/* ----------------------------------- FRI ----------------------------------- */

/// Degree of the composition polynomial, set by the transition quotient:
/// `2·1022 - 1021`.
pub const COMPOSITION_DEGREE_BOUND: usize = 1023;

/// FRI layers for the fixed instance: one per fold from degree 1023 down to
/// 0, plus the composition layer.
pub const FRI_NUM_LAYERS: usize = 11;
