//! The five-term multi-objective cost kernel.
//!
//! `total_cost` (and its structured sibling [`cost_breakdown`]) is the
//! single scoring function the baseline placer ignores by design and the
//! simulated annealing driver lives and breathes: wirelength, overlap,
//! boundary, thermal coupling and wall-attraction, summed.
//!
//! All five terms and the constants that weight them are part of the
//! public contract of this solver — they are reproduced bit-for-bit from
//! the specification rather than re-derived, since two different-looking
//! but numerically-equivalent formulas would silently change what "optimal"
//! means.

pub mod cost;

pub use cost::{CostBreakdown, cost_breakdown, total_cost};
