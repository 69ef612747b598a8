//! Search strategies over partitions of the variable set: exhaustive
//! enumeration, greedy pairwise-merge agglomeration, and recursive
//! split-based divide-and-conquer.
//!
//! Each strategy is a free function taking `&mut Model`; [`crate::model::Model`]
//! exposes thin `run_*` wrappers around them for callers that don't want to
//! reach into the `search` module directly.

pub mod divide_and_conquer;
pub mod exhaustive;
pub mod greedy;
pub mod rgs;

/// Two candidate partitions within this tolerance of each other are
/// considered equi-optimal (exhaustive search keeps both). A named,
/// adjustable constant rather than a bare literal.
pub const EQUI_OPTIMAL_TOLERANCE: f64 = 1e-6;

/// Exhaustive search is refused above this `n` unless the caller overrides
/// it: the dense evidence cache needs `2^n - 1` `f64`s, which becomes a
/// multi-gigabyte allocation well before `n` reaches 128.
pub const DEFAULT_DENSE_CACHE_N_LIMIT: usize = 30;
