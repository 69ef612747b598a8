//! Exhaustive search: visit every set partition of the variable set via
//! [`RgsEnumerator`] and keep the set of equi-optimal best partitions.

use crate::error::{McmError, Result};
use crate::model::Model;
use crate::partition::rgs_to_partition;
use crate::search::rgs::RgsEnumerator;
use crate::search::{DEFAULT_DENSE_CACHE_N_LIMIT, EQUI_OPTIMAL_TOLERANCE};

/// Runs exhaustive search against `model`, using [`EQUI_OPTIMAL_TOLERANCE`]
/// and [`DEFAULT_DENSE_CACHE_N_LIMIT`]. See [`run_with`] to override either.
pub fn run(model: &mut Model) -> Result<()> {
    run_with(model, EQUI_OPTIMAL_TOLERANCE, DEFAULT_DENSE_CACHE_N_LIMIT)
}

/// Runs exhaustive search against `model`, enumerating every RGS of length
/// `n` via [`RgsEnumerator`], computing each partition's log-evidence, and
/// folding it into the running best set (partitions within `tolerance` of
/// the current best are kept alongside it).
///
/// Refuses to run (`McmError::NumericLimit`) when `n` exceeds
/// `dense_cache_n_limit`: the dense evidence cache needs `2^n - 1` `f64`s,
/// which the `Model` should not attempt to allocate beyond that point.
pub fn run_with(model: &mut Model, tolerance: f64, dense_cache_n_limit: usize) -> Result<()> {
    let n = model.dataset().n();
    if n > dense_cache_n_limit {
        return Err(McmError::NumericLimit {
            n,
            threshold: dense_cache_n_limit,
        });
    }

    model.reset_for_search(true);

    let mut enumerator = RgsEnumerator::new(n);
    while let Some(rgs) = enumerator.advance() {
        let partition = rgs_to_partition(rgs, n);
        let log_evidence = model.evidence(&partition);
        model.record_candidate(&partition, log_evidence, tolerance);
    }
    Ok(())
}
