//! Closed-form log-evidence of an Independent Complete Component (ICC),
//! under a Dirichlet(1/2) prior over the states of the component, with
//! memoization across repeated queries against the same dataset.

use std::collections::HashMap;
use std::f64::consts::PI;

use crate::dataset::Dataset;
use crate::partition::{component_size, Partition};

/// Above this component size, `q^r` would overflow or lose precision in
/// `lgamma`; the large-component asymptotic prefactor is used instead.
pub const LARGE_COMPONENT_THRESHOLD: u32 = 25;

/// Histograms the dataset's projections onto `component`: maps each
/// distinct projected state to how many observations produced it.
pub fn count_observations(dataset: &Dataset, component: u128) -> HashMap<Vec<u128>, u32> {
    let mut counts = HashMap::new();
    for obs in dataset.observations() {
        *counts.entry(obs.project(component)).or_insert(0) += 1;
    }
    counts
}

/// Log-evidence of a single ICC `component` of size `r`, given its observed
/// state histogram and the dataset/model scalars.
pub fn calc_evidence_icc(dataset: &Dataset, pow_q: &[f64], component: u128) -> f64 {
    let r = component_size(component) as usize;
    let counts = count_observations(dataset, component);

    let mut log_evidence = 0.0;
    for &n_s in counts.values() {
        log_evidence += libm::lgamma(n_s as f64 + 0.5) - 0.5 * libm::log(PI);
    }

    let big_n = dataset.len() as f64;
    let q = dataset.q() as f64;
    if r as u32 > LARGE_COMPONENT_THRESHOLD {
        // lgamma(q^r/2) would overflow; use the leading-order asymptotic.
        log_evidence -= r as f64 * libm::log(q) * big_n;
    } else {
        let half_pow = pow_q[r] / 2.0;
        log_evidence += libm::lgamma(half_pow) - libm::lgamma(big_n + half_pow);
    }
    log_evidence
}

/// Dual dense/sparse memoization for per-component log-evidence.
///
/// `Dense` is used during exhaustive search, where every non-empty
/// component in `1..2^n` is eventually queried: a flat `Vec` indexed by
/// `component - 1` beats hashing. A stored `0.0` means "not yet computed"
/// (a true log-evidence is never exactly zero for `N >= 1` under the 1/2
/// prior, asserted below). `Sparse` is used by greedy and
/// divide-and-conquer, which only ever touch a small fraction of
/// components.
pub enum EvidenceCache {
    Dense(Vec<f64>),
    Sparse(HashMap<u128, f64>),
}

impl EvidenceCache {
    pub fn new_dense(n: usize) -> Self {
        let n_iccs = (1u128 << n) - 1;
        EvidenceCache::Dense(vec![0.0; n_iccs as usize])
    }

    pub fn new_sparse() -> Self {
        EvidenceCache::Sparse(HashMap::new())
    }

    /// Returns the cached log-evidence for `component`, computing and
    /// storing it on a miss.
    pub fn get_or_compute(&mut self, dataset: &Dataset, pow_q: &[f64], component: u128) -> f64 {
        match self {
            EvidenceCache::Dense(cache) => {
                let idx = (component - 1) as usize;
                let cached = cache[idx];
                if cached != 0.0 {
                    return cached;
                }
                let value = calc_evidence_icc(dataset, pow_q, component);
                debug_assert!(value != 0.0, "log-evidence must never be exactly zero");
                cache[idx] = value;
                value
            }
            EvidenceCache::Sparse(cache) => *cache.entry(component).or_insert_with(|| calc_evidence_icc(dataset, pow_q, component)),
        }
    }

    pub fn clear(&mut self) {
        match self {
            EvidenceCache::Dense(cache) => cache.iter_mut().for_each(|v| *v = 0.0),
            EvidenceCache::Sparse(cache) => cache.clear(),
        }
    }
}

/// Sum of ICC log-evidences over the non-empty components of `partition`.
pub fn calc_evidence(dataset: &Dataset, pow_q: &[f64], cache: &mut EvidenceCache, partition: &Partition) -> f64 {
    partition
        .iter()
        .filter(|&&component| component != 0)
        .map(|&component| cache.get_or_compute(dataset, pow_q, component))
        .sum()
}
