//! Ties a [`Dataset`] to the scalars and bookkeeping every search algorithm
//! shares: the `q^r` table used by [`crate::evidence::calc_evidence_icc`],
//! the evidence cache, and the running best-partition(s)/best-evidence
//! state that `search::*` accumulates into as it explores.
//!
//! One `Model` runs one search mode at a time. Each `run_*`/`apply_*` entry
//! point resets the cache and best-partition bookkeeping before it starts,
//! so state from a previous mode never leaks into the next (the gauge
//! transform is the exception: it mutates the dataset in place and is
//! expected to run once, before any search mode).

use crate::bitpack::Encoded;
use crate::dataset::Dataset;
use crate::evidence::{calc_evidence, EvidenceCache};
use crate::gauge::{find_best_basis, transform_data};
use crate::partition::Partition;

/// `table[r] = q^r` as `f64`, for `r` in `0..=n`. `calc_evidence_icc` only
/// ever indexes this below `LARGE_COMPONENT_THRESHOLD`; entries beyond that
/// may overflow to infinity for large `q`/`n` and are simply never read.
pub fn pow_q_table(q: u32, n: usize) -> Vec<f64> {
    let mut table = Vec::with_capacity(n + 1);
    let mut element = 1.0f64;
    for _ in 0..=n {
        table.push(element);
        element *= q as f64;
    }
    table
}

/// Shared state for a single run of one search algorithm against one
/// dataset: the dataset itself (gauge-transformable in place), the
/// evidence memoization cache, and the best-partition(s)/best-evidence
/// bookkeeping every search mode accumulates into.
pub struct Model {
    dataset: Dataset,
    pow_q: Vec<f64>,
    cache: EvidenceCache,
    best_mcm: Vec<Partition>,
    best_evidence: f64,
    best_basis: Option<Vec<Encoded>>,
    store_all_evidence: bool,
    all_evidence: Vec<f64>,
}

impl Model {
    pub fn new(dataset: Dataset) -> Self {
        let pow_q = pow_q_table(dataset.q(), dataset.n());
        Model {
            dataset,
            pow_q,
            cache: EvidenceCache::new_sparse(),
            best_mcm: Vec::new(),
            best_evidence: f64::NEG_INFINITY,
            best_basis: None,
            store_all_evidence: false,
            all_evidence: Vec::new(),
        }
    }

    /// When set, every candidate partition's log-evidence is retained (in
    /// exploration order) rather than only the running best. Exhaustive
    /// search only; meant for offline inspection of the evidence
    /// landscape, not for any decision the search makes itself.
    pub fn set_store_all_evidence(&mut self, store: bool) {
        self.store_all_evidence = store;
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn pow_q(&self) -> &[f64] {
        &self.pow_q
    }

    pub fn best_mcm(&self) -> &[Partition] {
        &self.best_mcm
    }

    pub fn best_evidence(&self) -> f64 {
        self.best_evidence
    }

    pub fn best_basis(&self) -> Option<&[Encoded]> {
        self.best_basis.as_deref()
    }

    pub fn all_evidence(&self) -> &[f64] {
        &self.all_evidence
    }

    pub fn store_all_evidence(&self) -> bool {
        self.store_all_evidence
    }

    /// Clears best-partition bookkeeping and installs a fresh cache ahead
    /// of a search run. `dense` selects the `2^n-1`-entry array used by
    /// exhaustive search over the hash map the other two modes use.
    pub(crate) fn reset_for_search(&mut self, dense: bool) {
        self.best_mcm.clear();
        self.best_evidence = f64::NEG_INFINITY;
        self.all_evidence.clear();
        self.cache = if dense {
            EvidenceCache::new_dense(self.dataset.n())
        } else {
            EvidenceCache::new_sparse()
        };
    }

    /// Folds one candidate partition into the running best: ties within
    /// `tolerance` of the current best are kept alongside it (the search
    /// reports every equi-optimal partition, not just the first found);
    /// a strictly better candidate replaces the set outright.
    pub(crate) fn record_candidate(&mut self, partition: &Partition, log_evidence: f64, tolerance: f64) {
        if (log_evidence - self.best_evidence).abs() < tolerance {
            self.best_mcm.push(partition.clone());
        } else if log_evidence > self.best_evidence {
            self.best_evidence = log_evidence;
            self.best_mcm.clear();
            self.best_mcm.push(partition.clone());
        }
        if self.store_all_evidence {
            self.all_evidence.push(log_evidence);
        }
    }

    pub(crate) fn replace_best(&mut self, partition: Partition, log_evidence: f64) {
        self.best_evidence = log_evidence;
        self.best_mcm.clear();
        self.best_mcm.push(partition);
    }

    /// Seeds `best_mcm` with a single starting partition, ahead of a search
    /// (divide-and-conquer) that mutates it in place as it commits splits,
    /// rather than only replacing it wholesale at the end.
    pub(crate) fn seed_best_mcm(&mut self, partition: Partition) {
        self.best_mcm.clear();
        self.best_mcm.push(partition);
    }

    /// Mutable access to the single seeded partition divide-and-conquer
    /// updates in place as it commits each improving split.
    pub(crate) fn best_mcm_mut(&mut self) -> &mut Partition {
        self.best_mcm.get_mut(0).expect("seed_best_mcm must be called before best_mcm_mut")
    }

    /// Runs exhaustive search with the default tolerance and dense-cache
    /// limit. See [`crate::search::exhaustive::run_with`] to override either.
    pub fn run_exhaustive(&mut self) -> crate::error::Result<()> {
        crate::search::exhaustive::run(self)
    }

    /// Runs greedy pairwise-merge search, optionally tracing accepted
    /// merges to `log`.
    pub fn run_greedy(&mut self, log: Option<&mut dyn std::io::Write>) -> std::io::Result<()> {
        crate::search::greedy::run(self, log)
    }

    /// Runs divide-and-conquer search, optionally tracing sweeps and
    /// accepted splits to `log`.
    pub fn run_divide_and_conquer(&mut self, log: Option<&mut dyn std::io::Write>) -> std::io::Result<()> {
        crate::search::divide_and_conquer::run(self, log)
    }

    /// Finds the `n` (or fewer) lowest-entropy independent operators and
    /// rebases the dataset onto them, in place. Idempotent only in the
    /// sense that running it twice rebases an already-rebased dataset;
    /// callers run it at most once per `Model`.
    pub fn apply_gauge_transform(&mut self, max_order: Option<usize>) {
        let basis = find_best_basis(&self.dataset, max_order);
        transform_data(&mut self.dataset, &basis);
        self.best_basis = Some(basis);
    }

    /// Log-evidence of `partition`, memoized through this model's cache.
    pub fn evidence(&mut self, partition: &Partition) -> f64 {
        calc_evidence(&self.dataset, &self.pow_q, &mut self.cache, partition)
    }

    /// Log-evidence of a single ICC, memoized through this model's cache.
    pub fn evidence_icc(&mut self, component: u128) -> f64 {
        self.cache.get_or_compute(&self.dataset, &self.pow_q, component)
    }
}
