//! Greedy pairwise-merge agglomeration, starting from the independent
//! partition (n singleton components).

use std::io::{self, Write};

use crate::model::Model;
use crate::partition::{write_partition, Partition};

/// Runs greedy search against `model`: starting from `n` singletons,
/// repeatedly merges whichever pair of non-empty components increases
/// log-evidence the most, stopping once no merge strictly improves it.
/// Ties among merges are broken by first-found in ascending `(i, j)` order
/// (the comparison below is a strict `>`, so an equal-or-worse later
/// candidate never displaces an earlier one), for deterministic results.
///
/// When `log` is `Some`, each accepted merge is appended to it: a banner
/// line, then the partition.
pub fn run(model: &mut Model, mut log: Option<&mut dyn Write>) -> io::Result<()> {
    model.reset_for_search(false);
    let n = model.dataset().n();
    let mut partition: Partition = (0..n).map(|i| 1u128 << i).collect();

    if let Some(w) = log.as_deref_mut() {
        writeln!(w, "Start greedy merging procedure\n")?;
        write_partition(w, &partition)?;
    }

    loop {
        let mut best_diff = 0.0f64;
        let mut best_pair = None;

        for i in 0..n {
            if partition[i] == 0 {
                continue;
            }
            let evidence_i = model.evidence_icc(partition[i]);
            for j in (i + 1)..n {
                if partition[j] == 0 {
                    continue;
                }
                let evidence_j = model.evidence_icc(partition[j]);
                let merged = model.evidence_icc(partition[i] | partition[j]);
                let diff = merged - evidence_i - evidence_j;
                if diff > best_diff {
                    best_diff = diff;
                    best_pair = Some((i, j));
                }
            }
        }

        let Some((i, j)) = best_pair else {
            break;
        };
        partition[i] |= partition[j];
        partition[j] = 0;

        if let Some(w) = log.as_deref_mut() {
            writeln!(w, "\nMerging components {i} and {j} Evidence difference: {best_diff}")?;
            write_partition(w, &partition)?;
        }
    }

    let log_evidence = model.evidence(&partition);
    model.replace_best(partition, log_evidence);
    Ok(())
}
