//! Recursive split-based divide-and-conquer search, starting from the
//! complete partition (one component holding every variable) and
//! repeatedly bipartitioning wherever that strictly improves evidence.

use std::io::{self, Write};

use crate::model::Model;
use crate::partition::{component_size, write_partition, Partition};

/// Runs divide-and-conquer search against `model`: starts from the complete
/// partition and recursively splits components wherever that strictly
/// improves log-evidence. Reports the single resulting partition.
pub fn run(model: &mut Model, mut log: Option<&mut dyn Write>) -> io::Result<()> {
    model.reset_for_search(false);
    let n = model.dataset().n();

    let mut complete: Partition = vec![0u128; n];
    if n > 0 {
        complete[0] = all_variables(n);
    }
    model.seed_best_mcm(complete);

    if let Some(w) = log.as_deref_mut() {
        writeln!(w, "Start divide and conquer procedure")?;
    }

    division(model, 0, 1, log.as_deref_mut())?;

    let best = model.best_mcm()[0].clone();
    let log_evidence = model.evidence(&best);
    model.replace_best(best, log_evidence);
    Ok(())
}

fn all_variables(n: usize) -> u128 {
    if n >= 128 {
        u128::MAX
    } else {
        (1u128 << n) - 1
    }
}

/// Recursive division step: tries to split `partition[move_from]` into
/// itself and `partition[move_to]`, committing whichever split size (from
/// one member up to all-but-one) most improves evidence over leaving the
/// component unsplit, then recurses into both halves. Returns the index of
/// the first still-empty component slot.
fn division(model: &mut Model, move_from: usize, move_to: usize, mut log: Option<&mut dyn Write>) -> io::Result<usize> {
    let original_size = component_size(model.best_mcm()[0][move_from]) as usize;
    if original_size <= 1 {
        return Ok(move_to);
    }

    let mut partition = model.best_mcm()[0].clone();
    let mut best_evidence_diff = 0.0f64;
    let evidence_unsplit = model.evidence_icc(partition[move_from]);

    // The sweep that would move all-but-one member is the mirror image of
    // the first sweep (moving one member), so it is skipped for components
    // with more than two members. The inner loop below is bounded by the
    // live member count rather than this counter, so a two-member
    // component still gets its one sweep instead of being skipped outright.
    let mut sweeps_remaining = original_size;
    if original_size > 2 {
        sweeps_remaining -= 1;
    }

    while sweeps_remaining > 1 {
        let mut best_diff_this_sweep = f64::NEG_INFINITY;
        let mut component_1 = partition[move_from];
        let mut component_2 = partition[move_to];
        let member_count = component_size(component_1) as usize;

        if let Some(w) = log.as_deref_mut() {
            writeln!(w, "\nStart moving variables from component {move_from} to component {move_to}")?;
            write_partition(w, &partition)?;
        }

        for ordinal in 1..=member_count {
            let member = nth_member(component_1, ordinal);
            component_1 &= !member;
            component_2 |= member;

            let diff = model.evidence_icc(component_1) + model.evidence_icc(component_2) - evidence_unsplit;
            if diff > best_diff_this_sweep {
                best_diff_this_sweep = diff;
                partition[move_from] = component_1;
                partition[move_to] = component_2;

                if let Some(w) = log.as_deref_mut() {
                    writeln!(
                        w,
                        "\nBest intermediate split: moving variable {} from component {move_from} to component {move_to} Evidence difference: {best_diff_this_sweep}",
                        member.trailing_zeros()
                    )?;
                    write_partition(w, &partition)?;
                }
            }

            component_1 |= member;
            component_2 &= !member;
        }

        if best_diff_this_sweep > best_evidence_diff {
            best_evidence_diff = best_diff_this_sweep;
            let (from_val, to_val) = (partition[move_from], partition[move_to]);
            model.best_mcm_mut()[move_from] = from_val;
            model.best_mcm_mut()[move_to] = to_val;

            if let Some(w) = log.as_deref_mut() {
                writeln!(w, "\nNew best split")?;
                write_partition(w, &partition)?;
            }
        }

        sweeps_remaining -= 1;
    }

    if model.best_mcm()[0][move_to] == 0 {
        return Ok(move_to);
    }

    let first_empty = division(model, move_from, move_to + 1, log.as_deref_mut())?;
    let first_empty = division(model, move_to, first_empty, log.as_deref_mut())?;
    Ok(first_empty)
}

/// The `ordinal`-th set bit of `component` (1-indexed), as a single-bit mask.
fn nth_member(component: u128, ordinal: usize) -> u128 {
    let mut counter = 0usize;
    for bit in 0..128 {
        if (component >> bit) & 1 == 1 {
            counter += 1;
            if counter == ordinal {
                return 1u128 << bit;
            }
        }
    }
    0
}
