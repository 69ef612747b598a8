//! Gauge transform: find the `n` lowest-entropy independent operators and
//! rebase the dataset onto them.

use crate::bitpack::{planes_for_alphabet, Encoded};
use crate::dataset::Dataset;
use crate::spin::{entropy_of_op, spin_value};

fn gcd(a: u32, b: u32) -> u32 {
    if a == 0 {
        b
    } else {
        gcd(b % a, a)
    }
}

/// An operator prior to ranking: its raw coefficient vector (values in
/// `[0, q)`, one per variable) plus its entropy on the dataset.
struct RankedOp {
    coeffs: Vec<u32>,
    entropy: f64,
}

/// Enumerates every valid, non-conjugate operator over `[0, q)^n`
/// (excluding all-zero), optionally restricted to support size `<= max_order`,
/// ranked by ascending entropy on `dataset`.
///
/// An operator is valid iff at least one coefficient is coprime with `q`
/// (otherwise every coefficient shares a factor with `q` and the induced
/// variable takes fewer than `q` distinct values). Of each conjugate pair
/// `{a, q-a}` (same induced variable up to relabeling), only the one whose
/// leading nonzero coefficient is `<= q/2` is retained.
fn sorted_operators(dataset: &Dataset, q: u32, n: usize, max_order: Option<usize>) -> Vec<RankedOp> {
    let max_order = max_order.unwrap_or(n);
    let mut a = vec![0u32; n];
    let mut order: i64 = 0;
    let mut ranked = Vec::new();

    loop {
        // Increment the coefficient vector like an odometer, base q,
        // tracking the interaction order (number of nonzero entries) as we
        // go so we never have to recount it from scratch.
        a[0] += 1;
        let mut all_generated = false;
        for j in 0..n {
            if a[j] == q {
                if j == n - 1 {
                    all_generated = true;
                    break;
                }
                a[j + 1] += 1;
                a[j] = 0;
                order -= 1;
            } else {
                if a[j] == 1 {
                    order += 1;
                }
                break;
            }
        }
        if all_generated {
            break;
        }

        if order > max_order as i64 {
            continue;
        }

        let mut valid = false;
        let mut leading = 0u32;
        for &coeff in &a {
            if coeff != 0 {
                leading = coeff;
                if gcd(coeff, q) == 1 {
                    valid = true;
                    break;
                }
            }
        }
        if !valid {
            continue;
        }
        if leading > q - leading {
            continue;
        }

        let k = planes_for_alphabet(q);
        let op = Encoded::from_values(&a, k);
        let entropy = entropy_of_op(dataset.observations(), &op, q);
        ranked.push(RankedOp { coeffs: a.clone(), entropy });
    }

    ranked.sort_by(|x, y| x.entropy.partial_cmp(&y.entropy).expect("entropy is never NaN"));
    ranked
}

/// Finds the `n` lowest-entropy independent operators via modular Gaussian
/// elimination. May return fewer than `n` operators if the candidate pool
/// doesn't span the full space.
pub fn find_best_basis(dataset: &Dataset, max_order: Option<usize>) -> Vec<Encoded> {
    let n = dataset.n();
    let q = dataset.q();
    let k = dataset.k();

    let ranked = sorted_operators(dataset, q, n, max_order);
    let n_ops = ranked.len();
    // matrix[row][col], row = variable index, col = operator index (by
    // ascending entropy).
    let mut matrix: Vec<Vec<u32>> = (0..n).map(|row| ranked.iter().map(|op| op.coeffs[row]).collect()).collect();

    let mut basis = Vec::with_capacity(n);
    let mut col = 0usize;

    for i in 0..n {
        let mut row;
        let pivot_value;
        loop {
            if col == n_ops {
                return basis;
            }
            row = i;
            while matrix[row][col] == 0 {
                row += 1;
                if row == n {
                    row = i;
                    col += 1;
                    if col == n_ops {
                        return basis;
                    }
                }
            }
            let value = gcd(matrix[row][col], q);
            if value == 1 {
                pivot_value = matrix[row][col];
                break;
            }
            // q is composite and this entry shares a factor with it:
            // scaling the whole column by q/value zeroes every row whose
            // entry was a multiple of that shared factor.
            let scale = q / value;
            for r in 0..n {
                matrix[r][col] = (matrix[r][col] * scale) % q;
            }
        }

        if row != i {
            matrix.swap(row, i);
        }
        for j in (i + 1)..n {
            let mut value = matrix[j][col];
            let mut factor = 0u32;
            while value % q != 0 {
                value += pivot_value;
                factor += 1;
            }
            if factor != 0 {
                for c in col..n_ops {
                    matrix[j][c] = (matrix[j][c] + factor * matrix[i][c]) % q;
                }
            }
        }

        basis.push(Encoded::from_values(&ranked[col].coeffs, k));
        col += 1;
    }

    basis
}

/// Gauge-transforms a single encoded state under `basis`: the `i`-th entry
/// of the new state is `spin_value(state, basis[i], q)`.
pub fn gt_state(state: &Encoded, basis: &[Encoded], q: u32, k: usize) -> Encoded {
    let new_values: Vec<u32> = basis.iter().map(|op| spin_value(state, op, q)).collect();
    Encoded::from_values(&new_values, k)
}

/// Rebases the entire dataset onto `basis`, in place.
pub fn transform_data(dataset: &mut Dataset, basis: &[Encoded]) {
    let q = dataset.q();
    let k = dataset.k();
    let transformed: Vec<Encoded> = dataset.observations().iter().map(|obs| gt_state(obs, basis, q, k)).collect();
    dataset.set_observations(transformed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gt_state_reproduces_q3_truth_table() {
        let q = 3;
        let k = planes_for_alphabet(q);
        let op1 = Encoded::from_values(&[1, 1], k);
        let op2 = Encoded::from_values(&[2, 1], k);
        let basis = vec![op1, op2];

        let cases: &[([u32; 2], [u32; 2])] = &[
            ([0, 0], [0, 0]),
            ([0, 1], [1, 1]),
            ([0, 2], [2, 2]),
            ([1, 0], [1, 2]),
            ([1, 1], [2, 0]),
            ([1, 2], [0, 1]),
            ([2, 0], [2, 1]),
            ([2, 1], [0, 2]),
            ([2, 2], [1, 0]),
        ];
        for &(state_vals, expected) in cases {
            let state = Encoded::from_values(&state_vals, k);
            let new_state = gt_state(&state, &basis, q, k);
            assert_eq!(new_state.to_values(2), expected, "state {state_vals:?}");
        }
    }

    #[test]
    fn transform_data_applies_gt_state_to_every_observation() {
        let q = 3;
        let k = planes_for_alphabet(q);
        let op1 = Encoded::from_values(&[1, 1], k);
        let op2 = Encoded::from_values(&[2, 1], k);
        let basis = vec![op1, op2];

        let rows = vec![vec![0, 0], vec![0, 1], vec![1, 1], vec![2, 2]];
        let mut ds = Dataset::from_rows(&rows, 2, q).unwrap();
        transform_data(&mut ds, &basis);

        let expected = [[0, 0], [1, 1], [2, 0], [1, 0]];
        for (obs, exp) in ds.observations().iter().zip(expected.iter()) {
            assert_eq!(obs.to_values(2), exp.to_vec());
        }
    }

    #[test]
    fn find_best_basis_returns_n_independent_operators_for_q2() {
        // q=2: every nonzero operator is automatically valid (gcd(1,2)=1).
        let rows = vec![vec![0, 0, 0], vec![1, 0, 1], vec![0, 1, 1], vec![1, 1, 0]];
        let ds = Dataset::from_rows(&rows, 3, 2).unwrap();
        let basis = find_best_basis(&ds, None);
        assert_eq!(basis.len(), 3);
    }
}
