//! Generalized-Potts spin operators over encoded states.

use crate::bitpack::Encoded;

/// `s = sum_j alpha_j * mu_j mod q`, computed planewise via population
/// counts rather than per-variable loops: for each pair of planes
/// `(b1, b2)`, `2^(b1+b2) * popcount(op[b1] & state[b2])` contributes the
/// cross term between bit `b1` of every operator coefficient and bit `b2`
/// of every state value.
pub fn spin_value(state: &Encoded, op: &Encoded, q: u32) -> u32 {
    debug_assert_eq!(state.num_planes(), op.num_planes());
    let mut spin: u64 = 0;
    for (b1, &op_plane) in op.planes().iter().enumerate() {
        for (b2, &state_plane) in state.planes().iter().enumerate() {
            let weight = 1u64 << (b1 + b2);
            spin += weight * (op_plane & state_plane).count_ones() as u64;
        }
    }
    (spin % q as u64) as u32
}

/// Shannon entropy (base 2) of a discrete probability distribution.
/// Entries equal to zero are treated as `0 * log2(0) = 0`.
pub fn entropy(prob_distr: &[f64]) -> f64 {
    let mut h = 0.0;
    for &p in prob_distr {
        if p > 0.0 {
            h -= p * libm::log2(p);
        }
    }
    h
}

/// Entropy, over the dataset, of the spin value induced by `op`. Always in
/// `[0, log2(q)]`.
pub fn entropy_of_op(data: &[Encoded], op: &Encoded, q: u32) -> f64 {
    let mut counts = vec![0.0f64; q as usize];
    for obs in data {
        let s = spin_value(obs, op, q);
        counts[s as usize] += 1.0;
    }
    let n = data.len() as f64;
    for c in &mut counts {
        *c /= n;
    }
    entropy(&counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc(values: &[u32], k: usize) -> Encoded {
        Encoded::from_values(values, k)
    }

    #[test]
    fn spin_value_reproduces_q3_truth_table() {
        // op1 = (1,1), op2 = (2,1) over q=3, n=2
        let op1 = enc(&[1, 1], 2);
        let op2 = enc(&[2, 1], 2);

        let cases: &[([u32; 2], u32, u32)] = &[
            ([0, 0], 0, 0),
            ([0, 1], 1, 1),
            ([0, 2], 2, 2),
            ([1, 0], 1, 2),
            ([1, 1], 2, 0),
            ([1, 2], 0, 1),
            ([2, 0], 2, 1),
            ([2, 1], 0, 2),
            ([2, 2], 1, 0),
        ];
        for &(state_vals, exp1, exp2) in cases {
            let state = enc(&state_vals, 2);
            assert_eq!(spin_value(&state, &op1, 3), exp1, "op1 on {state_vals:?}");
            assert_eq!(spin_value(&state, &op2, 3), exp2, "op2 on {state_vals:?}");
        }
    }

    #[test]
    fn spin_value_is_linear_mod_q() {
        let q = 3u32;
        let op1 = enc(&[1, 2, 0], 2);
        let op2 = enc(&[2, 1, 1], 2);
        let sum_values: Vec<u32> = (0..3).map(|i| (op1.to_values(3)[i] + op2.to_values(3)[i]) % q).collect();
        let op_sum = enc(&sum_values, 2);

        let state = enc(&[1, 0, 2], 2);
        let lhs = spin_value(&state, &op_sum, q);
        let rhs = (spin_value(&state, &op1, q) + spin_value(&state, &op2, q)) % q;
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn entropy_of_op_is_bounded() {
        let data: Vec<Encoded> = vec![
            enc(&[0, 1, 0], 2),
            enc(&[1, 0, 0], 2),
            enc(&[0, 1, 1], 2),
            enc(&[0, 1, 2], 2),
            enc(&[0, 0, 1], 2),
            enc(&[1, 0, 0], 2),
            enc(&[0, 0, 1], 2),
        ];
        let op = enc(&[1, 0, 0], 2);
        let h = entropy_of_op(&data, &op, 3);
        assert!(h >= 0.0 && h <= (3f64).log2() + 1e-9);
    }

    #[test]
    fn entropy_of_degenerate_op_is_zero() {
        let data: Vec<Encoded> = vec![enc(&[0, 0], 2), enc(&[0, 1], 2), enc(&[0, 2], 2)];
        // op = (0, 0) has a constant (zero) spin value everywhere.
        let op = enc(&[0, 0], 2);
        assert_eq!(entropy_of_op(&data, &op, 3), 0.0);
    }
}
