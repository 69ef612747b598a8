//! Bit-plane codec for categorical value vectors.
//!
//! A vector of `m` values in `[0, q)` is packed into `k = ceil(log2(q))`
//! parallel bit planes, each `u128`-wide (the system caps `n` at 128, so a
//! single `u128` always has room for one bit per variable). Bit `b` of
//! plane `k` holds the `b`-th binary digit of value `k`'s entry.

/// A value vector packed into `k` bit planes, one bit per entry per plane.
///
/// Used both for observations/states (entries are variable values in
/// `[0, q)`) and for operators (entries are coefficients in `[0, q)`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Encoded {
    planes: Vec<u128>,
}

impl Encoded {
    /// Packs `values` (each expected to be `< 2^k`) into `k` bit planes.
    pub fn from_values(values: &[u32], k: usize) -> Self {
        let mut planes = vec![0u128; k];
        for (i, &value) in values.iter().enumerate() {
            let mut v = value;
            let mut bit = 0;
            while v != 0 {
                if v & 1 != 0 {
                    planes[bit] |= 1u128 << i;
                }
                bit += 1;
                v >>= 1;
            }
        }
        Encoded { planes }
    }

    /// Unpacks back into a length-`m` vector of values in `[0, 2^k)`.
    pub fn to_values(&self, m: usize) -> Vec<u32> {
        let mut values = vec![0u32; m];
        for (bit, &plane) in self.planes.iter().enumerate() {
            for i in 0..m {
                if (plane >> i) & 1 == 1 {
                    values[i] |= 1 << bit;
                }
            }
        }
        values
    }

    /// Number of bit planes (`k`).
    pub fn num_planes(&self) -> usize {
        self.planes.len()
    }

    pub fn planes(&self) -> &[u128] {
        &self.planes
    }

    /// Projects this encoded vector onto `component`, zeroing every bit
    /// outside it, plane by plane. Used to extract the sub-state of an
    /// observation that belongs to a given ICC.
    pub fn project(&self, component: u128) -> Vec<u128> {
        self.planes.iter().map(|&plane| plane & component).collect()
    }
}

/// Number of bit planes needed to represent an alphabet of size `q`.
pub fn planes_for_alphabet(q: u32) -> usize {
    debug_assert!(q >= 2);
    let mut k = 0;
    let mut cap = 1u64;
    while cap < q as u64 {
        cap <<= 1;
        k += 1;
    }
    k.max(1)
}
