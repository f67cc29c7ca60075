//! Multiplication and squaring.
//!
//! Schoolbook multiplication below [`KARATSUBA_CUTOFF`] limbs, Karatsuba
//! above it. Squaring uses a column scan that computes each off-diagonal
//! product once.

use crate::Natural;
use crate::natural::LIMB_BITS;

/// Operand size, in limbs, at which Karatsuba overtakes schoolbook.
const KARATSUBA_CUTOFF: usize = 24;

impl Natural {
    /// Product of `self` and `other`.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Self::from_limbs(mul_limbs(self.limbs(), other.limbs()))
    }

    /// Square of `self`.
    #[must_use]
    pub fn sqr(&self) -> Self {
        Self::from_limbs(sqr_limbs(self.limbs()))
    }
}

fn mul_limbs(a: &[u32], b: &[u32]) -> Vec<u32> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    if a.len().min(b.len()) >= KARATSUBA_CUTOFF {
        karatsuba(a, b)
    } else {
        schoolbook(a, b)
    }
}

fn schoolbook(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = vec![0u32; a.len() + b.len()];
    for (i, &ai) in a.iter().enumerate() {
        let mut carry = 0u64;
        for (j, &bj) in b.iter().enumerate() {
            let t = u64::from(out[i + j]) + u64::from(ai) * u64::from(bj) + carry;
            out[i + j] = t as u32;
            carry = t >> LIMB_BITS;
        }
        out[i + b.len()] = carry as u32;
    }
    out
}

/// Karatsuba split: `a·b = z2·β^(2m) + z1·β^m + z0` with
/// `z1 = (a_lo + a_hi)(b_lo + b_hi) − z0 − z2`.
fn karatsuba(a: &[u32], b: &[u32]) -> Vec<u32> {
    let m = a.len().max(b.len()) / 2;
    let (a_lo, a_hi) = split(a, m);
    let (b_lo, b_hi) = split(b, m);

    let z0 = mul_limbs(a_lo, b_lo);
    let z2 = mul_limbs(a_hi, b_hi);
    let cross = mul_limbs(&add_limbs(a_lo, a_hi), &add_limbs(b_lo, b_hi));
    let mut z1 = sub_limbs(&cross, &z0);
    z1 = sub_limbs(&z1, &z2);

    let mut out = vec![0u32; a.len() + b.len()];
    add_into(&mut out, &z0, 0);
    add_into(&mut out, &z1, m);
    add_into(&mut out, &z2, 2 * m);
    out
}

fn split(limbs: &[u32], at: usize) -> (&[u32], &[u32]) {
    if limbs.len() <= at {
        (limbs, &[])
    } else {
        limbs.split_at(at)
    }
}

fn add_limbs(a: &[u32], b: &[u32]) -> Vec<u32> {
    let (longer, shorter) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = Vec::with_capacity(longer.len() + 1);
    let mut carry = 0u64;
    for (i, &limb) in longer.iter().enumerate() {
        let sum = u64::from(limb) + u64::from(shorter.get(i).copied().unwrap_or(0)) + carry;
        out.push(sum as u32);
        carry = sum >> LIMB_BITS;
    }
    if carry != 0 {
        out.push(carry as u32);
    }
    out
}

/// `a − b` on limb vectors; requires `a ≥ b`, which holds for the
/// Karatsuba middle term.
fn sub_limbs(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len());
    let mut borrow = 0u64;
    for (i, &limb) in a.iter().enumerate() {
        let rhs = u64::from(b.get(i).copied().unwrap_or(0)) + borrow;
        let lhs = u64::from(limb);
        if lhs >= rhs {
            out.push((lhs - rhs) as u32);
            borrow = 0;
        } else {
            out.push(((1u64 << LIMB_BITS) + lhs - rhs) as u32);
            borrow = 1;
        }
    }
    debug_assert_eq!(borrow, 0);
    while out.last() == Some(&0) {
        out.pop();
    }
    out
}

/// Adds `addend` into `acc` starting at limb `offset`; `acc` is sized to
/// hold the full product, so the final carry is always absorbed.
fn add_into(acc: &mut [u32], addend: &[u32], offset: usize) {
    let mut carry = 0u64;
    let mut i = offset;
    for &limb in addend {
        let sum = u64::from(acc[i]) + u64::from(limb) + carry;
        acc[i] = sum as u32;
        carry = sum >> LIMB_BITS;
        i += 1;
    }
    while carry != 0 {
        let sum = u64::from(acc[i]) + carry;
        acc[i] = sum as u32;
        carry = sum >> LIMB_BITS;
        i += 1;
    }
}

/// Column-scan squaring: column `k` accumulates `2·a_i·a_j` for `i < j`,
/// plus the diagonal `a_i²` when `k` is even. The u128 accumulator has
/// headroom for the largest operands the verifier sees (4096-bit moduli).
fn sqr_limbs(a: &[u32]) -> Vec<u32> {
    if a.is_empty() {
        return Vec::new();
    }
    let n = a.len();
    let mut out = vec![0u32; 2 * n];
    let mut acc: u128 = 0;
    for k in 0..2 * n - 1 {
        let lo = k.saturating_sub(n - 1);
        let hi = k / 2;
        for i in lo..=hi {
            let j = k - i;
            let prod = u128::from(a[i]) * u128::from(a[j]);
            if i == j {
                acc += prod;
            } else {
                acc += prod * 2;
            }
        }
        out[k] = acc as u32;
        acc >>= LIMB_BITS;
    }
    out[2 * n - 1] = acc as u32;
    out
}
