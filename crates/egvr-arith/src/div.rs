//! Long division.
//!
//! Knuth Algorithm D over 32-bit limbs. The trial quotient for each step is
//! the exact 3-by-2 quotient of the top three dividend limbs by the top two
//! (normalized) divisor limbs, computed with a precomputed Möller–Granlund
//! reciprocal; against the full divisor it overshoots by at most one, fixed
//! by a single add-back. A [`PreparedDivisor`] caches the normalized
//! divisor, its shift, and the reciprocal so repeated reductions by one
//! modulus (as in exponentiation) skip the setup.

use crate::natural::LIMB_BITS;
use crate::{ArithError, Natural};

/// A divisor with its division precomputation.
#[derive(Clone, Debug)]
pub struct PreparedDivisor {
    divisor: Natural,
    /// `divisor << shift`, top limb's high bit set.
    normalized: Vec<u32>,
    /// Bits shifted to normalize.
    shift: u32,
    /// Möller–Granlund 3-by-2 reciprocal of the top two normalized limbs;
    /// unused (zero) for single-limb divisors.
    reciprocal: u32,
}

impl PreparedDivisor {
    /// Prepares `divisor` for repeated division. Fails on zero.
    pub fn new(divisor: &Natural) -> Result<Self, ArithError> {
        let limbs = divisor.limbs();
        let top = *limbs.last().ok_or(ArithError::DivisionByZero)?;
        let shift = top.leading_zeros();
        let normalized = divisor.shl(shift as usize).limbs().to_vec();
        debug_assert_eq!(normalized.len(), limbs.len());
        let reciprocal = match normalized.len() {
            1 => 0,
            n => reciprocal_3by2(normalized[n - 1], normalized[n - 2]),
        };
        Ok(Self {
            divisor: divisor.clone(),
            normalized,
            shift,
            reciprocal,
        })
    }

    /// The divisor this precomputation belongs to.
    #[must_use]
    pub fn divisor(&self) -> &Natural {
        &self.divisor
    }

    /// Quotient and remainder of `dividend / divisor`.
    #[must_use]
    pub fn div_rem(&self, dividend: &Natural) -> (Natural, Natural) {
        if dividend < &self.divisor {
            return (Natural::zero(), dividend.clone());
        }
        if let [d] = self.normalized[..] {
            // Single-limb divisor: normalization shift cancels out.
            let (q, r) = dividend.div_rem_limb(d >> self.shift);
            return (q, Natural::from(r));
        }
        let n = self.normalized.len();
        let mut un = dividend.shl(self.shift as usize).limbs().to_vec();
        let m = un.len() - n;
        un.push(0);
        let mut quotient = vec![0u32; m + 1];
        for j in (0..=m).rev() {
            quotient[j] = self.divide_step(&mut un, j, n);
        }
        let remainder = Natural::from_limbs(un[..n].to_vec()).shr(self.shift as usize);
        (Natural::from_limbs(quotient), remainder)
    }

    /// Remainder of `dividend mod divisor`.
    #[must_use]
    pub fn rem(&self, dividend: &Natural) -> Natural {
        self.div_rem(dividend).1
    }

    /// One Algorithm-D step: estimates the quotient limb for window `j`,
    /// subtracts `qhat · divisor`, and corrects an overshoot.
    fn divide_step(&self, un: &mut [u32], j: usize, n: usize) -> u32 {
        let dn = &self.normalized;
        let (d1, d0) = (dn[n - 1], dn[n - 2]);
        let (u2, u1, u0) = (un[j + n], un[j + n - 1], un[j + n - 2]);

        let top = (u64::from(u2) << LIMB_BITS) | u64::from(u1);
        let d_top = (u64::from(d1) << LIMB_BITS) | u64::from(d0);
        let mut qhat = if top >= d_top {
            // Window invariant gives top == d_top at most; the true
            // quotient limb is then β-1 or β-2, reached via add-back.
            u32::MAX
        } else {
            udiv_qr_3by2(u2, u1, u0, d1, d0, self.reciprocal).0
        };

        // Multiply-subtract qhat·divisor from the (n+1)-limb window.
        let mut carry = 0u64;
        let mut borrow = 0i64;
        for i in 0..=n {
            let digit = if i < n { u64::from(dn[i]) } else { 0 };
            let product = u64::from(qhat) * digit + carry;
            carry = product >> LIMB_BITS;
            let diff = i64::from(un[j + i]) - i64::from(product as u32) - borrow;
            if diff < 0 {
                un[j + i] = (diff + (1i64 << LIMB_BITS)) as u32;
                borrow = 1;
            } else {
                un[j + i] = diff as u32;
                borrow = 0;
            }
        }

        if borrow != 0 {
            // Estimate was one too large: add the divisor back once.
            qhat -= 1;
            let mut carry = 0u64;
            for i in 0..n {
                let sum = u64::from(un[j + i]) + u64::from(dn[i]) + carry;
                un[j + i] = sum as u32;
                carry = sum >> LIMB_BITS;
            }
            un[j + n] = un[j + n].wrapping_add(carry as u32);
        }
        qhat
    }
}

impl Natural {
    /// Quotient and remainder; division by zero is an error.
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self), ArithError> {
        Ok(PreparedDivisor::new(divisor)?.div_rem(self))
    }

    /// Remainder of `self mod divisor`.
    pub fn rem(&self, divisor: &Self) -> Result<Self, ArithError> {
        Ok(self.div_rem(divisor)?.1)
    }
}

/// `⌊(β³ − 1) / (d1·β + d0)⌋ − β` for a normalized `d1` (high bit set).
/// Always fits one limb.
fn reciprocal_3by2(d1: u32, d0: u32) -> u32 {
    debug_assert!(d1 >> (LIMB_BITS - 1) == 1);
    let d = (u128::from(d1) << LIMB_BITS) | u128::from(d0);
    let numerator = (1u128 << 96) - 1;
    (numerator / d - (1u128 << LIMB_BITS)) as u32
}

/// Exact 3-by-2 division ⟨u2,u1,u0⟩ / ⟨d1,d0⟩ given the reciprocal `v`;
/// requires ⟨u2,u1⟩ < ⟨d1,d0⟩. Returns the one-limb quotient and the
/// two-limb remainder. Möller–Granlund, Algorithm 2.
fn udiv_qr_3by2(u2: u32, u1: u32, u0: u32, d1: u32, d0: u32, v: u32) -> (u32, u64) {
    let q = u64::from(v)
        .wrapping_mul(u64::from(u2))
        .wrapping_add((u64::from(u2) << LIMB_BITS) | u64::from(u1));
    let q1 = (q >> LIMB_BITS) as u32;
    let q0 = q as u32;

    let r1 = u1.wrapping_sub(q1.wrapping_mul(d1));
    let d = (u64::from(d1) << LIMB_BITS) | u64::from(d0);
    let t = u64::from(q1) * u64::from(d0);
    let mut r = ((u64::from(r1) << LIMB_BITS) | u64::from(u0))
        .wrapping_sub(t)
        .wrapping_sub(d);

    let mut q1 = q1.wrapping_add(1);
    if (r >> LIMB_BITS) as u32 >= q0 {
        q1 = q1.wrapping_sub(1);
        r = r.wrapping_add(d);
    }
    if r >= d {
        q1 = q1.wrapping_add(1);
        r -= d;
    }
    (q1, r)
}
