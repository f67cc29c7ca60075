//! Unsigned arbitrary-precision integers.
//!
//! A [`Natural`] stores its magnitude as 32-bit limbs, least significant
//! first, normalized so the most significant limb is nonzero; zero is the
//! empty limb sequence. All operations return normalized values.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::ArithError;

/// Number of bits per limb.
pub(crate) const LIMB_BITS: u32 = 32;

/// An arbitrary-precision non-negative integer.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Natural {
    /// Little-endian limbs, no most-significant zero limb.
    limbs: Vec<u32>,
}

impl Natural {
    /// The value zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self { limbs: Vec::new() }
    }

    /// The value one.
    #[must_use]
    pub fn one() -> Self {
        Self { limbs: vec![1] }
    }

    /// Builds a natural from little-endian limbs, dropping high zero limbs.
    pub(crate) fn from_limbs(mut limbs: Vec<u32>) -> Self {
        while limbs.last() == Some(&0) {
            limbs.pop();
        }
        Self { limbs }
    }

    /// The little-endian limb view.
    pub(crate) fn limbs(&self) -> &[u32] {
        &self.limbs
    }

    /// Whether this value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    /// Whether this value is one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.limbs == [1]
    }

    /// Whether this value is even. Zero is even.
    #[must_use]
    pub fn is_even(&self) -> bool {
        self.limbs.first().is_none_or(|limb| limb & 1 == 0)
    }

    /// Whether this value is odd.
    #[must_use]
    pub fn is_odd(&self) -> bool {
        !self.is_even()
    }

    /// Number of significant bits; zero for the value zero.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        match self.limbs.last() {
            None => 0,
            Some(top) => {
                (self.limbs.len() - 1) * LIMB_BITS as usize
                    + (LIMB_BITS - top.leading_zeros()) as usize
            }
        }
    }

    /// The bit at position `index` (0 = least significant).
    #[must_use]
    pub fn bit(&self, index: usize) -> bool {
        let limb = index / LIMB_BITS as usize;
        let offset = index % LIMB_BITS as usize;
        self.limbs
            .get(limb)
            .is_some_and(|word| (word >> offset) & 1 == 1)
    }

    /// Sum of `self` and `other`.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let (longer, shorter) = if self.limbs.len() >= other.limbs.len() {
            (&self.limbs, &other.limbs)
        } else {
            (&other.limbs, &self.limbs)
        };
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
        Self::from_limbs(out)
    }

    /// Difference `self - other`, or `None` when `other > self`.
    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        if self < other {
            return None;
        }
        let mut out = Vec::with_capacity(self.limbs.len());
        let mut borrow = 0i64;
        for (i, &limb) in self.limbs.iter().enumerate() {
            let diff = i64::from(limb)
                - i64::from(other.limbs.get(i).copied().unwrap_or(0))
                - borrow;
            if diff < 0 {
                out.push((diff + (1i64 << LIMB_BITS)) as u32);
                borrow = 1;
            } else {
                out.push(diff as u32);
                borrow = 0;
            }
        }
        debug_assert_eq!(borrow, 0);
        Some(Self::from_limbs(out))
    }

    /// Difference `self - other`; underflow is an error.
    pub fn sub(&self, other: &Self) -> Result<Self, ArithError> {
        self.checked_sub(other).ok_or(ArithError::Underflow)
    }

    /// Left shift by `bits`.
    #[must_use]
    pub fn shl(&self, bits: usize) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let limb_shift = bits / LIMB_BITS as usize;
        let bit_shift = (bits % LIMB_BITS as usize) as u32;
        let mut out = vec![0u32; limb_shift];
        if bit_shift == 0 {
            out.extend_from_slice(&self.limbs);
        } else {
            let mut carry = 0u32;
            for &limb in &self.limbs {
                out.push((limb << bit_shift) | carry);
                carry = limb >> (LIMB_BITS - bit_shift);
            }
            if carry != 0 {
                out.push(carry);
            }
        }
        Self::from_limbs(out)
    }

    /// Right shift by `bits`, discarding shifted-out bits.
    #[must_use]
    pub fn shr(&self, bits: usize) -> Self {
        let limb_shift = bits / LIMB_BITS as usize;
        if limb_shift >= self.limbs.len() {
            return Self::zero();
        }
        let bit_shift = (bits % LIMB_BITS as usize) as u32;
        let kept = &self.limbs[limb_shift..];
        if bit_shift == 0 {
            return Self::from_limbs(kept.to_vec());
        }
        let mut out = Vec::with_capacity(kept.len());
        for (i, &limb) in kept.iter().enumerate() {
            let high = kept.get(i + 1).copied().unwrap_or(0);
            out.push((limb >> bit_shift) | (high << (LIMB_BITS - bit_shift)));
        }
        Self::from_limbs(out)
    }

    /// The lowest `bits` bits of `self`.
    #[must_use]
    pub fn low_bits(&self, bits: usize) -> Self {
        let full_limbs = bits / LIMB_BITS as usize;
        if full_limbs >= self.limbs.len() {
            return self.clone();
        }
        let partial = (bits % LIMB_BITS as usize) as u32;
        let mut kept = self.limbs[..full_limbs].to_vec();
        if partial != 0 {
            kept.push(self.limbs[full_limbs] & ((1u32 << partial) - 1));
        }
        Self::from_limbs(kept)
    }

    /// Number of trailing zero bits; `None` for the value zero.
    #[must_use]
    pub fn trailing_zeros(&self) -> Option<usize> {
        let limb_index = self.limbs.iter().position(|&limb| limb != 0)?;
        Some(limb_index * LIMB_BITS as usize + self.limbs[limb_index].trailing_zeros() as usize)
    }

    /// Big-endian byte representation without leading zero bytes; zero is
    /// the empty byte string.
    #[must_use]
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.limbs.len() * 4);
        for &limb in self.limbs.iter().rev() {
            out.extend_from_slice(&limb.to_be_bytes());
        }
        let skip = out.iter().take_while(|&&byte| byte == 0).count();
        out.split_off(skip)
    }

    /// Big-endian byte representation left-padded with zeros to `len` bytes.
    ///
    /// Fails when the value does not fit in `len` bytes.
    pub fn to_bytes_be_padded(&self, len: usize) -> Result<Vec<u8>, ArithError> {
        let raw = self.to_bytes_be();
        if raw.len() > len {
            return Err(ArithError::ParseNatural(format!(
                "value needs {} bytes, only {len} available",
                raw.len()
            )));
        }
        let mut out = vec![0u8; len - raw.len()];
        out.extend_from_slice(&raw);
        Ok(out)
    }

    /// Parses a big-endian byte string. Leading zero bytes are accepted;
    /// the empty string is zero.
    #[must_use]
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        let mut limbs = Vec::with_capacity(bytes.len().div_ceil(4));
        for chunk in bytes.rchunks(4) {
            let mut word = 0u32;
            for &byte in chunk {
                word = (word << 8) | u32::from(byte);
            }
            limbs.push(word);
        }
        Self::from_limbs(limbs)
    }

    /// Parses a decimal string. Rejects empty strings and non-digits;
    /// leading zeros are accepted.
    pub fn from_decimal(text: &str) -> Result<Self, ArithError> {
        if text.is_empty() {
            return Err(ArithError::ParseNatural("empty decimal string".into()));
        }
        if !text.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(ArithError::ParseNatural(format!(
                "invalid decimal string {text:?}"
            )));
        }
        let mut value = Self::zero();
        let radix = Self::from(1_000_000_000u32);
        let bytes = text.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() {
            let take = (bytes.len() - pos).min(9);
            let chunk = &text[pos..pos + take];
            let digits: u32 = chunk.parse().map_err(|_| {
                ArithError::ParseNatural(format!("invalid decimal digits {chunk:?}"))
            })?;
            let scale = if take == 9 {
                radix.clone()
            } else {
                Self::from(10u32.pow(take as u32))
            };
            value = value.mul(&scale).add(&Self::from(digits));
            pos += take;
        }
        Ok(value)
    }

    /// Decimal string representation.
    #[must_use]
    pub fn to_decimal(&self) -> String {
        if self.is_zero() {
            return "0".to_owned();
        }
        let mut chunks = Vec::new();
        let mut value = self.clone();
        let radix = 1_000_000_000u32;
        while !value.is_zero() {
            let (quotient, rem) = value.div_rem_limb(radix);
            chunks.push(rem);
            value = quotient;
        }
        let mut out = String::new();
        for (i, chunk) in chunks.iter().rev().enumerate() {
            if i == 0 {
                out.push_str(&chunk.to_string());
            } else {
                out.push_str(&format!("{chunk:09}"));
            }
        }
        out
    }

    /// Parses a hexadecimal string (no prefix, case-insensitive).
    pub fn from_hex(text: &str) -> Result<Self, ArithError> {
        if text.is_empty() {
            return Err(ArithError::ParseNatural("empty hex string".into()));
        }
        if !text.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return Err(ArithError::ParseNatural(format!(
                "invalid hex string {text:?}"
            )));
        }
        let mut limbs = Vec::with_capacity(text.len().div_ceil(8));
        let bytes = text.as_bytes();
        for chunk in bytes.rchunks(8) {
            let piece = std::str::from_utf8(chunk)
                .map_err(|_| ArithError::ParseNatural("non-ASCII hex input".into()))?;
            let word = u32::from_str_radix(piece, 16).map_err(|_| {
                ArithError::ParseNatural(format!("invalid hex digits {piece:?}"))
            })?;
            limbs.push(word);
        }
        Ok(Self::from_limbs(limbs))
    }

    /// Division with a single-limb divisor.
    pub(crate) fn div_rem_limb(&self, divisor: u32) -> (Self, u32) {
        debug_assert!(divisor != 0);
        let mut out = vec![0u32; self.limbs.len()];
        let mut rem = 0u64;
        for (i, &limb) in self.limbs.iter().enumerate().rev() {
            let acc = (rem << LIMB_BITS) | u64::from(limb);
            out[i] = (acc / u64::from(divisor)) as u32;
            rem = acc % u64::from(divisor);
        }
        (Self::from_limbs(out), rem as u32)
    }
}

impl From<u32> for Natural {
    fn from(value: u32) -> Self {
        Self::from_limbs(vec![value])
    }
}

impl From<u64> for Natural {
    fn from(value: u64) -> Self {
        Self::from_limbs(vec![value as u32, (value >> LIMB_BITS) as u32])
    }
}

impl From<usize> for Natural {
    fn from(value: usize) -> Self {
        Self::from(value as u64)
    }
}

impl Ord for Natural {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.limbs.len().cmp(&other.limbs.len()) {
            Ordering::Equal => self
                .limbs
                .iter()
                .rev()
                .cmp(other.limbs.iter().rev()),
            unequal => unequal,
        }
    }
}

impl PartialOrd for Natural {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Natural {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

impl fmt::Debug for Natural {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Natural({self})")
    }
}

impl FromStr for Natural {
    type Err = ArithError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_decimal(text)
    }
}
