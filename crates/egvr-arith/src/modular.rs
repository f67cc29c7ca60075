//! Modular exponentiation, inversion, square roots, and Legendre symbols.

use crate::{ArithError, Integer, Natural, PreparedDivisor};

/// Window width for the given modulus bit length. Monotone: 2 for small
/// moduli up to 8 at 4096 bits and beyond.
fn window_width(modulus_bits: usize) -> usize {
    match modulus_bits {
        0..=127 => 2,
        128..=511 => 3,
        512..=1023 => 4,
        1024..=2047 => 5,
        2048..=3071 => 6,
        3072..=4095 => 7,
        _ => 8,
    }
}

/// `base^exponent mod modulus` by left-to-right sliding-window
/// exponentiation over precomputed odd powers of the base.
pub fn mod_pow(
    base: &Natural,
    exponent: &Natural,
    modulus: &Natural,
) -> Result<Natural, ArithError> {
    if modulus.is_zero() {
        return Err(ArithError::NonPositiveModulus);
    }
    let prepared = PreparedDivisor::new(modulus)?;
    if modulus.is_one() {
        return Ok(Natural::zero());
    }
    let base = prepared.rem(base);
    if exponent.is_zero() {
        return Ok(Natural::one());
    }

    let width = window_width(modulus.bit_len());
    // Odd powers base^1, base^3, ..., base^(2^width - 1).
    let base_sqr = prepared.rem(&base.sqr());
    let mut odd_powers = Vec::with_capacity(1 << (width - 1));
    odd_powers.push(base);
    for i in 1..1usize << (width - 1) {
        odd_powers.push(prepared.rem(&odd_powers[i - 1].mul(&base_sqr)));
    }

    let mut acc = Natural::one();
    let mut pos = exponent.bit_len();
    while pos > 0 {
        if !exponent.bit(pos - 1) {
            acc = prepared.rem(&acc.sqr());
            pos -= 1;
            continue;
        }
        // Greedy window [start, pos) with a set bottom bit.
        let mut start = pos.saturating_sub(width);
        while !exponent.bit(start) {
            start += 1;
        }
        for _ in start..pos {
            acc = prepared.rem(&acc.sqr());
        }
        let mut window = 0usize;
        for bit in (start..pos).rev() {
            window = (window << 1) | usize::from(exponent.bit(bit));
        }
        acc = prepared.rem(&acc.mul(&odd_powers[(window - 1) / 2]));
        pos = start;
    }
    Ok(acc)
}

/// Simultaneous exponentiation `∏ bases[i]^exponents[i] mod modulus` with a
/// `2^k`-entry subset-product table.
#[derive(Clone, Debug)]
pub struct SimultaneousPow {
    /// `table[mask] = ∏_{i ∈ mask} bases[i] mod modulus`.
    table: Vec<Natural>,
    prepared: PreparedDivisor,
    width: usize,
}

impl SimultaneousPow {
    /// Builds the subset-product table for `bases`.
    pub fn new(bases: &[Natural], modulus: &Natural) -> Result<Self, ArithError> {
        if modulus.is_zero() {
            return Err(ArithError::NonPositiveModulus);
        }
        let prepared = PreparedDivisor::new(modulus)?;
        let width = bases.len();
        let mut table = vec![Natural::one(); 1 << width];
        if modulus.is_one() {
            table.fill(Natural::zero());
        }
        for (i, raw) in bases.iter().enumerate() {
            let base = prepared.rem(raw);
            for mask in 0..1usize << i {
                table[mask | (1 << i)] = prepared.rem(&table[mask].mul(&base));
            }
        }
        Ok(Self {
            table,
            prepared,
            width,
        })
    }

    /// Number of bases this table was built for.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// `∏ bases[i]^exponents[i] mod modulus`; one exponent per base.
    pub fn pow(&self, exponents: &[Natural]) -> Result<Natural, ArithError> {
        if exponents.len() != self.width {
            return Err(ArithError::MismatchedLengths {
                expected: self.width,
                actual: exponents.len(),
            });
        }
        let max_bits = exponents.iter().map(Natural::bit_len).max().unwrap_or(0);
        let mut acc = if self.prepared.divisor().is_one() {
            Natural::zero()
        } else {
            Natural::one()
        };
        for pos in (0..max_bits).rev() {
            acc = self.prepared.rem(&acc.sqr());
            let mut mask = 0usize;
            for (i, exponent) in exponents.iter().enumerate() {
                if exponent.bit(pos) {
                    mask |= 1 << i;
                }
            }
            if mask != 0 {
                acc = self.prepared.rem(&acc.mul(&self.table[mask]));
            }
        }
        Ok(acc)
    }
}

/// `∏ bases[i]^exponents[i] mod modulus` in one shot.
pub fn mod_prod_pow(
    bases: &[Natural],
    exponents: &[Natural],
    modulus: &Natural,
) -> Result<Natural, ArithError> {
    SimultaneousPow::new(bases, modulus)?.pow(exponents)
}

/// Fixed-base exponentiation: the exponent is packed into `k` slices over a
/// table of `base^(2^(i·slice_bits))` powers, turning one long exponent
/// into a simultaneous exponentiation. Worth building when the same base is
/// exponentiated many times.
#[derive(Clone, Debug)]
pub struct FixedBasePow {
    sim: SimultaneousPow,
    slice_bits: usize,
}

impl FixedBasePow {
    /// Builds a table for `base` given the exponent bit length and the
    /// expected number of exponentiations it will amortize over.
    pub fn new(
        base: &Natural,
        exponent_bits: usize,
        amortization: usize,
        modulus: &Natural,
    ) -> Result<Self, ArithError> {
        let width = usize::try_from(amortization.max(2).ilog2())
            .unwrap_or(1)
            .clamp(1, 8);
        let slice_bits = exponent_bits.div_ceil(width).max(1);
        let prepared = PreparedDivisor::new(modulus)?;
        let mut bases = Vec::with_capacity(width);
        let mut power = prepared.rem(base);
        for i in 0..width {
            if i > 0 {
                for _ in 0..slice_bits {
                    power = prepared.rem(&power.sqr());
                }
            }
            bases.push(power.clone());
        }
        Ok(Self {
            sim: SimultaneousPow::new(&bases, modulus)?,
            slice_bits,
        })
    }

    /// `base^exponent mod modulus` through the precomputed table. Falls
    /// back to plain exponentiation when the exponent outgrows the table.
    pub fn pow(&self, exponent: &Natural) -> Result<Natural, ArithError> {
        let capacity = self.slice_bits * self.sim.width();
        if exponent.bit_len() > capacity {
            return mod_pow(&self.sim.table[1], exponent, self.sim.prepared.divisor());
        }
        let slices: Vec<Natural> = (0..self.sim.width())
            .map(|i| exponent.shr(i * self.slice_bits).low_bits(self.slice_bits))
            .collect();
        self.sim.pow(&slices)
    }
}

/// Legendre symbol `(value | modulus)` by the Euler criterion: 1 for a
/// quadratic residue, -1 for a non-residue, 0 when `modulus` divides
/// `value`. The modulus must be an odd prime.
pub fn legendre(value: &Natural, modulus: &Natural) -> Result<i32, ArithError> {
    if modulus.is_zero() {
        return Err(ArithError::NonPositiveModulus);
    }
    if modulus.is_even() {
        return Err(ArithError::EvenModulus);
    }
    let reduced = value.rem(modulus)?;
    if reduced.is_zero() {
        return Ok(0);
    }
    let exponent = modulus.sub(&Natural::one())?.shr(1);
    let symbol = mod_pow(&reduced, &exponent, modulus)?;
    if symbol.is_one() {
        Ok(1)
    } else {
        Ok(-1)
    }
}

/// Modular inverse by binary extended GCD; the modulus must be odd and
/// greater than one.
pub fn mod_inv(value: &Natural, modulus: &Natural) -> Result<Natural, ArithError> {
    if modulus.is_zero() {
        return Err(ArithError::NonPositiveModulus);
    }
    if modulus.is_even() {
        return Err(ArithError::EvenModulus);
    }
    if modulus.is_one() {
        return Err(ArithError::NotInvertible);
    }
    let mut u = value.rem(modulus)?;
    if u.is_zero() {
        return Err(ArithError::NotInvertible);
    }
    let mut v = modulus.clone();
    let mut x1 = Integer::from(Natural::one());
    let mut x2 = Integer::zero();
    let m = Integer::from(modulus.clone());

    // Invariants: x1·value ≡ u and x2·value ≡ v (mod modulus).
    loop {
        while u.is_even() {
            u = u.shr(1);
            x1 = if x1.is_even() { x1 } else { x1.add(&m) }.halve();
        }
        while v.is_even() {
            v = v.shr(1);
            x2 = if x2.is_even() { x2 } else { x2.add(&m) }.halve();
        }
        match u.cmp(&v) {
            std::cmp::Ordering::Equal => {
                return if u.is_one() {
                    x1.rem_euclid(modulus)
                } else {
                    Err(ArithError::NotInvertible)
                };
            }
            std::cmp::Ordering::Greater => {
                u = u.sub(&v)?;
                x1 = x1.sub(&x2);
            }
            std::cmp::Ordering::Less => {
                v = v.sub(&u)?;
                x2 = x2.sub(&x1);
            }
        }
    }
}

/// Modular square root by Tonelli–Shanks; the modulus must be an odd
/// prime, and the value a quadratic residue.
pub fn mod_sqrt(value: &Natural, modulus: &Natural) -> Result<Natural, ArithError> {
    if modulus.is_zero() {
        return Err(ArithError::NonPositiveModulus);
    }
    if modulus.is_even() {
        return Err(ArithError::EvenModulus);
    }
    let reduced = value.rem(modulus)?;
    if reduced.is_zero() {
        return Ok(Natural::zero());
    }
    if legendre(&reduced, modulus)? != 1 {
        return Err(ArithError::NonResidue);
    }

    let one = Natural::one();
    let p_minus_1 = modulus.sub(&one)?;

    // p ≡ 3 (mod 4): the root is a^((p+1)/4).
    if modulus.bit(1) {
        let exponent = modulus.add(&one).shr(2);
        return mod_pow(&reduced, &exponent, modulus);
    }

    // Factor p - 1 = q·2^s with q odd.
    let s = p_minus_1
        .trailing_zeros()
        .ok_or(ArithError::NonPositiveModulus)?;
    let q = p_minus_1.shr(s);

    // Smallest quadratic non-residue as the Tonelli–Shanks generator.
    let mut z = Natural::from(2u32);
    while legendre(&z, modulus)? != -1 {
        z = z.add(&one);
    }

    let prepared = PreparedDivisor::new(modulus)?;
    let mut m = s;
    let mut c = mod_pow(&z, &q, modulus)?;
    let mut t = mod_pow(&reduced, &q, modulus)?;
    let mut r = mod_pow(&reduced, &q.add(&one).shr(1), modulus)?;

    while !t.is_one() {
        // Least i with t^(2^i) = 1; guaranteed to be < m for residues.
        let mut i = 0usize;
        let mut probe = t.clone();
        while !probe.is_one() {
            probe = prepared.rem(&probe.sqr());
            i += 1;
            if i == m {
                return Err(ArithError::NonResidue);
            }
        }
        let mut b = c;
        for _ in 0..m - i - 1 {
            b = prepared.rem(&b.sqr());
        }
        m = i;
        c = prepared.rem(&b.sqr());
        t = prepared.rem(&t.mul(&c));
        r = prepared.rem(&r.mul(&b));
    }
    Ok(r)
}

#[cfg(test)]
mod tests {
    use rand::RngCore as _;
    use rand::SeedableRng as _;
    use rand_xorshift::XorShiftRng;

    use super::*;

    fn nat(text: &str) -> Natural {
        Natural::from_decimal(text).expect("decimal")
    }

    #[test]
    fn mod_pow_small_cases() {
        let m = Natural::from(1000u32);
        assert_eq!(
            mod_pow(&Natural::from(2u32), &Natural::from(10u32), &m),
            Ok(Natural::from(24u32))
        );
        assert_eq!(
            mod_pow(&Natural::from(5u32), &Natural::zero(), &m),
            Ok(Natural::one())
        );
        assert_eq!(
            mod_pow(&Natural::from(5u32), &Natural::from(3u32), &Natural::one()),
            Ok(Natural::zero())
        );
        assert_eq!(
            mod_pow(&Natural::from(5u32), &Natural::from(3u32), &Natural::zero()),
            Err(ArithError::NonPositiveModulus)
        );
    }

    #[test]
    fn mod_pow_fermat() {
        // 2^(p-1) ≡ 1 (mod p) for prime p = 2^127 - 1.
        let p = nat("170141183460469231731687303715884105727");
        let exponent = p.sub(&Natural::one()).expect("sub");
        assert_eq!(mod_pow(&Natural::from(2u32), &exponent, &p), Ok(Natural::one()));
    }

    #[test]
    fn mod_pow_is_homomorphic_in_the_exponent() {
        let mut rng = XorShiftRng::seed_from_u64(17);
        let m = nat("123456789123456789123456789123456791");
        for _ in 0..8 {
            let base = Natural::from(rng.next_u64());
            let a = Natural::from(rng.next_u64());
            let b = Natural::from(rng.next_u64());
            let lhs = mod_pow(&base, &a, &m)
                .and_then(|x| mod_pow(&base, &b, &m).map(|y| x.mul(&y)))
                .and_then(|xy| xy.rem(&m))
                .expect("pow");
            let rhs = mod_pow(&base, &a.add(&b), &m).expect("pow");
            assert_eq!(lhs, rhs);
        }
    }

    #[test]
    fn prod_pow_matches_separate_powers() {
        let mut rng = XorShiftRng::seed_from_u64(23);
        let m = nat("999999999999999999999999999999999989");
        let bases: Vec<Natural> = (0..3).map(|_| Natural::from(rng.next_u64())).collect();
        let exps: Vec<Natural> = (0..3).map(|_| Natural::from(rng.next_u64())).collect();
        let expected = bases
            .iter()
            .zip(&exps)
            .map(|(b, e)| mod_pow(b, e, &m).expect("pow"))
            .fold(Natural::one(), |acc, x| acc.mul(&x).rem(&m).expect("rem"));
        assert_eq!(mod_prod_pow(&bases, &exps, &m), Ok(expected));
    }

    #[test]
    fn prod_pow_length_mismatch() {
        let m = Natural::from(97u32);
        let sim = SimultaneousPow::new(&[Natural::from(3u32)], &m).expect("table");
        assert!(matches!(
            sim.pow(&[]),
            Err(ArithError::MismatchedLengths { .. })
        ));
    }

    #[test]
    fn fixed_base_matches_mod_pow() {
        let m = nat("170141183460469231731687303715884105727");
        let base = Natural::from(3u32);
        let table = FixedBasePow::new(&base, 127, 50, &m).expect("table");
        let mut rng = XorShiftRng::seed_from_u64(31);
        for _ in 0..10 {
            let mut exp = Natural::from(rng.next_u64());
            exp = exp.mul(&Natural::from(rng.next_u64())).add(&Natural::one());
            assert_eq!(table.pow(&exp), mod_pow(&base, &exp, &m));
        }
    }

    #[test]
    fn legendre_symbols_mod_11() {
        let p = Natural::from(11u32);
        let residues = [1u32, 3, 4, 5, 9];
        let non_residues = [2u32, 6, 7, 8, 10];
        for r in residues {
            assert_eq!(legendre(&Natural::from(r), &p), Ok(1));
        }
        for n in non_residues {
            assert_eq!(legendre(&Natural::from(n), &p), Ok(-1));
        }
        assert_eq!(legendre(&Natural::zero(), &p), Ok(0));
        assert_eq!(
            legendre(&Natural::from(3u32), &Natural::from(10u32)),
            Err(ArithError::EvenModulus)
        );
    }

    #[test]
    fn inverse_round_trip() {
        let p = nat("170141183460469231731687303715884105727");
        let mut rng = XorShiftRng::seed_from_u64(41);
        for _ in 0..12 {
            let x = Natural::from(rng.next_u64()).add(&Natural::one());
            let inv = mod_inv(&x, &p).expect("invert");
            assert_eq!(x.mul(&inv).rem(&p), Ok(Natural::one()));
        }
    }

    #[test]
    fn inverse_rejects_non_units() {
        let m = Natural::from(15u32);
        assert_eq!(
            mod_inv(&Natural::from(5u32), &m),
            Err(ArithError::NotInvertible)
        );
        assert_eq!(
            mod_inv(&Natural::zero(), &m),
            Err(ArithError::NotInvertible)
        );
        assert_eq!(
            mod_inv(&Natural::from(2u32), &Natural::from(8u32)),
            Err(ArithError::EvenModulus)
        );
        // 7 is a unit mod 15 even though 15 is composite.
        let inv = mod_inv(&Natural::from(7u32), &m).expect("invert");
        assert_eq!(Natural::from(7u32).mul(&inv).rem(&m), Ok(Natural::one()));
    }

    #[test]
    fn sqrt_of_squares() {
        // p ≡ 1 (mod 4) exercises the full Tonelli–Shanks loop.
        let large = Natural::from(1_000_000_007u32);
        for p in [large, Natural::from(13u32), Natural::from(17u32), Natural::from(7u32)] {
            let mut rng = XorShiftRng::seed_from_u64(53);
            for _ in 0..8 {
                let x = Natural::from(rng.next_u64()).rem(&p).expect("rem");
                let square = x.sqr().rem(&p).expect("rem");
                let root = mod_sqrt(&square, &p).expect("sqrt");
                assert_eq!(root.sqr().rem(&p), Ok(square));
            }
        }
    }

    #[test]
    fn sqrt_rejects_non_residues() {
        let p = Natural::from(11u32);
        assert_eq!(
            mod_sqrt(&Natural::from(2u32), &p),
            Err(ArithError::NonResidue)
        );
    }
}
