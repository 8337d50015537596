// Written in 2014 by Andrew Poelstra <apoelstra@wpsoftware.net>
// SPDX-License-Identifier: CC0-1.0

//! Big unsigned integer types.
//!
//! This module provides an unsigned 256-bit integer type, [`Uint256`], used
//! throughout the kernel for target/difficulty arithmetic. Unlike the
//! macro-generated family of widths historically found in this lineage, only
//! the 256-bit width is needed here, so it is written out directly.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Div, Mul, Shl, Shr, Sub};

/// Number of 64-bit limbs in a [`Uint256`].
const WIDTH: usize = 4;

/// An unsigned 256-bit integer, stored as four 64-bit limbs, least
/// significant first (`0[0]` is bits `0..64`, `0[3]` is bits `192..256`).
///
/// This matches the limb order used throughout the Bitcoin/Peercoin lineage,
/// so that hex constants for `pow_limit`/`pos_limit` written as
/// `Uint256([lo, .., hi])` read the same way here as in those codebases.
#[derive(Copy, Clone, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uint256(pub [u64; WIDTH]);

impl Uint256 {
    /// The additive identity.
    pub const ZERO: Uint256 = Uint256([0, 0, 0, 0]);
    /// The multiplicative identity.
    pub const ONE: Uint256 = Uint256([1, 0, 0, 0]);
    /// The largest representable value, `2**256 - 1`.
    pub const MAX: Uint256 = Uint256([u64::MAX; WIDTH]);

    /// Builds a `Uint256` from a `u64`.
    pub const fn from_u64(n: u64) -> Uint256 {
        Uint256([n, 0, 0, 0])
    }

    /// Returns `true` if the value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&limb| limb == 0)
    }

    /// Parses big-endian bytes (as produced by a hash function) into a
    /// `Uint256`, i.e. `bytes[0]` is the most significant byte.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Uint256 {
        let mut limbs = [0u64; WIDTH];
        for i in 0..WIDTH {
            let start = (WIDTH - 1 - i) * 8;
            let mut b = [0u8; 8];
            b.copy_from_slice(&bytes[start..start + 8]);
            limbs[i] = u64::from_be_bytes(b);
        }
        Uint256(limbs)
    }

    /// Serialises the value as big-endian bytes, most significant byte
    /// first.
    pub fn to_be_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for i in 0..WIDTH {
            let start = (WIDTH - 1 - i) * 8;
            out[start..start + 8].copy_from_slice(&self.0[i].to_be_bytes());
        }
        out
    }

    /// Serialises the value as little-endian bytes, matching this
    /// lineage's on-wire `uint256` encoding.
    pub fn to_le_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for i in 0..WIDTH {
            let start = i * 8;
            out[start..start + 8].copy_from_slice(&self.0[i].to_le_bytes());
        }
        out
    }

    /// Parses little-endian bytes into a `Uint256`.
    pub fn from_le_bytes(bytes: [u8; 32]) -> Uint256 {
        let mut limbs = [0u64; WIDTH];
        for i in 0..WIDTH {
            let start = i * 8;
            let mut b = [0u8; 8];
            b.copy_from_slice(&bytes[start..start + 8]);
            limbs[i] = u64::from_le_bytes(b);
        }
        Uint256(limbs)
    }

    /// The position of the highest set bit, i.e. `floor(log2(self)) + 1`.
    /// Zero for a zero value.
    pub fn bit_length(&self) -> u32 {
        for i in (0..WIDTH).rev() {
            if self.0[i] != 0 {
                return (i as u32) * 64 + (64 - self.0[i].leading_zeros());
            }
        }
        0
    }

    /// Approximates `self` as an `f64`.
    ///
    /// Values needing more than 64 bits of precision are represented by
    /// their top 64 significant bits, scaled by `2**(bit_length - 64)`. This
    /// is used only for diagnostic logging of difficulty values (the KGW
    /// event-horizon computation itself works in plain `f64` block-time
    /// arithmetic, never on a `Uint256`), but the conversion is specified
    /// precisely since some forks of this chain have logged it as part of
    /// their debug output.
    pub fn to_f64(&self) -> f64 {
        let bits = self.bit_length();
        if bits <= 64 {
            return self.0[0] as f64;
        }
        let shift = bits - 64;
        let top = (*self >> shift as usize).0[0];
        (top as f64) * 2f64.powi(shift as i32)
    }

    /// Shift left by `n` bits (`0..=256`); bits shifted past the top are
    /// discarded (wrapping, matching `arith_uint256`'s behaviour).
    pub fn shl(self, n: u32) -> Uint256 {
        if n >= 256 {
            return Uint256::ZERO;
        }
        let limb_shift = (n / 64) as usize;
        let bit_shift = n % 64;
        let mut out = [0u64; WIDTH];
        for i in (0..WIDTH).rev() {
            if i < limb_shift {
                continue;
            }
            let src = i - limb_shift;
            let mut v = self.0[src] << bit_shift;
            if bit_shift > 0 && src > 0 {
                v |= self.0[src - 1] >> (64 - bit_shift);
            }
            out[i] = v;
        }
        Uint256(out)
    }

    /// Shift right (logical) by `n` bits (`0..=256`).
    pub fn shr(self, n: u32) -> Uint256 {
        if n >= 256 {
            return Uint256::ZERO;
        }
        let limb_shift = (n / 64) as usize;
        let bit_shift = n % 64;
        let mut out = [0u64; WIDTH];
        for i in 0..WIDTH {
            let src = i + limb_shift;
            if src >= WIDTH {
                continue;
            }
            let mut v = self.0[src] >> bit_shift;
            if bit_shift > 0 && src + 1 < WIDTH {
                v |= self.0[src + 1] << (64 - bit_shift);
            }
            out[i] = v;
        }
        Uint256(out)
    }

    /// Wrapping addition, i.e. modulo `2**256`.
    pub fn wrapping_add(self, rhs: Uint256) -> Uint256 {
        let mut out = [0u64; WIDTH];
        let mut carry = 0u128;
        for i in 0..WIDTH {
            let sum = self.0[i] as u128 + rhs.0[i] as u128 + carry;
            out[i] = sum as u64;
            carry = sum >> 64;
        }
        Uint256(out)
    }

    /// Wrapping subtraction, i.e. modulo `2**256`.
    pub fn wrapping_sub(self, rhs: Uint256) -> Uint256 {
        let mut out = [0u64; WIDTH];
        let mut borrow = 0i128;
        for i in 0..WIDTH {
            let diff = self.0[i] as i128 - rhs.0[i] as i128 - borrow;
            if diff < 0 {
                out[i] = (diff + (1i128 << 64)) as u64;
                borrow = 1;
            } else {
                out[i] = diff as u64;
                borrow = 0;
            }
        }
        Uint256(out)
    }

    /// Multiplies by a `u64`, truncating to 256 bits (matches
    /// `arith_uint256::operator*=(uint64_t)`, which silently discards any
    /// overflow beyond the top limb).
    pub fn mul_u64(self, rhs: u64) -> Uint256 {
        let mut out = [0u64; WIDTH];
        let mut carry = 0u128;
        for i in 0..WIDTH {
            let prod = self.0[i] as u128 * rhs as u128 + carry;
            out[i] = prod as u64;
            carry = prod >> 64;
        }
        Uint256(out)
    }

    /// Full 256x256 -> 256 multiply, truncating to 256 bits.
    pub fn wrapping_mul(self, rhs: Uint256) -> Uint256 {
        let mut acc = [0u128; WIDTH];
        for i in 0..WIDTH {
            if self.0[i] == 0 {
                continue;
            }
            let mut carry = 0u128;
            for j in 0..(WIDTH - i) {
                let p = self.0[i] as u128 * rhs.0[j] as u128 + acc[i + j] + carry;
                acc[i + j] = p & (u64::MAX as u128);
                carry = p >> 64;
            }
        }
        let mut out = [0u64; WIDTH];
        for i in 0..WIDTH {
            out[i] = acc[i] as u64;
        }
        Uint256(out)
    }

    /// Divides by a `u64`, returning `(quotient, remainder)`.
    ///
    /// # Panics
    ///
    /// Panics if `rhs` is zero.
    pub fn div_rem_u64(self, rhs: u64) -> (Uint256, u64) {
        assert!(rhs != 0, "division by zero");
        let mut quotient = [0u64; WIDTH];
        let mut rem: u128 = 0;
        for i in (0..WIDTH).rev() {
            let cur = (rem << 64) | self.0[i] as u128;
            quotient[i] = (cur / rhs as u128) as u64;
            rem = cur % rhs as u128;
        }
        (Uint256(quotient), rem as u64)
    }

    /// Divides by a `u64`, discarding the remainder.
    pub fn div_u64(self, rhs: u64) -> Uint256 {
        self.div_rem_u64(rhs).0
    }

    /// Divides by another `Uint256` via repeated long division. Only used
    /// where a full bignum division is genuinely needed; consensus hot
    /// paths divide by `u64` scalars (see [`Uint256::div_u64`]).
    pub fn wrapping_div(self, rhs: Uint256) -> Uint256 {
        if rhs.is_zero() {
            return Uint256::ZERO;
        }
        if self < rhs {
            return Uint256::ZERO;
        }
        let mut remainder = self;
        let mut quotient = Uint256::ZERO;
        let mut shift = self.bit_length().saturating_sub(rhs.bit_length());
        let mut shifted = rhs.shl(shift);
        loop {
            if shifted <= remainder {
                remainder = remainder.wrapping_sub(shifted);
                quotient = quotient.wrapping_add(Uint256::ONE.shl(shift));
            }
            if shift == 0 {
                break;
            }
            shift -= 1;
            shifted = shifted.shr(1);
        }
        quotient
    }
}

impl PartialEq for Uint256 {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for Uint256 {}

impl PartialOrd for Uint256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Uint256 {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..WIDTH).rev() {
            match self.0[i].cmp(&other.0[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl Add for Uint256 {
    type Output = Uint256;
    fn add(self, rhs: Uint256) -> Uint256 {
        self.wrapping_add(rhs)
    }
}

impl Sub for Uint256 {
    type Output = Uint256;
    fn sub(self, rhs: Uint256) -> Uint256 {
        self.wrapping_sub(rhs)
    }
}

impl Mul for Uint256 {
    type Output = Uint256;
    fn mul(self, rhs: Uint256) -> Uint256 {
        self.wrapping_mul(rhs)
    }
}

impl Mul<u64> for Uint256 {
    type Output = Uint256;
    fn mul(self, rhs: u64) -> Uint256 {
        self.mul_u64(rhs)
    }
}

impl Div for Uint256 {
    type Output = Uint256;
    fn div(self, rhs: Uint256) -> Uint256 {
        self.wrapping_div(rhs)
    }
}

impl Div<u64> for Uint256 {
    type Output = Uint256;
    fn div(self, rhs: u64) -> Uint256 {
        self.div_u64(rhs)
    }
}

impl Shl<u32> for Uint256 {
    type Output = Uint256;
    fn shl(self, rhs: u32) -> Uint256 {
        Uint256::shl(self, rhs)
    }
}

impl Shr<u32> for Uint256 {
    type Output = Uint256;
    fn shr(self, rhs: u32) -> Uint256 {
        Uint256::shr(self, rhs)
    }
}

impl Shr<usize> for Uint256 {
    type Output = Uint256;
    fn shr(self, rhs: usize) -> Uint256 {
        Uint256::shr(self, rhs as u32)
    }
}

impl fmt::Debug for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uint256(0x{})", self)
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::LowerHex for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_be_bytes().iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_one() {
        assert!(Uint256::ZERO.is_zero());
        assert!(!Uint256::ONE.is_zero());
        assert_eq!(Uint256::ONE.bit_length(), 1);
        assert_eq!(Uint256::ZERO.bit_length(), 0);
    }

    #[test]
    fn ordering_compares_most_significant_limb_first() {
        let small = Uint256([0, 0, 0, 1]);
        let big = Uint256([u64::MAX, u64::MAX, u64::MAX, 1]);
        assert!(small < big);
        assert!(Uint256::from_u64(5) < Uint256::from_u64(6));
    }

    #[test]
    fn shifts_round_trip() {
        let v = Uint256::from_u64(0x00ff_00ff_00ff_00ff);
        assert_eq!(v.shl(8).shr(8), v);
        assert_eq!(Uint256::ONE.shl(255).bit_length(), 256);
        assert_eq!(Uint256::ONE.shl(256), Uint256::ZERO);
    }

    #[test]
    fn mul_u64_matches_repeated_addition() {
        let v = Uint256::from_u64(12345);
        let mut acc = Uint256::ZERO;
        for _ in 0..7 {
            acc = acc + v;
        }
        assert_eq!(v.mul_u64(7), acc);
    }

    #[test]
    fn div_rem_u64_inverts_mul_u64() {
        let v = Uint256::from_u64(98765) << 64;
        let (q, r) = v.div_rem_u64(17);
        assert_eq!(q.mul_u64(17).wrapping_add(Uint256::from_u64(r)), v);
    }

    #[test]
    fn wrapping_mul_matches_schoolbook_small_values() {
        let a = Uint256::from_u64(123456789);
        let b = Uint256::from_u64(987654321);
        let expected = Uint256::from_u64(123456789u64 * 987654321u64);
        assert_eq!(a.wrapping_mul(b), expected);
    }

    #[test]
    fn be_byte_round_trip() {
        let bytes = [
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
            0x0f, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b, 0x1c,
            0x1d, 0x1e, 0x1f, 0x20,
        ];
        let v = Uint256::from_be_bytes(bytes);
        assert_eq!(v.to_be_bytes(), bytes);
    }

    #[test]
    fn to_f64_exact_for_small_values() {
        assert_eq!(Uint256::from_u64(1234).to_f64(), 1234.0);
    }

    #[test]
    fn to_f64_approximates_large_values() {
        let v = Uint256::ONE.shl(200);
        let approx = v.to_f64();
        assert!((approx - 2f64.powi(200)).abs() / 2f64.powi(200) < 1e-9);
    }
}
