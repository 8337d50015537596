// Written in 2014 by Andrew Poelstra <apoelstra@wpsoftware.net>
// SPDX-License-Identifier: CC0-1.0

//! Proof-of-work target encoding and the PoW check (C1's compact format, and
//! component C8).

use core::fmt;

use crate::error::RejectReason;
use crate::params::ConsensusConfig;
use crate::util::uint::Uint256;

/// The 32-bit "nBits" compact encoding of a 256-bit target.
///
/// Layout: the top byte is the size (number of significant bytes of the
/// mantissa once shifted into position), the bottom 23 bits are the
/// mantissa, and bit 23 is a sign flag. The kernel only ever produces
/// non-negative targets, but decoding must still detect a negative/
/// overflowed encoding coming from an attacker-controlled header.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompactTarget(u32);

impl CompactTarget {
    /// Wraps a raw `nBits` value without validating it.
    pub const fn from_consensus(bits: u32) -> Self {
        CompactTarget(bits)
    }

    /// Returns the raw `nBits` value.
    pub const fn to_consensus(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CompactTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl From<u32> for CompactTarget {
    fn from(bits: u32) -> Self {
        CompactTarget(bits)
    }
}

impl From<CompactTarget> for u32 {
    fn from(c: CompactTarget) -> Self {
        c.0
    }
}

/// Result of decoding a [`CompactTarget`].
struct Decoded {
    value: Uint256,
    negative: bool,
    overflow: bool,
}

/// Decodes a compact target into a 256-bit value plus its sign/overflow
/// flags, mirroring `arith_uint256::SetCompact`.
fn decode_compact(bits: CompactTarget) -> Decoded {
    let compact = bits.to_consensus();
    let size = (compact >> 24) as u32;
    let mut word = compact & 0x007f_ffff;

    let value = if size <= 3 {
        word >>= 8 * (3 - size);
        Uint256::from_u64(word as u64)
    } else {
        Uint256::from_u64(word as u64).shl(8 * (size - 3))
    };

    let negative = word != 0 && (compact & 0x0080_0000) != 0;
    let overflow = word != 0 && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));

    Decoded { value, negative, overflow }
}

/// Encodes a 256-bit value as a compact target, mirroring
/// `arith_uint256::GetCompact`. The kernel never needs to encode a negative
/// value, so there is no `negative` parameter.
fn encode_compact(value: Uint256) -> CompactTarget {
    let bits = value.bit_length();
    let mut size = (bits + 7) / 8;
    let mut compact: u32 = if size <= 3 {
        let low = value.0[0];
        (low << (8 * (3 - size))) as u32
    } else {
        let shifted = value.shr(8 * (size - 3));
        shifted.0[0] as u32
    };

    // The 0x00800000 bit denotes the sign; if set by coincidence of the
    // mantissa bits, shift the mantissa down and bump the exponent so the
    // value is never misread as negative.
    if compact & 0x0080_0000 != 0 {
        compact >>= 8;
        size += 1;
    }

    compact |= size << 24;
    CompactTarget::from_consensus(compact)
}

/// A validated 256-bit target value.
///
/// Unlike [`CompactTarget`], a `Target` is guaranteed non-negative,
/// non-overflowed, and expressed as a plain [`Uint256`] ready for
/// arithmetic and comparison against hash proofs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Target(pub Uint256);

impl Target {
    /// Decodes a compact target, rejecting negative, zero, or overflowed
    /// encodings.
    pub fn from_compact(bits: CompactTarget) -> Result<Target, RejectReason> {
        let Decoded { value, negative, overflow } = decode_compact(bits);
        if negative || overflow || value.is_zero() {
            return Err(RejectReason::BadTarget);
        }
        Ok(Target(value))
    }

    /// Encodes this target back into compact form.
    pub fn to_compact(self) -> CompactTarget {
        encode_compact(self.0)
    }

    /// Clamps `self` to be no looser (numerically no larger) than `limit`.
    pub fn clamp(self, limit: Target) -> Target {
        if self.0 > limit.0 {
            limit
        } else {
            self
        }
    }
}

/// Component C8: verifies a block header's hash meets its claimed target.
///
/// Rejects a negative, zero, or overflowed `n_bits` encoding, and a target
/// looser than `limit` (the network's PoW or PoS ceiling), before comparing
/// the hash.
pub fn check_pow(hash: Uint256, n_bits: CompactTarget, limit: Target) -> Result<bool, RejectReason> {
    let Decoded { value, negative, overflow } = decode_compact(n_bits);
    if negative || value.is_zero() || overflow || value > limit.0 {
        return Err(RejectReason::BadTarget);
    }
    Ok(hash <= value)
}

/// Convenience wrapper reading the PoW limit straight out of a
/// [`ConsensusConfig`].
pub fn check_pow_with_config(hash: Uint256, n_bits: CompactTarget, cfg: &ConsensusConfig) -> Result<bool, RejectReason> {
    check_pow(hash, n_bits, Target(cfg.pow_limit))
}
