// Written in 2024 by the r3vcoin developers
// SPDX-License-Identifier: CC0-1.0

//! The block-index data model and the read-only chain view the kernel
//! walks. Storage and persistence are out of scope; this module only
//! defines the shape collaborators must present.

use crate::hash_types::BlockHash;
use crate::pow::CompactTarget;

/// An immutable snapshot of a block's position and metadata in the active
/// chain. The kernel never constructs or mutates these; it only reads them
/// through a [`ChainView`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockIndex {
    pub hash: BlockHash,
    pub height: u32,
    pub prev: Option<BlockHash>,
    pub block_time: u32,
    pub n_bits: CompactTarget,
    pub stake_modifier: u64,
    /// True iff this block's height crossed a modifier interval boundary
    /// and thus advanced the modifier.
    pub generated_stake_modifier: bool,
    /// One bit of entropy extracted from the block hash at accept time.
    pub stake_entropy_bit: u8,
    /// For PoW blocks, the block hash; for PoS blocks, the kernel
    /// hash-of-stake.
    pub hash_proof: crate::util::uint::Uint256,
    pub is_proof_of_stake: bool,
}

/// Read-only view over the active chain, as the kernel sees it.
///
/// Implementors are expected to present a consistent snapshot: the kernel
/// performs no internal locking and assumes repeated calls during a single
/// kernel operation observe the same chain state.
pub trait ChainView {
    /// The current tip of the active chain.
    fn tip(&self) -> BlockIndex;

    /// The active-chain successor of `idx`, if any.
    fn next(&self, idx: &BlockIndex) -> Option<BlockIndex>;

    /// Looks up a block by hash, active chain or not.
    fn by_hash(&self, hash: BlockHash) -> Option<BlockIndex>;

    /// The height of the active chain tip.
    fn height(&self) -> u32;
}
