// Written in 2024 by the r3vcoin developers
// SPDX-License-Identifier: CC0-1.0

//! Collaborator traits the kernel reads through, and the one default
//! implementation (`DefaultHasher::sha256d`) that doesn't need to vary
//! between a production node and a test fixture.

use bitcoin_hashes::Hash as _;

use crate::chain::BlockIndex;
use crate::error::KernelError;
use crate::hash_types::{BlockHash, Txid};
use crate::transaction::Transaction;

/// Looks up a transaction by id, along with the block that contains it and
/// its serialized byte offset within that block (itself part of the kernel
/// hash input, to spread out otherwise-identical candidates).
pub trait TxIndex {
    fn get_transaction(&self, txid: Txid) -> Option<(Transaction, BlockHash, u32)>;
}

/// Reads the block referenced by a [`BlockIndex`].
pub trait BlockStore {
    fn read_block(&self, index: &BlockIndex) -> Result<BlockIndex, KernelError>;
}

/// Network-adjusted wall clock.
pub trait Clock {
    /// Current network-adjusted time, in unix seconds.
    fn adjusted_now(&self) -> i64;
}

/// Hashing and signature verification, treated as a black box by the
/// kernel.
pub trait Hasher {
    fn sha256d(&self, bytes: &[u8]) -> [u8; 32];

    /// Verifies the signature on `tx`'s `input_index`-th input against the
    /// output it spends (`tx_prev`). There is intentionally no default
    /// implementation: a stub that returns `true` would silently disable
    /// signature checking for anyone who forgets to wire in a real one.
    fn verify_signature(&self, tx_prev: &Transaction, tx: &Transaction, input_index: usize) -> bool;
}

/// Provides [`Hasher::sha256d`] via `bitcoin_hashes`. Does not implement
/// [`Hasher`] on its own since it has no signature-verification logic;
/// embed it in a type that supplies one, or call
/// [`DefaultHasher::sha256d`] directly.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultHasher;

impl DefaultHasher {
    /// Computes SHA-256d (double SHA-256) over `bytes`.
    pub fn sha256d(bytes: &[u8]) -> [u8; 32] {
        bitcoin_hashes::sha256d::Hash::hash(bytes).into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hasher_is_deterministic() {
        let a = DefaultHasher::sha256d(b"r3vcoin");
        let b = DefaultHasher::sha256d(b"r3vcoin");
        assert_eq!(a, b);
    }

    #[test]
    fn default_hasher_differs_on_different_input() {
        assert_ne!(DefaultHasher::sha256d(b"a"), DefaultHasher::sha256d(b"b"));
    }
}
