// Written in 2024 by the r3vcoin developers
// SPDX-License-Identifier: CC0-1.0

//! Component C6: the top-level PoSV validator, wrapping the kernel hash
//! check (C5) with signature verification and the coin-age accounting used
//! by nodes to build a consistent view of chain trust.

use crate::aging::coin_age_weight;
use crate::chain::ChainView;
use crate::collaborators::{BlockStore, Clock, Hasher, TxIndex};
use crate::error::{KernelError, RejectReason};
use crate::kernel::{check_stake_kernel_hash, KernelHashProof};
use crate::params::{ConsensusConfig, CENT, COIN};
use crate::pow::CompactTarget;
use crate::transaction::Transaction;
use crate::util::uint::Uint256;

/// Component C6: `check_proof_of_stake`.
///
/// Validates that `tx` is a well-formed coinstake, that its kernel input's
/// signature verifies against the output it spends, and that the kernel
/// hash meets its coin-weighted target.
pub fn check_proof_of_stake(
    chain: &dyn ChainView,
    clock: &dyn Clock,
    tx_index: &dyn TxIndex,
    block_store: &dyn BlockStore,
    hasher: &dyn Hasher,
    cfg: &ConsensusConfig,
    tx: &Transaction,
    n_bits: CompactTarget,
) -> Result<KernelHashProof, KernelError> {
    if !tx.is_coinstake() {
        return Err(KernelError::from(RejectReason::MalformedCoinstake));
    }

    let kernel_input = tx.vin.first().ok_or(KernelError::from(RejectReason::MalformedCoinstake))?;

    let (tx_prev, block_hash, tx_prev_offset) = tx_index
        .get_transaction(kernel_input.prevout.txid)
        .ok_or(KernelError::DataUnavailable("kernel input's previous transaction is not indexed"))?;

    if !hasher.verify_signature(&tx_prev, tx, 0) {
        return Err(KernelError::from(RejectReason::BadSignature));
    }

    let block_from = chain
        .by_hash(block_hash)
        .ok_or(KernelError::DataUnavailable("kernel input's containing block is not indexed"))?;
    // Confirms the block is actually retrievable from storage, mirroring
    // the original's explicit "read block failed" path, even though only
    // the already-fetched `BlockIndex` is used from here on.
    block_store.read_block(&block_from)?;

    check_stake_kernel_hash(chain, clock, cfg, n_bits, &block_from, tx_prev_offset, &tx_prev, kernel_input.prevout, tx.n_time)
}

/// I3: a coinstake's `n_time` must equal the block's `n_time`.
pub fn check_coinstake_timestamp(block_time: i64, tx_time: i64) -> bool {
    block_time == tx_time
}

/// Total coin-age spent by a single transaction's inputs, in coin-days.
/// Inputs whose previous output cannot be resolved through `tx_index`
/// (e.g. during initial sync) are skipped rather than rejected, matching
/// this lineage's tolerance for an incomplete view during catch-up.
pub fn coin_age_of_transaction(chain: &dyn ChainView, tx_index: &dyn TxIndex, cfg: &ConsensusConfig, tx: &Transaction) -> u64 {
    if tx.is_coinbase() {
        return 0;
    }

    let mut cent_seconds = Uint256::ZERO;
    for input in &tx.vin {
        let (tx_prev, block_hash, _offset) = match tx_index.get_transaction(input.prevout.txid) {
            Some(found) => found,
            None => continue,
        };
        let block_from = match chain.by_hash(block_hash) {
            Some(idx) => idx,
            None => return 0,
        };
        if block_from.block_time as i64 + cfg.stake_min_age > tx.n_time as i64 {
            continue;
        }

        let source_time = if block_from.is_proof_of_stake { tx_prev.n_time as i64 } else { block_from.block_time as i64 };
        if (tx.n_time as i64) < source_time {
            return 0;
        }

        let value_in = match tx_prev.vout.get(input.prevout.index as usize) {
            Some(out) => out.value,
            None => continue,
        };
        let weight = coin_age_weight(source_time, tx.n_time as i64, cfg.stake_min_age, cfg.stake_max_age);
        cent_seconds = cent_seconds + Uint256::from_u64(value_in as u64) * weight as u64 / CENT as u64;
    }

    let coin_days = cent_seconds * CENT as u64 / COIN as u64 / 86_400u64;
    coin_days.0[0]
}

/// Total coin-age spent across every transaction in a block.
pub fn coin_age_of_block(chain: &dyn ChainView, tx_index: &dyn TxIndex, cfg: &ConsensusConfig, transactions: &[Transaction]) -> u64 {
    transactions.iter().map(|tx| coin_age_of_transaction(chain, tx_index, cfg, tx)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coinstake_timestamp_must_equal_block_time() {
        assert!(check_coinstake_timestamp(1_000, 1_000));
        assert!(!check_coinstake_timestamp(1_000, 1_001));
    }

    #[test]
    fn coinbase_has_no_coin_age() {
        use crate::hash_types::Txid;
        use crate::transaction::{OutPoint, TxIn, TxOut};

        struct NullChain;
        impl ChainView for NullChain {
            fn tip(&self) -> crate::chain::BlockIndex {
                unreachable!()
            }
            fn next(&self, _idx: &crate::chain::BlockIndex) -> Option<crate::chain::BlockIndex> {
                None
            }
            fn by_hash(&self, _hash: crate::hash_types::BlockHash) -> Option<crate::chain::BlockIndex> {
                None
            }
            fn height(&self) -> u32 {
                0
            }
        }
        struct NullTxIndex;
        impl TxIndex for NullTxIndex {
            fn get_transaction(&self, _txid: Txid) -> Option<(Transaction, crate::hash_types::BlockHash, u32)> {
                None
            }
        }

        let cfg = ConsensusConfig::for_network(crate::network::Network::Regtest);
        let tx = Transaction {
            n_version: 1,
            n_time: 0,
            vin: vec![TxIn { prevout: OutPoint { txid: Txid::from_byte_array([0; 32]), index: u32::MAX } }],
            vout: vec![TxOut { value: 50 * COIN, script_pub_key: vec![] }],
        };
        assert_eq!(coin_age_of_transaction(&NullChain, &NullTxIndex, &cfg, &tx), 0);
    }
}
