// Written in 2024 by the r3vcoin developers
// SPDX-License-Identifier: CC0-1.0

//! Component C5: the stake kernel hash check.
//!
//! This is the heart of PoSV: a coinstake's first input ("the kernel")
//! must hash, together with the running stake modifier and a handful of
//! timestamp/position fields, under a target that scales with the coin's
//! value and age. Older, larger, longer-held coins get an easier target,
//! which is what makes staking proportional to coin-age rather than raw
//! balance.

use bitcoin_hashes::Hash as _;

use crate::aging::coin_age_weight;
use crate::chain::{BlockIndex, ChainView};
use crate::collaborators::Clock;
use crate::error::{KernelError, RejectReason};
use crate::modifier::get_kernel_stake_modifier;
use crate::params::{ConsensusConfig, COIN};
use crate::pow::{CompactTarget, Target};
use crate::transaction::{OutPoint, Transaction};
use crate::util::uint::Uint256;

/// The hash-of-stake and the target it was checked against. Returned even
/// though [`check_stake_kernel_hash`] also returns `Err` on a miss, so
/// callers that want to log the near-miss margin have both values without
/// recomputing anything.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KernelHashProof {
    pub hash_proof: Uint256,
    pub target: Uint256,
}

/// Component C5: `check_stake_kernel_hash`.
///
/// `block_from` is the block containing `tx_prev`; `tx_prev_offset` is
/// `tx_prev`'s serialized byte offset within that block (part of the hash
/// input, purely to spread out otherwise-identical candidates).
pub fn check_stake_kernel_hash(
    chain: &dyn ChainView,
    clock: &dyn Clock,
    cfg: &ConsensusConfig,
    n_bits: CompactTarget,
    block_from: &BlockIndex,
    tx_prev_offset: u32,
    tx_prev: &Transaction,
    prevout: OutPoint,
    n_time_tx: u32,
) -> Result<KernelHashProof, KernelError> {
    let t_from = block_from.block_time;
    let t_prev = if tx_prev.n_time == 0 { t_from } else { tx_prev.n_time };

    if n_time_tx < t_prev {
        return Err(KernelError::from(RejectReason::TimeTravel));
    }
    if (t_from as i64) + cfg.stake_min_age > n_time_tx as i64 {
        return Err(KernelError::from(RejectReason::CoinTooYoung));
    }

    let target_per_coin_day = Target::from_compact(n_bits)?.0;
    let value_in = tx_prev
        .vout
        .get(prevout.index as usize)
        .ok_or(KernelError::from(RejectReason::MalformedCoinstake))?
        .value;
    let weight = coin_age_weight(t_prev as i64, n_time_tx as i64, cfg.stake_min_age, cfg.stake_max_age);
    let coin_day_weight = Uint256::from_u64(value_in as u64) * weight as u64 / COIN as u64 / 86_400u64;
    let target = coin_day_weight * target_per_coin_day;

    let modifier = get_kernel_stake_modifier(chain, clock, block_from, cfg)?;

    let mut buf = [0u8; 28];
    buf[0..8].copy_from_slice(&modifier.to_le_bytes());
    buf[8..12].copy_from_slice(&t_from.to_le_bytes());
    buf[12..16].copy_from_slice(&tx_prev_offset.to_le_bytes());
    buf[16..20].copy_from_slice(&t_prev.to_le_bytes());
    buf[20..24].copy_from_slice(&prevout.index.to_le_bytes());
    buf[24..28].copy_from_slice(&n_time_tx.to_le_bytes());
    let raw = bitcoin_hashes::sha256d::Hash::hash(&buf).into_inner();
    let hash_proof = Uint256::from_le_bytes(raw);

    log::debug!("stake kernel check: hash_proof={} target={}", hash_proof, target);

    if hash_proof > target {
        return Err(KernelError::from(RejectReason::KernelTargetMiss));
    }

    Ok(KernelHashProof { hash_proof, target })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_types::BlockHash;
    use crate::network::Network;
    use crate::transaction::TxOut;
    use std::collections::HashMap;

    struct FixtureChain(HashMap<BlockHash, BlockIndex>, Vec<BlockHash>);

    impl ChainView for FixtureChain {
        fn tip(&self) -> BlockIndex {
            self.0[self.1.last().unwrap()].clone()
        }
        fn next(&self, idx: &BlockIndex) -> Option<BlockIndex> {
            let pos = self.1.iter().position(|h| *h == idx.hash)?;
            self.1.get(pos + 1).map(|h| self.0[h].clone())
        }
        fn by_hash(&self, hash: BlockHash) -> Option<BlockIndex> {
            self.0.get(&hash).cloned()
        }
        fn height(&self) -> u32 {
            self.1.len() as u32 - 1
        }
    }

    struct FixedClock(i64);
    impl Clock for FixedClock {
        fn adjusted_now(&self) -> i64 {
            self.0
        }
    }

    fn make_chain(cfg: &ConsensusConfig) -> (FixtureChain, BlockIndex) {
        let span = crate::modifier::selection_interval(cfg.modifier_interval);
        let source = BlockIndex {
            hash: BlockHash::hash(b"source"),
            height: 0,
            prev: None,
            block_time: 1_000,
            n_bits: CompactTarget::from_consensus(0x1e0f_ffff),
            stake_modifier: 0xdead_beef,
            generated_stake_modifier: true,
            stake_entropy_bit: 0,
            hash_proof: Uint256::from_u64(1),
            is_proof_of_stake: false,
        };
        let mature = BlockIndex {
            hash: BlockHash::hash(b"mature"),
            height: 1,
            prev: Some(source.hash),
            block_time: 1_000 + span + 10,
            n_bits: CompactTarget::from_consensus(0x1e0f_ffff),
            stake_modifier: 0xabcd,
            generated_stake_modifier: false,
            stake_entropy_bit: 0,
            hash_proof: Uint256::from_u64(2),
            is_proof_of_stake: false,
        };
        let mature_hash = mature.hash;
        let mut map = HashMap::new();
        map.insert(source.hash, source.clone());
        map.insert(mature_hash, mature);
        let order = vec![source.hash, mature_hash];
        (FixtureChain(map, order), source)
    }

    #[test]
    fn rejects_time_travel() {
        let cfg = ConsensusConfig::for_network(Network::Regtest);
        let (chain, source) = make_chain(&cfg);
        let clock = FixedClock(i64::MAX);
        let tx_prev = Transaction {
            n_version: 1,
            n_time: 2_000,
            vin: vec![],
            vout: vec![TxOut { value: 1_000 * COIN, script_pub_key: vec![] }],
        };
        let err = check_stake_kernel_hash(
            &chain,
            &clock,
            &cfg,
            CompactTarget::from_consensus(0x1e0f_ffff),
            &source,
            0,
            &tx_prev,
            OutPoint { txid: crate::hash_types::Txid::from_byte_array([1; 32]), index: 0 },
            1_999,
        )
        .unwrap_err();
        assert!(matches!(err, KernelError::ConsensusRejection(RejectReason::TimeTravel)));
    }

    #[test]
    fn rejects_coins_younger_than_min_age() {
        let cfg = ConsensusConfig::for_network(Network::Regtest);
        let (chain, source) = make_chain(&cfg);
        let clock = FixedClock(i64::MAX);
        let tx_prev = Transaction {
            n_version: 1,
            n_time: 1_000,
            vin: vec![],
            vout: vec![TxOut { value: 1_000 * COIN, script_pub_key: vec![] }],
        };
        let err = check_stake_kernel_hash(
            &chain,
            &clock,
            &cfg,
            CompactTarget::from_consensus(0x1e0f_ffff),
            &source,
            0,
            &tx_prev,
            OutPoint { txid: crate::hash_types::Txid::from_byte_array([1; 32]), index: 0 },
            1_000 + cfg.stake_min_age as u32 - 1,
        )
        .unwrap_err();
        assert!(matches!(err, KernelError::ConsensusRejection(RejectReason::CoinTooYoung)));
    }

    #[test]
    fn rejects_out_of_range_prevout_index() {
        let cfg = ConsensusConfig::for_network(Network::Regtest);
        let (chain, source) = make_chain(&cfg);
        let clock = FixedClock(i64::MAX);
        let tx_prev = Transaction { n_version: 1, n_time: 1_000, vin: vec![], vout: vec![] };
        let err = check_stake_kernel_hash(
            &chain,
            &clock,
            &cfg,
            CompactTarget::from_consensus(0x1e0f_ffff),
            &source,
            0,
            &tx_prev,
            OutPoint { txid: crate::hash_types::Txid::from_byte_array([1; 32]), index: 0 },
            1_000 + cfg.stake_min_age as u32 + 10,
        )
        .unwrap_err();
        assert!(matches!(err, KernelError::ConsensusRejection(RejectReason::MalformedCoinstake)));
    }
}
