// Written in 2024 by the r3vcoin developers
// SPDX-License-Identifier: CC0-1.0

//! Component C7: the Kimoto Gravity Well difficulty retargeter.
//!
//! KGW looks back over a variable window of recent blocks (bounded by
//! `past_blocks_min`/`past_blocks_max`) and breaks out early once the
//! actual block rate deviates from the target rate by more than an
//! "event horizon" that loosens as the window grows. The window-average
//! computation below preserves a quirk in how the running average is
//! re-derived each iteration (`PastDifficultyAverage` is rebuilt from
//! `PastDifficultyAveragePrev` rather than carried forward additively) —
//! bit-for-bit behavioural parity matters more than algebraic tidiness
//! here, since every node must derive the same target.

use crate::chain::{BlockIndex, ChainView};
use crate::params::ConsensusConfig;
use crate::pow::{CompactTarget, Target};
use crate::util::uint::Uint256;

const PAST_BLOCKS_MAX_SECONDS: i64 = 7 * 24 * 60 * 60;

fn kimoto_gravity_well(chain: &dyn ChainView, last: &BlockIndex, target_spacing: u32, past_blocks_min: u64, past_blocks_max: u64, cfg: &ConsensusConfig) -> CompactTarget {
    let is_proof_of_stake = last.height >= cfg.last_pow_height;

    if !is_proof_of_stake {
        return Target(cfg.pow_limit).to_compact();
    }

    let height_since_pow = (last.height - cfg.last_pow_height) as u64;
    if height_since_pow < past_blocks_min {
        // Difficulty resets hard for the first `past_blocks_min` PoSV
        // blocks; there isn't enough PoSV history yet to average over.
        let reset = Uint256::from_be_bytes({
            let mut bytes = [0xffu8; 32];
            bytes[0..4].copy_from_slice(&[0x00, 0x00, 0x00, 0x00]);
            bytes
        });
        return Target(reset).to_compact();
    }

    let mut past_blocks_mass: u64 = 0;
    let mut past_difficulty_average = Uint256::ZERO;
    let mut past_difficulty_average_prev = Uint256::ZERO;
    let mut past_rate_actual_seconds: i64 = 0;
    let mut past_rate_target_seconds: i64 = 0;

    let mut reading = last.clone();
    let mut i: u64 = 1;
    loop {
        if reading.height <= cfg.last_pow_height {
            break;
        }
        if past_blocks_max > 0 && i > past_blocks_max {
            break;
        }
        past_blocks_mass += 1;

        let block_difficulty = Target::from_compact(reading.n_bits).map(|t| t.0).unwrap_or(Uint256::ZERO);
        if i == 1 {
            past_difficulty_average = block_difficulty;
        } else {
            let block_difficulty_average = block_difficulty / i;
            let mut avg = past_difficulty_average_prev * (i - 1);
            avg = avg / i;
            past_difficulty_average = block_difficulty_average + avg;
        }
        past_difficulty_average_prev = past_difficulty_average;

        past_rate_actual_seconds = last.block_time as i64 - reading.block_time as i64;
        past_rate_target_seconds = target_spacing as i64 * past_blocks_mass as i64;
        if past_rate_actual_seconds < 0 {
            past_rate_actual_seconds = 0;
        }

        let past_rate_adjustment_ratio = if past_rate_actual_seconds != 0 && past_rate_target_seconds != 0 {
            past_rate_target_seconds as f64 / past_rate_actual_seconds as f64
        } else {
            1.0
        };

        let event_horizon_deviation = 1.0 + 0.7084 * (past_blocks_mass as f64 / 144.0).powf(-1.228);
        let event_horizon_deviation_fast = event_horizon_deviation;
        let event_horizon_deviation_slow = 1.0 / event_horizon_deviation;

        if past_blocks_mass >= past_blocks_min && (past_rate_adjustment_ratio <= event_horizon_deviation_slow || past_rate_adjustment_ratio >= event_horizon_deviation_fast) {
            break;
        }

        match reading.prev.and_then(|h| chain.by_hash(h)) {
            Some(p) => reading = p,
            None => break,
        }
        i += 1;
    }

    if past_rate_actual_seconds != 0 && past_rate_target_seconds != 0 {
        past_difficulty_average = past_difficulty_average * (past_rate_actual_seconds as u64);
        past_difficulty_average = past_difficulty_average / (past_rate_target_seconds as u64);
    }

    let clamped = if past_difficulty_average > cfg.pos_limit { cfg.pos_limit } else { past_difficulty_average };
    Target(clamped).to_compact()
}

/// Component C7: `next_work_required`.
///
/// Returns the `nBits` the next block after `last` must satisfy. `last =
/// None` signals the genesis block's child.
pub fn next_work_required(chain: &dyn ChainView, last: Option<&BlockIndex>, cfg: &ConsensusConfig) -> CompactTarget {
    let last = match last {
        None => return Target(cfg.pow_limit).to_compact(),
        Some(l) => l,
    };

    if cfg.allow_min_difficulty {
        return if last.height < cfg.last_pow_height { Target(cfg.pow_limit).to_compact() } else { Target(cfg.pos_limit).to_compact() };
    }

    let past_seconds_min = cfg.stake_min_age;
    let past_seconds_max = PAST_BLOCKS_MAX_SECONDS;
    let past_blocks_min = (past_seconds_min / cfg.pow_target_spacing as i64).max(0) as u64;
    let past_blocks_max = (past_seconds_max / cfg.pow_target_spacing as i64).max(0) as u64;

    kimoto_gravity_well(chain, last, cfg.pow_target_spacing, past_blocks_min, past_blocks_max, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_types::BlockHash;
    use crate::network::Network;
    use std::collections::HashMap;

    struct FixtureChain(HashMap<BlockHash, BlockIndex>);
    impl ChainView for FixtureChain {
        fn tip(&self) -> BlockIndex {
            unreachable!()
        }
        fn next(&self, _idx: &BlockIndex) -> Option<BlockIndex> {
            None
        }
        fn by_hash(&self, hash: BlockHash) -> Option<BlockIndex> {
            self.0.get(&hash).cloned()
        }
        fn height(&self) -> u32 {
            0
        }
    }

    fn chained_blocks(cfg: &ConsensusConfig, count: u32, spacing: u32, bits: u32) -> (FixtureChain, BlockIndex) {
        let mut map = HashMap::new();
        let mut prev_hash = None;
        let mut last = None;
        for i in 0..count {
            let height = cfg.last_pow_height + i;
            let b = BlockIndex {
                hash: BlockHash::hash(&height.to_le_bytes()),
                height,
                prev: prev_hash,
                block_time: i * spacing,
                n_bits: CompactTarget::from_consensus(bits),
                stake_modifier: 0,
                generated_stake_modifier: false,
                stake_entropy_bit: 0,
                hash_proof: Uint256::ZERO,
                is_proof_of_stake: true,
            };
            prev_hash = Some(b.hash);
            map.insert(b.hash, b.clone());
            last = Some(b);
        }
        (FixtureChain(map), last.unwrap())
    }

    #[test]
    fn genesis_child_uses_pow_limit() {
        let cfg = ConsensusConfig::for_network(Network::Regtest);
        let chain = FixtureChain(HashMap::new());
        let bits = next_work_required(&chain, None, &cfg);
        assert_eq!(bits, Target(cfg.pow_limit).to_compact());
    }

    #[test]
    fn no_retargeting_flag_is_not_consulted_by_next_work_required() {
        // `no_retargeting` is a reserved config field (see SPEC_FULL.md §4.7);
        // regtest's behavior is governed by `allow_min_difficulty` alone, the
        // same as it would be with the flag unset.
        let mut cfg = ConsensusConfig::for_network(Network::Regtest);
        assert!(cfg.no_retargeting);
        assert!(cfg.allow_min_difficulty);
        let (chain, tip) = chained_blocks(&cfg, 3, cfg.pow_target_spacing, 0x1f00_ffff);
        let with_flag = next_work_required(&chain, Some(&tip), &cfg);
        cfg.no_retargeting = false;
        let without_flag = next_work_required(&chain, Some(&tip), &cfg);
        assert_eq!(with_flag, without_flag);
        assert_eq!(with_flag, Target(cfg.pos_limit).to_compact());
    }

    #[test]
    fn pow_phase_before_last_pow_height_uses_pow_limit() {
        let cfg = ConsensusConfig::for_network(Network::Main);
        let chain = FixtureChain(HashMap::new());
        let early = BlockIndex {
            hash: BlockHash::hash(b"early"),
            height: cfg.last_pow_height - 1,
            prev: None,
            block_time: 0,
            n_bits: CompactTarget::from_consensus(0x1e0f_ffff),
            stake_modifier: 0,
            generated_stake_modifier: true,
            stake_entropy_bit: 0,
            hash_proof: Uint256::ZERO,
            is_proof_of_stake: false,
        };
        let bits = next_work_required(&chain, Some(&early), &cfg);
        assert_eq!(bits, Target(cfg.pow_limit).to_compact());
    }

    #[test]
    fn steady_spacing_converges_within_a_compact_ulp() {
        let mut cfg = ConsensusConfig::for_network(Network::Main);
        cfg.allow_min_difficulty = false;
        let bits_in = 0x1e0f_ffff;
        let (chain, tip) = chained_blocks(&cfg, 600, cfg.pow_target_spacing, bits_in);
        let out = next_work_required(&chain, Some(&tip), &cfg);
        let in_target = Target::from_compact(CompactTarget::from_consensus(bits_in)).unwrap().0;
        let out_target = Target::from_compact(out).unwrap().0;
        let diff = if in_target > out_target { in_target - out_target } else { out_target - in_target };
        assert!(diff.to_f64() / in_target.to_f64() < 0.05);
    }
}
