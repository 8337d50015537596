// Written in 2024 by the r3vcoin developers
// SPDX-License-Identifier: CC0-1.0

//! Component C3: the immutable consensus configuration consumed by every
//! other component.

use crate::network::Network;
use crate::pow::{CompactTarget, Target};
use crate::util::uint::Uint256;

/// Network parameters governing PoW/PoSV validation, difficulty
/// retargeting, and stake-modifier generation.
///
/// Constructed once per process (via [`ConsensusConfig::for_network`]) and
/// passed by reference into every kernel entry point. The kernel never
/// mutates it and never reads environment or global state instead of it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsensusConfig {
    pub subsidy_halving_interval: u32,
    /// Target spacing between blocks, in seconds.
    pub pow_target_spacing: u32,
    /// Retained for API parity with non-KGW forks; KGW has no fixed
    /// timespan window of its own.
    pub pow_target_timespan: u32,
    /// Maximum (easiest) PoW target.
    pub pow_limit: Uint256,
    /// Maximum (easiest) PoS target.
    pub pos_limit: Uint256,
    /// Minimum coin age, in seconds, before a UTXO is eligible to stake.
    pub stake_min_age: i64,
    /// Coin-age weighting ceiling, in seconds.
    pub stake_max_age: i64,
    /// Inclusive height above which only PoS blocks are valid.
    pub last_pow_height: u32,
    /// Stake modifier recomputation period, in seconds.
    pub modifier_interval: u32,
    /// Whether a long quiet spell may fall back to the network's easiest
    /// allowed target rather than keep the last block's target.
    pub allow_min_difficulty: bool,
    /// When set, `next_work_required` returns the previous block's target
    /// unchanged, bypassing KGW. Only `regtest` sets this.
    pub no_retargeting: bool,
}

/// Modifier-interval-to-selection-interval ratio used by the stake modifier
/// engine (component C4). Fixed at 3 across every profile.
pub const MODIFIER_INTERVAL_RATIO: u32 = 3;

/// One Bitcoin-style "coin" in the smallest (satoshi) unit.
pub const COIN: i64 = 100_000_000;

/// One hundredth of a [`COIN`], the unit `coin_age_of_transaction` and
/// `coin_age_of_block` accumulate intermediate cent-seconds in.
pub const CENT: i64 = COIN / 100;

fn decode(compact: u32) -> Uint256 {
    Target::from_compact(CompactTarget::from_consensus(compact))
        .expect("hard-coded consensus limit must decode")
        .0
}

impl ConsensusConfig {
    /// Returns the canonical parameter set for `network`.
    ///
    /// Literal values are resolved from the chain's original parameter
    /// tables; `pow_target_spacing` is not otherwise pinned down for every
    /// profile and is set to 60 seconds across all three here.
    pub fn for_network(network: Network) -> ConsensusConfig {
        match network {
            Network::Main => ConsensusConfig {
                subsidy_halving_interval: 4_200_000,
                pow_target_spacing: 60,
                pow_target_timespan: 300 * 63,
                pow_limit: decode(0x1e0f_ffff),
                pos_limit: decode(0x1e0f_ffff),
                stake_min_age: 10_800,
                stake_max_age: 3_888_000,
                last_pow_height: 200,
                modifier_interval: 300,
                allow_min_difficulty: false,
                no_retargeting: false,
            },
            Network::Test => ConsensusConfig {
                subsidy_halving_interval: 4_200_000,
                pow_target_spacing: 60,
                pow_target_timespan: 300 * 63,
                pow_limit: decode(0x1e0f_ffff),
                pos_limit: decode(0x1e0f_ffff),
                stake_min_age: 10_800,
                stake_max_age: 3_888_000,
                last_pow_height: 200,
                modifier_interval: 300,
                allow_min_difficulty: true,
                no_retargeting: false,
            },
            Network::Regtest => ConsensusConfig {
                subsidy_halving_interval: 150,
                pow_target_spacing: 60,
                pow_target_timespan: 60 * 63,
                pow_limit: decode(0x207f_ffff),
                pos_limit: decode(0x207f_ffff),
                stake_min_age: 60,
                stake_max_age: 3_888_000,
                last_pow_height: 10,
                modifier_interval: 60,
                allow_min_difficulty: true,
                no_retargeting: true,
            },
        }
    }
}
