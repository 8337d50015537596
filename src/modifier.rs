// Written in 2024 by the r3vcoin developers
// SPDX-License-Identifier: CC0-1.0

//! Component C4: the stake modifier engine.
//!
//! The stake modifier is recomputed only at interval boundaries so that an
//! attacker cannot cheaply precompute kernel hashes for many blocks ahead.
//! Each recomputation draws 64 bits of entropy from 64 rounds of a
//! deterministic candidate-selection process over recent block history.

use bitcoin_hashes::Hash as _;

use crate::chain::{BlockIndex, ChainView};
use crate::collaborators::Clock;
use crate::error::{KernelError, RejectReason};
use crate::hash_types::BlockHash;
use crate::params::{ConsensusConfig, MODIFIER_INTERVAL_RATIO};
use crate::util::uint::Uint256;

/// The duration, in seconds, of the `section`-th (of 64) selection round.
/// Front-loaded: earlier rounds get tighter windows than later ones.
pub fn selection_interval_section(section: u32, modifier_interval: u32) -> i64 {
    debug_assert!(section < 64);
    let denom = 63 + (63 - section as i64) * (MODIFIER_INTERVAL_RATIO as i64 - 1);
    (modifier_interval as i64 * 63) / denom
}

/// Total span, in seconds, covered by all 64 selection rounds.
pub fn selection_interval(modifier_interval: u32) -> i64 {
    (0..64).map(|section| selection_interval_section(section, modifier_interval)).sum()
}

/// Walks back from `start` to the nearest ancestor (inclusive) with
/// `generated_stake_modifier = true`, returning its modifier and the block
/// time it was generated at.
fn last_stake_modifier(chain: &dyn ChainView, start: &BlockIndex) -> Result<(u64, i64), RejectReason> {
    let mut idx = start.clone();
    loop {
        if idx.generated_stake_modifier {
            break;
        }
        match idx.prev.and_then(|h| chain.by_hash(h)) {
            Some(p) => idx = p,
            None => break,
        }
    }
    if !idx.generated_stake_modifier {
        return Err(RejectReason::MissingModifier);
    }
    Ok((idx.stake_modifier, idx.block_time as i64))
}

/// The selection hash used to rank a candidate within a round: SHA-256d of
/// `hash_proof || stake_modifier_prev`, right-shifted by 32 bits when the
/// candidate is a proof-of-stake block so that PoS candidates are always
/// preferred over PoW ones.
fn selection_hash(hash_proof: Uint256, stake_modifier_prev: u64, is_proof_of_stake: bool) -> Uint256 {
    let mut buf = [0u8; 40];
    buf[..32].copy_from_slice(&hash_proof.to_le_bytes());
    buf[32..].copy_from_slice(&stake_modifier_prev.to_le_bytes());
    let raw = bitcoin_hashes::sha256d::Hash::hash(&buf).into_inner();
    let hash = Uint256::from_le_bytes(raw);
    if is_proof_of_stake {
        hash.shr(32)
    } else {
        hash
    }
}

/// Selects one block from `candidates` (sorted ascending by `(block_time,
/// hash)`), excluding anything already in `selected`, for round whose
/// selection window ends at `stop`.
fn select_block_from_candidates(candidates: &[BlockIndex], selected: &[BlockHash], stop: i64, stake_modifier_prev: u64) -> Result<BlockIndex, RejectReason> {
    let mut best: Option<(Uint256, BlockIndex)> = None;
    for candidate in candidates {
        if best.is_some() && candidate.block_time as i64 > stop {
            break;
        }
        if selected.contains(&candidate.hash) {
            continue;
        }
        let hash = selection_hash(candidate.hash_proof, stake_modifier_prev, candidate.is_proof_of_stake);
        match &best {
            Some((best_hash, _)) => {
                if hash < *best_hash {
                    best = Some((hash, candidate.clone()));
                }
            }
            None => best = Some((hash, candidate.clone())),
        }
    }
    best.map(|(_, b)| b).ok_or(RejectReason::MissingModifier)
}

/// Component C4: `compute_next_stake_modifier`.
///
/// Returns `(stake_modifier, generated)`. `prev = None` signals the genesis
/// block's child, whose modifier is `0` by definition.
pub fn compute_next_stake_modifier(chain: &dyn ChainView, prev: Option<&BlockIndex>, cfg: &ConsensusConfig) -> Result<(u64, bool), KernelError> {
    let prev = match prev {
        None => return Ok((0, true)),
        Some(p) => p,
    };

    let (stake_modifier_prev, modifier_time) = last_stake_modifier(chain, prev)?;

    let interval = cfg.modifier_interval as i64;
    if modifier_time / interval >= prev.block_time as i64 / interval {
        return Ok((stake_modifier_prev, false));
    }

    let selection_span = selection_interval(cfg.modifier_interval);
    let selection_start = (prev.block_time as i64 / interval) * interval - selection_span;

    let mut candidates: Vec<BlockIndex> = Vec::new();
    let mut cursor = Some(prev.clone());
    while let Some(idx) = cursor {
        if (idx.block_time as i64) < selection_start {
            break;
        }
        cursor = idx.prev.and_then(|h| chain.by_hash(h));
        candidates.push(idx);
    }
    candidates.reverse();
    candidates.sort_by(|a, b| a.block_time.cmp(&b.block_time).then_with(|| a.hash.cmp(&b.hash)));

    let rounds = candidates.len().min(64);
    let mut selected: Vec<BlockHash> = Vec::with_capacity(rounds);
    let mut new_modifier: u64 = 0;
    let mut stop = selection_start;
    for round in 0..rounds as u32 {
        stop += selection_interval_section(round, cfg.modifier_interval);
        let chosen = select_block_from_candidates(&candidates, &selected, stop, stake_modifier_prev)?;
        new_modifier |= (chosen.stake_entropy_bit as u64) << round;
        selected.push(chosen.hash);
    }

    Ok((new_modifier, true))
}

/// Component C4: `get_kernel_stake_modifier`.
///
/// The stake modifier used to hash a kernel is the one in force a full
/// selection interval after the block containing the coin being staked, so
/// an attacker cannot learn it before the coin has matured enough to use
/// it.
pub fn get_kernel_stake_modifier(chain: &dyn ChainView, clock: &dyn Clock, block_from: &BlockIndex, cfg: &ConsensusConfig) -> Result<u64, KernelError> {
    let span = selection_interval(cfg.modifier_interval);
    let mut idx = block_from.clone();
    let mut modifier_time = block_from.block_time as i64;

    while modifier_time < block_from.block_time as i64 + span {
        match chain.next(&idx) {
            Some(next) => {
                modifier_time = next.block_time as i64;
                idx = next;
            }
            None => {
                if block_from.block_time as i64 + cfg.stake_min_age - span > clock.adjusted_now() {
                    return Err(KernelError::from(RejectReason::MissingModifier));
                }
                return Err(KernelError::from(RejectReason::ModifierNotYetMature));
            }
        }
    }

    Ok(idx.stake_modifier)
}
