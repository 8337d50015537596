// Written in 2014 by Andrew Poelstra <apoelstra@wpsoftware.net>
// SPDX-License-Identifier: CC0-1.0

//! Consensus kernel for a hybrid proof-of-work / proof-of-stake-velocity
//! (PoSV) chain in the Bitcoin/Peercoin lineage.
//!
//! This crate implements two tightly coupled subsystems:
//!
//! - **Difficulty retargeting** via the Kimoto Gravity Well algorithm
//!   ([`retarget::next_work_required`]), with distinct PoW and PoSV regimes.
//! - **PoSV validation**: stake-modifier generation ([`modifier`]), the
//!   kernel-hash target check ([`kernel::check_stake_kernel_hash`]),
//!   coin-age weighting ([`aging`]), and coinstake validation
//!   ([`stake::check_proof_of_stake`]).
//!
//! Every operation here is a pure, synchronous function over a
//! [`chain::ChainView`] and a [`params::ConsensusConfig`]; storage,
//! networking, script evaluation, and signature verification are
//! collaborator interfaces the host node supplies (see [`collaborators`]).
//! This crate never panics on attacker-controlled input: every fallible
//! entry point returns a [`error::KernelError`].

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

pub mod aging;
pub mod chain;
pub mod collaborators;
pub mod error;
pub mod hash_types;
pub mod kernel;
pub mod modifier;
pub mod network;
pub mod params;
pub mod pow;
pub mod retarget;
pub mod stake;
pub mod transaction;
pub mod util;

pub use chain::{BlockIndex, ChainView};
pub use collaborators::{BlockStore, Clock, DefaultHasher, Hasher, TxIndex};
pub use error::{ConfigError, KernelError, KernelResult, RejectReason};
pub use hash_types::{BlockHash, Txid};
pub use kernel::{check_stake_kernel_hash, KernelHashProof};
pub use modifier::{compute_next_stake_modifier, get_kernel_stake_modifier};
pub use network::Network;
pub use params::ConsensusConfig;
pub use pow::{check_pow, CompactTarget, Target};
pub use retarget::next_work_required;
pub use stake::{check_coinstake_timestamp, check_proof_of_stake, coin_age_of_block, coin_age_of_transaction};
pub use transaction::{OutPoint, Transaction, TxIn, TxOut};
pub use util::uint::Uint256;
