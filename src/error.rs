// Written in 2024 by the r3vcoin developers
// SPDX-License-Identifier: CC0-1.0

//! Error types returned by the consensus kernel.
//!
//! The kernel never panics on attacker-controlled input and never aborts the
//! process. Every fallible entry point returns a [`KernelError`] which the
//! caller maps onto its own block-acceptance policy (orphan/retry vs.
//! ban/drop).

use core::fmt;

/// Top-level error returned by kernel operations.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum KernelError {
    /// The requested network name is not one of `main`/`test`/`regtest`, or a
    /// supplied [`crate::params::ConsensusConfig`] is internally inconsistent.
    /// Fatal: callers should refuse to start rather than retry.
    Config(ConfigError),
    /// A block or transaction the kernel needed was not found through the
    /// `tx-index`/`block-store` collaborators. Non-fatal: the caller should
    /// treat the referencing block as an orphan and retry once the data
    /// becomes available.
    DataUnavailable(&'static str),
    /// The input failed a consensus rule. The block MUST be rejected (and,
    /// depending on policy, the originating peer penalized).
    ConsensusRejection(RejectReason),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::Config(e) => write!(f, "consensus configuration error: {}", e),
            KernelError::DataUnavailable(what) => write!(f, "data unavailable: {}", what),
            KernelError::ConsensusRejection(r) => write!(f, "consensus rejection: {}", r),
        }
    }
}

impl std::error::Error for KernelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KernelError::Config(e) => Some(e),
            KernelError::DataUnavailable(_) => None,
            KernelError::ConsensusRejection(_) => None,
        }
    }
}

impl From<ConfigError> for KernelError {
    fn from(e: ConfigError) -> Self {
        KernelError::Config(e)
    }
}

impl From<RejectReason> for KernelError {
    fn from(e: RejectReason) -> Self {
        KernelError::ConsensusRejection(e)
    }
}

/// Fatal configuration errors, raised at process start-up.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The network name passed to [`crate::network::Network::from_str`] is not
    /// `"main"`, `"test"`, or `"regtest"`.
    UnknownNetwork(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownNetwork(name) => write!(f, "unknown network `{}`", name),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Why a consensus check rejected its input.
///
/// This is deliberately granular: a caller banning peers wants to tell a
/// too-young stake apart from a bad signature.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum RejectReason {
    /// Compact-target decoding produced a negative, zero, or overflowed
    /// value, or a value exceeding the network's PoW/PoS limit.
    BadTarget,
    /// `check_pow`: block hash exceeds its claimed target.
    PowTargetMiss,
    /// `check_stake_kernel_hash`: `n_time_tx < t_prev` (I3-adjacent nTime
    /// violation on the spending side).
    TimeTravel,
    /// `check_stake_kernel_hash`: the coin has not reached `stake_min_age`.
    CoinTooYoung,
    /// `check_stake_kernel_hash`: hash-of-stake exceeds the coin-weighted
    /// target.
    KernelTargetMiss,
    /// `check_proof_of_stake`: the transaction is not a well-formed
    /// coinstake (wrong input/output shape).
    MalformedCoinstake,
    /// `check_proof_of_stake`: input signature does not verify against the
    /// referenced output's `script_pub_key`.
    BadSignature,
    /// I3: coinstake `n_time` does not equal the block's `n_time`.
    CoinstakeTimestampMismatch,
    /// `compute_next_stake_modifier`/`get_kernel_stake_modifier`: no
    /// ancestor with `generated_stake_modifier = true` was found, or the
    /// kernel modifier lookup could not find a qualifying descendant and the
    /// coin is old enough that this is a protocol violation rather than
    /// "not yet mature".
    MissingModifier,
    /// `get_kernel_stake_modifier`: the coin is too young relative to the
    /// current chain tip to have a modifier yet. Non-fatal in the sense that
    /// it signals "try again once the chain has grown", but surfaced as a
    /// rejection because the caller asked for a modifier *now*.
    ModifierNotYetMature,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            RejectReason::BadTarget => "compact target is negative, zero, overflowed, or out of range",
            RejectReason::PowTargetMiss => "proof-of-work hash does not meet target",
            RejectReason::TimeTravel => "nTime violation: spend time precedes previous output's time",
            RejectReason::CoinTooYoung => "stake input has not reached minimum age",
            RejectReason::KernelTargetMiss => "stake kernel hash does not meet coin-weighted target",
            RejectReason::MalformedCoinstake => "malformed coinstake transaction",
            RejectReason::BadSignature => "coinstake input signature does not verify",
            RejectReason::CoinstakeTimestampMismatch => "coinstake nTime does not match block nTime",
            RejectReason::MissingModifier => "no generated stake modifier found on ancestor chain",
            RejectReason::ModifierNotYetMature => "stake is not yet mature enough to resolve a kernel modifier",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for RejectReason {}

/// Convenience alias used throughout the kernel.
pub type KernelResult<T> = Result<T, KernelError>;
