// Written in 2024 by the r3vcoin developers
// SPDX-License-Identifier: CC0-1.0

//! Network/chain selection.
//!
//! The kernel itself never reads this enum directly — it only ever sees a
//! fully resolved [`crate::params::ConsensusConfig`] — but `Network` is how a
//! host process picks one of the three canonical profiles.

use core::fmt;
use core::str::FromStr;

use crate::error::ConfigError;

/// One of the three canonical chain profiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Network {
    /// Mainnet.
    Main,
    /// Public testnet.
    Test,
    /// Local regression-test network.
    Regtest,
}

impl Network {
    /// All networks, in the canonical order used for array-indexed lookups.
    pub const ALL: [Network; 3] = [Network::Main, Network::Test, Network::Regtest];
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Network::Main => "main",
            Network::Test => "test",
            Network::Regtest => "regtest",
        };
        f.write_str(s)
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" | "mainnet" => Ok(Network::Main),
            "test" | "testnet" => Ok(Network::Test),
            "regtest" => Ok(Network::Regtest),
            other => Err(ConfigError::UnknownNetwork(other.to_owned())),
        }
    }
}
