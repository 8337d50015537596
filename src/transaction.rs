// Written in 2024 by the r3vcoin developers
// SPDX-License-Identifier: CC0-1.0

//! Minimal transaction model the kernel reads from. Fields beyond what the
//! kernel actually consumes (script bytes, witness data, version-specific
//! extensions) are deliberately absent; a host node's richer transaction
//! type converts into this view at the call boundary.

use crate::hash_types::Txid;

/// A transaction output being spent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OutPoint {
    pub txid: Txid,
    pub index: u32,
}

/// A transaction input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxIn {
    pub prevout: OutPoint,
}

/// A transaction output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOut {
    /// Value in the smallest unit (satoshi); see [`crate::params::COIN`].
    pub value: i64,
    pub script_pub_key: Vec<u8>,
}

/// A transaction, as read by the kernel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub n_version: i32,
    pub n_time: u32,
    pub vin: Vec<TxIn>,
    pub vout: Vec<TxOut>,
}

impl Transaction {
    /// A coinbase transaction has exactly one input referencing a null
    /// outpoint.
    pub fn is_coinbase(&self) -> bool {
        self.vin.len() == 1 && self.vin[0].prevout.index == u32::MAX
    }

    /// A coinstake transaction is not a coinbase and begins with an empty
    /// marker output followed by the staking payout outputs. Mirrors
    /// `CTransaction::IsCoinStake`.
    pub fn is_coinstake(&self) -> bool {
        !self.is_coinbase() && self.vin.len() >= 1 && self.vout.len() >= 2 && self.vout[0].value == 0 && self.vout[0].script_pub_key.is_empty()
    }
}
