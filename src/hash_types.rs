// Written in 2024 by the r3vcoin developers
// SPDX-License-Identifier: CC0-1.0

//! Hash newtypes shared across the kernel's public surface.

use core::fmt;
use core::str::FromStr;

use bitcoin_hashes::{sha256d, Hash};

macro_rules! sha256d_hash_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(sha256d::Hash);

        impl $name {
            /// Wraps a raw double-SHA256 digest.
            pub fn from_raw_hash(hash: sha256d::Hash) -> Self {
                $name(hash)
            }

            /// Returns the inner double-SHA256 digest.
            pub fn as_raw_hash(&self) -> sha256d::Hash {
                self.0
            }

            /// Returns the digest bytes, internal (little-endian) byte
            /// order.
            pub fn to_byte_array(self) -> [u8; 32] {
                self.0.into_inner()
            }

            /// Builds from internal-order bytes.
            pub fn from_byte_array(bytes: [u8; 32]) -> Self {
                $name(sha256d::Hash::from_inner(bytes))
            }

            /// Hashes `data` with SHA-256d and wraps the result.
            pub fn hash(data: &[u8]) -> Self {
                $name(<sha256d::Hash as Hash>::hash(data))
            }

            /// All-zero placeholder, used for "no previous block" and
            /// similar sentinels.
            pub fn all_zeros() -> Self {
                $name(sha256d::Hash::from_inner([0u8; 32]))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = bitcoin_hashes::hex::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                sha256d::Hash::from_str(s).map($name)
            }
        }

        impl From<sha256d::Hash> for $name {
            fn from(hash: sha256d::Hash) -> Self {
                $name(hash)
            }
        }
    };
}

sha256d_hash_newtype!(BlockHash, "The hash of a block header.");
sha256d_hash_newtype!(Txid, "The hash of a transaction.");
