// Written in 2024 by the r3vcoin developers
// SPDX-License-Identifier: CC0-1.0

//! Miscellaneous utility types shared across the kernel.

pub mod uint;
