//! Account management functionality
//!
//! This module provides bech32 account addresses and wallets that bind a
//! derived signing key to its address.

mod address;
mod wallet;

pub use address::*;
pub use wallet::*;
