//! Cryptographic primitives and operations
//!
//! This module provides mnemonic validation and generation, seed and key
//! derivation, and the signing primitives used for transactions.

pub mod hash;
pub mod keys;
pub mod mnemonic;
pub mod wordlist;

pub use keys::*;
pub use mnemonic::*;
pub use wordlist::WordlistResource;
