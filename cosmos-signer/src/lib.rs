//! Cosmos Signer - key derivation and transaction signing core
//!
//! This library derives secp256k1 keys from BIP39-style mnemonics along
//! fixed-depth BIP-44 paths, and produces deterministic, canonical (low-S)
//! ECDSA signatures over Cosmos SDK sign documents.
//!
//! Transport, protobuf schemas for transaction bodies and key storage live
//! elsewhere: this crate only consumes their serialized bytes.

pub mod error;
pub mod config;
pub mod crypto;
pub mod account;
pub mod transaction;

// Re-export commonly used types for convenience
pub use account::{Address, Wallet};
pub use config::SignerConfig;
pub use crypto::keys::{
    derive_child_key_from_mnemonic, DerivationPath, ExtendedKey, KeyPair, NonceMode, PrivateKey,
    PublicKey, Signature,
};
pub use crypto::mnemonic::{Mnemonic, Seed};
pub use error::{Error, Result};
pub use transaction::{
    build_sign_doc, multi_sign_transaction, sign_doc_hash, sign_transaction, AccountInfo, SignDoc, TransactionSigner, Tx,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
