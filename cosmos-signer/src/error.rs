//! Error types for the cosmos-signer library

use thiserror::Error;

/// Custom error type for key derivation and signing operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid mnemonic length: expected 12, 15, 18, 21 or 24 words, got {0}")]
    InvalidMnemonicLength(usize),

    #[error("Invalid mnemonic word: {0}")]
    InvalidMnemonicWord(String),

    #[error("Mnemonic error: {0}")]
    Mnemonic(String),

    #[error("Seed too short: got {0} bytes, need at least 16")]
    SeedTooShort(usize),

    #[error("Master key derivation exhausted after {0} iterations")]
    MasterKeyDerivationExhausted(u32),

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    #[error("Invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    #[error("Invalid child key at index {0:#010x}")]
    InvalidChildKey(u32),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Signer/account mismatch: {signers} signers but {accounts} accounts")]
    SignerAccountMismatch { signers: usize, accounts: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for cosmos-signer operations
pub type Result<T> = std::result::Result<T, Error>;
