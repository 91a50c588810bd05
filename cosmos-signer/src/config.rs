//! Signer configuration
//!
//! Defaults suit the Cosmos Hub. Values can be overridden from JSON or from
//! `COSMOS_SIGNER_*` environment variables.

use serde::{Deserialize, Serialize};

use crate::account::DEFAULT_PREFIX;
use crate::crypto::keys::{DerivationPath, NonceMode, MASTER_KEY_MAX_ITERATIONS};
use crate::error::{Error, Result};

/// Default derivation path for Cosmos SDK accounts (coin type 118)
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/118'/0'/0/0";

/// Key derivation and signing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Path used when deriving a wallet key from a mnemonic
    pub derivation_path: String,
    /// Bech32 prefix for account addresses
    pub address_prefix: String,
    /// Nonce selection used by wallet signing
    pub nonce_mode: NonceMode,
    /// Bound on master key re-hashing
    pub master_key_max_iterations: u32,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            address_prefix: DEFAULT_PREFIX.to_string(),
            nonce_mode: NonceMode::Deterministic,
            master_key_max_iterations: MASTER_KEY_MAX_ITERATIONS,
        }
    }
}

impl SignerConfig {
    /// Defaults overlaid with any `COSMOS_SIGNER_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("COSMOS_SIGNER_DERIVATION_PATH") {
            config.derivation_path = path;
        }
        if let Ok(prefix) = std::env::var("COSMOS_SIGNER_ADDRESS_PREFIX") {
            config.address_prefix = prefix;
        }
        if let Ok(mode) = std::env::var("COSMOS_SIGNER_NONCE_MODE") {
            config.nonce_mode = mode.parse()?;
        }
        if let Ok(limit) = std::env::var("COSMOS_SIGNER_MASTER_KEY_MAX_ITERATIONS") {
            config.master_key_max_iterations = limit.parse().map_err(|_| {
                Error::Config(format!("invalid master key iteration limit: {}", limit))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.path()?;
        if self.address_prefix.is_empty() {
            return Err(Error::Config("address prefix must not be empty".to_string()));
        }
        if self.master_key_max_iterations == 0 {
            return Err(Error::Config(
                "master key iteration limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured derivation path, parsed
    pub fn path(&self) -> Result<DerivationPath> {
        self.derivation_path.parse()
    }
}
