//! Wallet implementation

use tracing::debug;

use super::address::Address;
use crate::config::SignerConfig;
use crate::crypto::keys::{derive_private_key, PrivateKey, PublicKey, Signature};
use crate::crypto::mnemonic::{generate_mnemonic, validate_and_normalize, Mnemonic, MnemonicStrength};
use crate::error::Result;
use crate::transaction::{sign_transaction, TransactionSigner, Tx};

/// A single signing identity: a derived key and its account address
#[derive(Debug, Clone)]
pub struct Wallet {
    private_key: PrivateKey,
    address: Address,
    config: SignerConfig,
}

impl Wallet {
    /// Create a new wallet with a generated mnemonic
    pub fn new(strength: MnemonicStrength, config: &SignerConfig) -> Result<(Self, Mnemonic)> {
        let mnemonic = generate_mnemonic(strength)?;
        let wallet = Self::from_mnemonic(mnemonic.phrase(), "", config)?;
        Ok((wallet, mnemonic))
    }

    /// Create a wallet from an existing mnemonic, deriving the key at the configured path
    pub fn from_mnemonic(phrase: &str, passphrase: &str, config: &SignerConfig) -> Result<Self> {
        config.validate()?;
        let mnemonic = validate_and_normalize(phrase)?;
        let seed = mnemonic.to_seed(passphrase);
        let path = config.path()?;

        let private_key = derive_private_key(seed.as_ref(), &path, config.master_key_max_iterations)?;
        Self::from_private_key(private_key, config)
    }

    /// Create a wallet around an existing key
    pub fn from_private_key(private_key: PrivateKey, config: &SignerConfig) -> Result<Self> {
        let address = Address::from_public_key(private_key.public_key(), &config.address_prefix)?;
        debug!(address = %address, "Opened wallet");

        Ok(Self {
            private_key,
            address,
            config: config.clone(),
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn public_key(&self) -> &PublicKey {
        self.private_key.public_key()
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }
}

impl TransactionSigner for Wallet {
    fn sign_transaction(&self, tx: &mut Tx, chain_id: &str, account_number: u64) -> Result<Signature> {
        Ok(sign_transaction(
            tx,
            &self.private_key,
            chain_id,
            account_number,
            self.config.nonce_mode,
        ))
    }
}
