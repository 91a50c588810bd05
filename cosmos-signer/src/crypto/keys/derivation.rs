//! BIP-32 style hierarchical deterministic key derivation over secp256k1

use std::fmt;

use hmac::{Hmac, Mac};
use secp256k1::{PublicKey as Secp256k1PublicKey, Scalar, Secp256k1, SecretKey};
use sha2::Sha512;
use tracing::{debug, trace, warn};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::path::{is_hardened, DerivationPath, PATH_DEPTH};
use super::private_key::PrivateKey;
use crate::crypto::mnemonic::validate_and_normalize;
use crate::error::{Error, Result};

type HmacSha512 = Hmac<Sha512>;

/// HMAC key used to derive the master key from a seed
const MASTER_KEY_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Shortest seed accepted for master key derivation
pub const MIN_SEED_LENGTH: usize = 16;

/// Upper bound on master key re-hashing before giving up.
///
/// Each attempt fails with probability below 2^-127, so the bound is never
/// reached for real seeds.
pub const MASTER_KEY_MAX_ITERATIONS: u32 = 1024;

/// A private scalar and its chain code
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ExtendedKey {
    private_key: [u8; 32],
    chain_code: [u8; 32],
}

impl ExtendedKey {
    /// Build an extended key, checking that the scalar is in `[1, n-1]`
    pub fn new(private_key: [u8; 32], chain_code: [u8; 32]) -> Result<Self> {
        if SecretKey::from_slice(&private_key).is_err() {
            return Err(Error::InvalidPrivateKey(
                "scalar is zero or not below the curve order".to_string(),
            ));
        }
        Ok(Self { private_key, chain_code })
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Turn the scalar into a signing key
    pub fn to_private_key(&self) -> Result<PrivateKey> {
        PrivateKey::from_bytes(&self.private_key)
    }

    fn secret_key(&self) -> Result<SecretKey> {
        SecretKey::from_slice(&self.private_key)
            .map_err(|e| Error::KeyDerivation(format!("Invalid parent key: {}", e)))
    }

    pub fn derive_child(&self, index: u32) -> Result<ExtendedKey> {
        derive_child(self, index)
    }

    pub fn derive_path(&self, path: &[u32; PATH_DEPTH]) -> Result<ExtendedKey> {
        derive_path(self, path)
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExtendedKey(..)")
    }
}

/// Calculate HMAC-SHA512, splitting the output into its left and right halves
fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<Zeroizing<[u8; 64]>> {
    let mut hmac = HmacSha512::new_from_slice(key)
        .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))?;
    hmac.update(data);

    let mut output = Zeroizing::new([0u8; 64]);
    output.copy_from_slice(&hmac.finalize().into_bytes());
    Ok(output)
}

fn split_halves(output: &[u8; 64]) -> ([u8; 32], [u8; 32]) {
    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&output[..32]);
    right.copy_from_slice(&output[32..]);
    (left, right)
}

/// Derive the master key from a seed
pub fn derive_master_key(seed: &[u8]) -> Result<ExtendedKey> {
    derive_master_key_bounded(seed, MASTER_KEY_MAX_ITERATIONS)
}

/// Derive the master key from a seed, re-hashing at most `max_iterations` times.
///
/// When the left half of the HMAC output is not a valid scalar, the whole
/// 64-byte output becomes the data of the next round.
pub fn derive_master_key_bounded(seed: &[u8], max_iterations: u32) -> Result<ExtendedKey> {
    if seed.len() < MIN_SEED_LENGTH {
        return Err(Error::SeedTooShort(seed.len()));
    }

    let mut data = Zeroizing::new(seed.to_vec());
    for attempt in 0..max_iterations {
        let output = hmac_sha512(MASTER_KEY_HMAC_KEY, &data)?;
        let (mut private_key, mut chain_code) = split_halves(&output);

        if let Ok(key) = ExtendedKey::new(private_key, chain_code) {
            debug!(attempts = attempt + 1, "Derived master key");
            private_key.zeroize();
            chain_code.zeroize();
            return Ok(key);
        }

        warn!(attempt, "Master key candidate out of range, re-hashing");
        private_key.zeroize();
        chain_code.zeroize();
        data = Zeroizing::new(output.to_vec());
    }

    Err(Error::MasterKeyDerivationExhausted(max_iterations))
}

/// Derive a child key from a parent key
pub fn derive_child(parent: &ExtendedKey, index: u32) -> Result<ExtendedKey> {
    let secp = Secp256k1::signing_only();
    let parent_secret_key = parent.secret_key()?;

    let mut data = Zeroizing::new(Vec::with_capacity(37));
    if is_hardened(index) {
        data.push(0);
        data.extend_from_slice(&parent.private_key);
    } else {
        let parent_public_key = Secp256k1PublicKey::from_secret_key(&secp, &parent_secret_key);
        data.extend_from_slice(&parent_public_key.serialize());
    }
    data.extend_from_slice(&index.to_be_bytes());

    let output = hmac_sha512(&parent.chain_code, &data)?;
    let (mut tweak, chain_code) = split_halves(&output);

    // (IL + k) mod n; IL >= n or a zero sum cannot be used as a key
    let scalar = Scalar::from_be_bytes(tweak).map_err(|_| Error::InvalidChildKey(index));
    tweak.zeroize();
    let child_secret_key = parent_secret_key
        .add_tweak(&scalar?)
        .map_err(|_| Error::InvalidChildKey(index))?;

    trace!(index, hardened = is_hardened(index), "Derived child key");
    Ok(ExtendedKey {
        private_key: child_secret_key.secret_bytes(),
        chain_code,
    })
}

/// Walk all five path levels starting from `master`
pub fn derive_path(master: &ExtendedKey, path: &[u32; PATH_DEPTH]) -> Result<ExtendedKey> {
    let mut key = master.clone();
    for &index in path {
        key = derive_child(&key, index)?;
    }
    Ok(key)
}

/// Derive the private key for `path` from a seed
pub fn derive_private_key(
    seed: &[u8],
    path: &DerivationPath,
    max_iterations: u32,
) -> Result<PrivateKey> {
    let master = derive_master_key_bounded(seed, max_iterations)?;
    let leaf = derive_path(&master, path.indices())?;
    debug!(path = %path, "Derived private key");
    leaf.to_private_key()
}

/// Derive the leaf private scalar for a mnemonic, path and passphrase
pub fn derive_child_key_from_mnemonic(
    mnemonic: &str,
    path: &str,
    passphrase: &str,
) -> Result<Zeroizing<[u8; 32]>> {
    let mnemonic = validate_and_normalize(mnemonic)?;
    let path: DerivationPath = path.parse()?;
    let seed = mnemonic.to_seed(passphrase);

    let key = derive_private_key(seed.as_ref(), &path, MASTER_KEY_MAX_ITERATIONS)?;
    Ok(key.to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::path::HARDENED_BIT;

    const BIP32_SEED: &str = "000102030405060708090a0b0c0d0e0f";

    #[test]
    fn test_master_key_vector() {
        let seed = hex::decode(BIP32_SEED).unwrap();
        let master = derive_master_key(&seed).unwrap();
        assert_eq!(
            hex::encode(master.private_key()),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::encode(master.chain_code()),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
    }

    #[test]
    fn test_path_vector() {
        let seed = hex::decode(BIP32_SEED).unwrap();
        let master = derive_master_key(&seed).unwrap();
        let path = [HARDENED_BIT, 1, 2 | HARDENED_BIT, 2, 1_000_000_000];
        let leaf = master.derive_path(&path).unwrap();
        assert_eq!(
            hex::encode(leaf.private_key()),
            "471b76e389e528d6de6d816857e012c5455051cad6660850e58372a6c3e6e7c8"
        );
        assert_eq!(
            hex::encode(leaf.chain_code()),
            "c783e67b921d2beb8f6b389cc646d7263b4145701dadd2161548a8b078e65e9e"
        );
    }

    #[test]
    fn test_seed_too_short() {
        assert_eq!(
            derive_master_key(&[0u8; 15]).unwrap_err(),
            Error::SeedTooShort(15)
        );
        assert!(derive_master_key(&[0u8; 16]).is_ok());
    }

    #[test]
    fn test_retry_bound_is_enforced() {
        let seed = hex::decode(BIP32_SEED).unwrap();
        assert_eq!(
            derive_master_key_bounded(&seed, 0).unwrap_err(),
            Error::MasterKeyDerivationExhausted(0)
        );
        assert!(derive_master_key_bounded(&seed, 1).is_ok());
    }

    #[test]
    fn test_hardened_and_normal_children_differ() {
        let seed = hex::decode(BIP32_SEED).unwrap();
        let master = derive_master_key(&seed).unwrap();
        let normal = master.derive_child(0).unwrap();
        let hardened = master.derive_child(HARDENED_BIT).unwrap();
        assert_ne!(normal.private_key(), hardened.private_key());
        assert_ne!(normal.chain_code(), hardened.chain_code());
    }

    #[test]
    fn test_extended_key_rejects_zero_scalar() {
        assert!(matches!(
            ExtendedKey::new([0u8; 32], [1u8; 32]),
            Err(Error::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_derive_child_key_from_mnemonic() {
        let mnemonic = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        let key = derive_child_key_from_mnemonic(mnemonic, "m/44'/118'/0'/0/0", "").unwrap();
        assert_eq!(
            hex::encode(*key),
            "c4a48e2fce1481cd3294b4490f6678090ea98d3d0e5cd984558ab0968741b104"
        );

        let again = derive_child_key_from_mnemonic(mnemonic, "m/44'/118'/0'/0/0", "").unwrap();
        assert_eq!(*key, *again);
    }

    #[test]
    fn test_mnemonic_and_seed_entry_points_agree() {
        let mnemonic = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        let seed = validate_and_normalize(mnemonic).unwrap().to_seed("TREZOR");
        let path: DerivationPath = "m/44'/118'/0'/0/3".parse().unwrap();

        let from_seed = derive_private_key(seed.as_ref(), &path, MASTER_KEY_MAX_ITERATIONS).unwrap();
        let from_mnemonic = derive_child_key_from_mnemonic(mnemonic, "m/44'/118'/0'/0/3", "TREZOR").unwrap();
        assert_eq!(*from_seed.to_bytes(), *from_mnemonic);
    }

    #[test]
    fn test_derive_child_key_from_mnemonic_errors() {
        let mnemonic = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        assert!(matches!(
            derive_child_key_from_mnemonic(mnemonic, "m/44'/118'/0'", ""),
            Err(Error::InvalidDerivationPath(_))
        ));
        assert!(matches!(
            derive_child_key_from_mnemonic("abandon about", "m/44'/118'/0'/0/0", ""),
            Err(Error::InvalidMnemonicLength(2))
        ));
    }
}
