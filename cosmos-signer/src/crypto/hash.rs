//! Hash helpers

use bitcoin::hashes::{hash160, Hash};
use sha2::{Digest, Sha256};

/// SHA-256, the curve's standard message hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// RIPEMD-160 over SHA-256, used for account addresses
pub fn hash160(data: &[u8]) -> [u8; 20] {
    hash160::Hash::hash(data).to_byte_array()
}
