//! Compact secp256k1 ECDSA signatures and nonce selection

use std::fmt;
use std::str::FromStr;

use secp256k1::{ecdsa, SecretKey};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Length of a compact `r || s` signature
pub const SIGNATURE_LENGTH: usize = 64;

/// Half of the secp256k1 group order, the upper bound of a canonical `s`
const HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b,
    0x20, 0xa0,
];

/// How the per-signature ECDSA nonce is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonceMode {
    /// RFC 6979: the nonce is a function of the key and the digest
    #[default]
    Deterministic,
    /// RFC 6979 mixed with fresh OS randomness
    Random,
}

impl FromStr for NonceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deterministic" => Ok(Self::Deterministic),
            "random" => Ok(Self::Random),
            other => Err(Error::UnsupportedInput(format!("unknown nonce mode: {}", other))),
        }
    }
}

impl fmt::Display for NonceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deterministic => f.write_str("deterministic"),
            Self::Random => f.write_str("random"),
        }
    }
}

/// A raw 64-byte ECDSA signature, big-endian `r` followed by big-endian `s`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    /// Parse a compact signature
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; SIGNATURE_LENGTH] = bytes.try_into().map_err(|_| {
            Error::InvalidSignature(format!(
                "expected {} bytes, got {}",
                SIGNATURE_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..32]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[32..]
    }

    /// Whether `s` lies in the lower half of the group order
    pub fn is_low_s(&self) -> bool {
        self.s() <= &HALF_ORDER[..]
    }

    /// The same signature with `s` replaced by `n - s`
    pub fn negate_s(&self) -> Result<Self> {
        let s = SecretKey::from_slice(self.s())
            .map_err(|_| Error::InvalidSignature("s is zero or not below the curve order".to_string()))?;

        let mut bytes = self.0;
        bytes[32..].copy_from_slice(&s.negate().secret_bytes());
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub(crate) fn to_ecdsa(self) -> Option<ecdsa::Signature> {
        ecdsa::Signature::from_compact(&self.0).ok()
    }
}

impl From<ecdsa::Signature> for Signature {
    fn from(signature: ecdsa::Signature) -> Self {
        Self(signature.serialize_compact())
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
