//! Bech32 account addresses

use std::fmt;
use std::str::FromStr;

use bech32::{FromBase32, ToBase32, Variant};
use serde::{Deserialize, Serialize};

use crate::crypto::hash::hash160;
use crate::crypto::keys::PublicKey;
use crate::error::{Error, Result};

/// Length of an account address payload
pub const ADDRESS_LENGTH: usize = 20;

/// Address prefix of the Cosmos Hub
pub const DEFAULT_PREFIX: &str = "cosmos";

/// An account address: `RIPEMD160(SHA256(compressed public key))` in bech32
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address {
    prefix: String,
    bytes: [u8; ADDRESS_LENGTH],
    encoded: String,
}

impl Address {
    /// Derive the address of a public key
    pub fn from_public_key(public_key: &PublicKey, prefix: &str) -> Result<Self> {
        Self::from_bytes(&hash160(&public_key.to_bytes()), prefix)
    }

    /// Wrap a raw 20-byte address payload
    pub fn from_bytes(bytes: &[u8], prefix: &str) -> Result<Self> {
        let bytes: [u8; ADDRESS_LENGTH] = bytes.try_into().map_err(|_| {
            Error::UnsupportedInput(format!(
                "address must be {} bytes, got {}",
                ADDRESS_LENGTH,
                bytes.len()
            ))
        })?;

        let encoded = bech32::encode(prefix, bytes.to_base32(), Variant::Bech32)
            .map_err(|e| Error::InvalidAddress(format!("bad prefix {:?}: {}", prefix, e)))?;

        Ok(Self {
            prefix: prefix.to_string(),
            bytes,
            encoded,
        })
    }

    /// Parse a bech32 address string
    pub fn from_bech32(s: &str) -> Result<Self> {
        let (prefix, data, variant) =
            bech32::decode(s).map_err(|e| Error::InvalidAddress(format!("{}: {}", s, e)))?;
        if variant != Variant::Bech32 {
            return Err(Error::InvalidAddress(format!("{}: not a bech32 address", s)));
        }

        let bytes = Vec::<u8>::from_base32(&data)
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", s, e)))?;
        if bytes.len() != ADDRESS_LENGTH {
            return Err(Error::InvalidAddress(format!(
                "{}: expected {} byte payload, got {}",
                s,
                ADDRESS_LENGTH,
                bytes.len()
            )));
        }

        Self::from_bytes(&bytes, &prefix)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.bytes
    }

    pub fn to_bech32(&self) -> &str {
        &self.encoded
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_bech32(s)
    }
}

impl TryFrom<String> for Address {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::from_bech32(&s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.encoded
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}
