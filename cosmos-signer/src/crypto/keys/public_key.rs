//! secp256k1 public keys

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use secp256k1::{Message, Secp256k1};

use super::signature::Signature;
use crate::crypto::hash::sha256;
use crate::error::{Error, Result};

/// Length of a compressed public key
pub const PUBLIC_KEY_LENGTH: usize = 33;

/// Length of an uncompressed public key
pub const UNCOMPRESSED_PUBLIC_KEY_LENGTH: usize = 65;

/// A point on secp256k1, usable without the matching private scalar
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(secp256k1::PublicKey);

impl PublicKey {
    /// Parse a compressed (33 bytes) or uncompressed (65 bytes) point
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            PUBLIC_KEY_LENGTH | UNCOMPRESSED_PUBLIC_KEY_LENGTH => secp256k1::PublicKey::from_slice(bytes)
                .map(Self)
                .map_err(|e| Error::InvalidPublicKey(e.to_string())),
            len => Err(Error::UnsupportedInput(format!(
                "public key must be {} or {} bytes, got {}",
                PUBLIC_KEY_LENGTH, UNCOMPRESSED_PUBLIC_KEY_LENGTH, len
            ))),
        }
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| Error::InvalidPublicKey(format!("bad hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_base64(s: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(s)
            .map_err(|e| Error::InvalidPublicKey(format!("bad base64: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Compressed point encoding
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0.serialize()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Verify a signature over `message`, hashed with SHA-256.
    ///
    /// Returns `false` for malformed signatures as well as mismatching ones.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        self.verify_digest(&sha256(message), signature)
    }

    /// Verify a signature over a precomputed 32-byte digest.
    ///
    /// Either form of `s` is accepted.
    pub fn verify_digest(&self, digest: &[u8; 32], signature: &[u8]) -> bool {
        let message = Message::from_digest(*digest);
        let Some(mut signature) = Signature::from_bytes(signature).ok().and_then(Signature::to_ecdsa) else {
            return false;
        };
        // libsecp256k1 refuses high-S outright
        signature.normalize_s();

        Secp256k1::verification_only()
            .verify_ecdsa(&message, &signature, &self.0)
            .is_ok()
    }

    pub(crate) fn inner(&self) -> &secp256k1::PublicKey {
        &self.0
    }
}

impl From<secp256k1::PublicKey> for PublicKey {
    fn from(key: secp256k1::PublicKey) -> Self {
        Self(key)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPRESSED: &str = "0257bee208dc8028d2d043bee07b0281a6f959190ed18a2a9984d66507998d9668";

    #[test]
    fn test_from_bytes_round_trip() {
        let key = PublicKey::from_hex(COMPRESSED).unwrap();
        assert_eq!(key.to_hex(), COMPRESSED);
        assert_eq!(PublicKey::from_bytes(&key.to_bytes()).unwrap(), key);
        assert_eq!(PublicKey::from_base64(&key.to_base64()).unwrap(), key);
    }

    #[test]
    fn test_uncompressed_input_is_compressed_on_output() {
        let key = PublicKey::from_hex(COMPRESSED).unwrap();
        let uncompressed = key.inner().serialize_uncompressed();
        let parsed = PublicKey::from_bytes(&uncompressed).unwrap();
        assert_eq!(parsed.to_hex(), COMPRESSED);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            PublicKey::from_bytes(&[2u8; 32]),
            Err(Error::UnsupportedInput(_))
        ));
        // Correct length, but 0x05 is not a valid point prefix
        let mut bytes = hex::decode(COMPRESSED).unwrap();
        bytes[0] = 0x05;
        assert!(matches!(
            PublicKey::from_bytes(&bytes),
            Err(Error::InvalidPublicKey(_))
        ));
        assert!(matches!(
            PublicKey::from_hex("not hex"),
            Err(Error::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn test_verify_never_panics_on_garbage() {
        let key = PublicKey::from_hex(COMPRESSED).unwrap();
        assert!(!key.verify(b"message", &[]));
        assert!(!key.verify(b"message", &[0u8; 64]));
        assert!(!key.verify_digest(&[0u8; 32], &[1u8; 65]));
        // s at or above the group order does not parse
        assert!(!key.verify_digest(&[1u8; 32], &[0xffu8; 64]));
    }

    #[test]
    fn test_verify_accepts_high_s() {
        let key = PublicKey::from_hex(COMPRESSED).unwrap();
        let low = Signature::from_bytes(&hex::decode(
            "98470163c4afa1b0113b7f175811064a9c34a73cd39f9b568555c84c3212a2c9528c6665cfd37212f0d6e5abd5b80e0b5c437bf61ed0eb0ef3875770d4ef99ab",
        ).unwrap())
        .unwrap();
        let high = low.negate_s().unwrap();
        assert!(!high.is_low_s());

        assert!(key.verify(b"hello world", low.as_bytes()));
        assert!(key.verify(b"hello world", high.as_bytes()));
        assert!(!key.verify(b"hello there", high.as_bytes()));
    }
}
