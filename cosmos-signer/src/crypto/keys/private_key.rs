//! secp256k1 private keys and signing

use std::fmt;

use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use secp256k1::{Message, Scalar, Secp256k1, SecretKey};
use sha2::Sha256;
use tracing::trace;
use zeroize::{Zeroize, Zeroizing};

use super::public_key::PublicKey;
use super::signature::{NonceMode, Signature};
use crate::crypto::hash::sha256;
use crate::error::{Error, Result};

/// Length of a private scalar
pub const PRIVATE_KEY_LENGTH: usize = 32;

type HmacSha256 = Hmac<Sha256>;

/// A private scalar together with its public point.
///
/// This is the signing identity: it is created once per signer, owned by the
/// caller and never stored in shared state.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    secret: SecretKey,
    public: PublicKey,
}

/// A signing key pair; the private key always carries its public point
pub type KeyPair = PrivateKey;

impl PrivateKey {
    /// Generate a new random key from the OS random source
    pub fn generate() -> Self {
        Self::from_secret(SecretKey::new(&mut OsRng))
    }

    /// Create a key from a 32-byte big-endian scalar in `[1, n-1]`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_LENGTH {
            return Err(Error::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_LENGTH,
                bytes.len()
            )));
        }

        let secret = SecretKey::from_slice(bytes).map_err(|_| {
            Error::InvalidPrivateKey("scalar is zero or not below the curve order".to_string())
        })?;
        Ok(Self::from_secret(secret))
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = hex::decode(s).map_err(|e| Error::InvalidPrivateKey(format!("bad hex: {}", e)))?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    pub(crate) fn from_secret(secret: SecretKey) -> Self {
        let secp = Secp256k1::signing_only();
        let public = secp256k1::PublicKey::from_secret_key(&secp, &secret).into();
        Self { secret, public }
    }

    /// The raw scalar, wiped when the returned buffer is dropped
    pub fn to_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_LENGTH]> {
        Zeroizing::new(self.secret.secret_bytes())
    }

    /// The raw scalar as lowercase hex, wiped when dropped
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(*self.to_bytes()))
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn to_public(&self) -> PublicKey {
        self.public
    }

    /// Compressed public point
    pub fn public_key_bytes(&self) -> [u8; 33] {
        self.public.to_bytes()
    }

    pub fn public_key_hex(&self) -> String {
        self.public.to_hex()
    }

    pub fn public_key_base64(&self) -> String {
        self.public.to_base64()
    }

    /// Hash `message` with SHA-256 and sign the digest
    pub fn sign(&self, message: &[u8], nonce: NonceMode, canonical: bool) -> Signature {
        self.sign_digest(&sha256(message), nonce, canonical)
    }

    /// Sign an already hashed 32-byte digest.
    ///
    /// With `canonical` set the resulting `s` is forced into the lower half
    /// of the group order. Without it the raw RFC 6979 `s` is returned, which
    /// is high about half of the time.
    pub fn sign_digest(&self, digest: &[u8; 32], nonce: NonceMode, canonical: bool) -> Signature {
        let secp = Secp256k1::signing_only();
        let message = Message::from_digest(*digest);

        let extra = match nonce {
            NonceMode::Deterministic => None,
            NonceMode::Random => {
                let mut extra = Zeroizing::new([0u8; 32]);
                OsRng.fill_bytes(&mut extra[..]);
                Some(extra)
            }
        };

        // libsecp256k1 only ever hands back the low-S form
        let signature = match &extra {
            None => secp.sign_ecdsa(&message, &self.secret),
            Some(extra) => secp.sign_ecdsa_with_noncedata(&message, &self.secret, extra),
        };
        let low = Signature::from(signature);
        if canonical {
            return low;
        }

        match self.raw_s_is_high(digest, extra.as_deref(), &low) {
            Some(true) => low.negate_s().unwrap_or(low),
            Some(false) => low,
            None => {
                trace!("Nonce did not reproduce, returning canonical signature");
                low
            }
        }
    }

    /// Whether the un-normalized `s` for `low` was in the upper half.
    ///
    /// Recomputes the nonce `k` and checks `k * s == z + r * d` for the low
    /// form; the negated form satisfies it when libsecp256k1 flipped `s`.
    fn raw_s_is_high(&self, digest: &[u8; 32], extra: Option<&[u8; 32]>, low: &Signature) -> Option<bool> {
        let key = Zeroizing::new(self.secret.secret_bytes());
        let nonce = rfc6979_nonce(&key, digest, extra)?;
        let k = SecretKey::from_slice(&nonce[..]).ok()?;

        let r = Scalar::from_be_bytes(low.r().try_into().ok()?).ok()?;
        let s = Scalar::from_be_bytes(low.s().try_into().ok()?).ok()?;
        let z = Scalar::from_be_bytes(*digest).ok()?;

        let lhs = k.mul_tweak(&s).ok()?;
        let rhs = self.secret.mul_tweak(&r).ok()?.add_tweak(&z).ok()?;
        if lhs == rhs {
            Some(false)
        } else if lhs.negate() == rhs {
            Some(true)
        } else {
            None
        }
    }

    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        self.public.verify(message, signature)
    }

    pub fn verify_digest(&self, digest: &[u8; 32], signature: &[u8]) -> bool {
        self.public.verify_digest(digest, signature)
    }
}

/// First RFC 6979 (HMAC-SHA256) candidate nonce over `key || digest || extra`,
/// the same input libsecp256k1 feeds its default nonce function
fn rfc6979_nonce(key: &[u8; 32], digest: &[u8; 32], extra: Option<&[u8; 32]>) -> Option<Zeroizing<[u8; 32]>> {
    let mac = |k: &[u8], parts: &[&[u8]]| -> Option<[u8; 32]> {
        let mut h = HmacSha256::new_from_slice(k).ok()?;
        for part in parts {
            h.update(part);
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&h.finalize().into_bytes());
        Some(out)
    };
    let extra: &[u8] = extra.map(|e| &e[..]).unwrap_or(&[]);

    let mut k = Zeroizing::new([0x00u8; 32]);
    let mut v = Zeroizing::new([0x01u8; 32]);
    *k = mac(&k[..], &[&v[..], &[0x00u8], key, digest, extra])?;
    *v = mac(&k[..], &[&v[..]])?;
    *k = mac(&k[..], &[&v[..], &[0x01u8], key, digest, extra])?;
    *v = mac(&k[..], &[&v[..]])?;
    *v = mac(&k[..], &[&v[..]])?;
    Some(v)
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_KEY: &str = "ab6e6543eef22ee4c57d9ac093e1c4bfc8c637053b10d114ac66adcd3e906c53";
    const PUBLIC_KEY: &str = "0257bee208dc8028d2d043bee07b0281a6f959190ed18a2a9984d66507998d9668";

    #[test]
    fn test_public_key_vector() {
        let key = PrivateKey::from_hex(PRIVATE_KEY).unwrap();
        assert_eq!(key.public_key_hex(), PUBLIC_KEY);
        assert_eq!(hex::encode(*key.to_bytes()), PRIVATE_KEY);
    }

    #[test]
    fn test_rejects_invalid_scalars() {
        assert!(matches!(
            PrivateKey::from_bytes(&[0u8; 32]),
            Err(Error::InvalidPrivateKey(_))
        ));
        assert!(matches!(
            PrivateKey::from_bytes(&[0xffu8; 32]),
            Err(Error::InvalidPrivateKey(_))
        ));
        assert!(matches!(
            PrivateKey::from_bytes(&[1u8; 31]),
            Err(Error::InvalidPrivateKey(_))
        ));
        // The group order itself
        let order = hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141").unwrap();
        assert!(PrivateKey::from_bytes(&order).is_err());
    }

    #[test]
    fn test_deterministic_signature_vectors() {
        let key = PrivateKey::from_hex(PRIVATE_KEY).unwrap();

        let signature = key.sign(b"hello world", NonceMode::Deterministic, true);
        assert_eq!(
            signature.to_hex(),
            "98470163c4afa1b0113b7f175811064a9c34a73cd39f9b568555c84c3212a2c9528c6665cfd37212f0d6e5abd5b80e0b5c437bf61ed0eb0ef3875770d4ef99ab"
        );

        let signature = key.sign(b"sign me", NonceMode::Deterministic, true);
        assert_eq!(
            signature.to_hex(),
            "752b43abcba73532f3999297dd57b13fcc7f384d1d1446cc975d2ffa218949f412e6f23bb3d6725791a9eae3f0c998d75f56181dde1f16e6473c78dab4c093e8"
        );
    }

    #[test]
    fn test_non_canonical_signing_keeps_raw_s() {
        let key = PrivateKey::from_hex(PRIVATE_KEY).unwrap();

        // RFC 6979 yields a high s for this message
        let raw = key.sign(b"hello world", NonceMode::Deterministic, false);
        assert!(!raw.is_low_s());
        assert_eq!(
            raw.to_hex(),
            "98470163c4afa1b0113b7f175811064a9c34a73cd39f9b568555c84c3212a2c9ad73999a302c8ded0f291a542a47f1f35e6b60f09077b52ccc4b071bfb46a796"
        );
        assert!(key.verify(b"hello world", raw.as_bytes()));

        // and a low one here, so both forms agree
        let raw = key.sign(b"sign me", NonceMode::Deterministic, false);
        assert_eq!(raw, key.sign(b"sign me", NonceMode::Deterministic, true));
    }

    #[test]
    fn test_non_canonical_signing_produces_both_halves() {
        let key = PrivateKey::generate();
        let mut high = 0;
        for i in 0u32..64 {
            let message = i.to_be_bytes();
            let raw = key.sign(&message, NonceMode::Deterministic, false);
            let canonical = key.sign(&message, NonceMode::Deterministic, true);

            assert!(key.verify(&message, raw.as_bytes()));
            assert_eq!(raw.r(), canonical.r());
            if raw.is_low_s() {
                assert_eq!(raw, canonical);
            } else {
                high += 1;
                assert_eq!(raw.negate_s().unwrap(), canonical);
            }
        }
        assert!(high > 0 && high < 64);
    }

    #[test]
    fn test_random_nonce_non_canonical_verifies() {
        let key = PrivateKey::generate();
        for _ in 0..16 {
            let signature = key.sign(b"payload", NonceMode::Random, false);
            assert!(key.verify(b"payload", signature.as_bytes()));
        }
    }

    #[test]
    fn test_to_hex_matches_bytes() {
        let key = PrivateKey::from_hex(PRIVATE_KEY).unwrap();
        assert_eq!(key.to_hex().as_str(), PRIVATE_KEY);
        assert_eq!(PrivateKey::from_hex(&key.to_hex()).unwrap(), key);
    }

    #[test]
    fn test_sign_matches_sign_digest() {
        let key = PrivateKey::from_hex(PRIVATE_KEY).unwrap();
        let by_message = key.sign(b"payload", NonceMode::Deterministic, true);
        let by_digest = key.sign_digest(&sha256(b"payload"), NonceMode::Deterministic, true);
        assert_eq!(by_message, by_digest);
        assert!(key.verify_digest(&sha256(b"payload"), by_digest.as_bytes()));
    }

    #[test]
    fn test_random_nonce_still_verifies() {
        let key = PrivateKey::generate();
        let first = key.sign(b"payload", NonceMode::Random, true);
        let second = key.sign(b"payload", NonceMode::Random, true);
        assert_ne!(first, second);
        assert!(key.verify(b"payload", first.as_bytes()));
        assert!(key.verify(b"payload", second.as_bytes()));
        assert!(first.is_low_s() && second.is_low_s());
    }

    #[test]
    fn test_wrong_message_or_key_fails() {
        let key = PrivateKey::from_hex(PRIVATE_KEY).unwrap();
        let other = PrivateKey::generate();
        let signature = key.sign(b"payload", NonceMode::Deterministic, true);
        assert!(!key.verify(b"other payload", signature.as_bytes()));
        assert!(!other.verify(b"payload", signature.as_bytes()));
    }

    #[test]
    fn test_debug_hides_scalar() {
        let key = PrivateKey::from_hex(PRIVATE_KEY).unwrap();
        let debug = format!("{:?}", key);
        assert!(!debug.contains(PRIVATE_KEY));
        assert!(debug.contains(PUBLIC_KEY));
    }
}
