//! Mnemonic phrase validation, generation and seed derivation

use std::fmt;
use std::str::FromStr;

use rand::{rngs::OsRng, RngCore};
use sha2::Sha512;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::wordlist::WordlistResource;
use crate::error::{Error, Result};

/// Length of a derived seed in bytes
pub const SEED_LENGTH: usize = 64;

/// PBKDF2 rounds used to stretch a mnemonic into a seed
pub const SEED_ITERATIONS: u32 = 2048;

const SALT_PREFIX: &str = "mnemonic";

/// Word counts accepted for a mnemonic phrase
pub const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Supported mnemonic strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicStrength {
    /// 12 words (128 bits)
    Words12,
    /// 15 words (160 bits)
    Words15,
    /// 18 words (192 bits)
    Words18,
    /// 21 words (224 bits)
    Words21,
    /// 24 words (256 bits)
    Words24,
}

impl MnemonicStrength {
    /// Get entropy length in bytes
    fn entropy_bytes(&self) -> usize {
        match self {
            Self::Words12 => 16,
            Self::Words15 => 20,
            Self::Words18 => 24,
            Self::Words21 => 28,
            Self::Words24 => 32,
        }
    }

    /// Number of words produced for this strength
    pub fn word_count(&self) -> usize {
        self.entropy_bytes() * 3 / 4
    }
}

/// A validated mnemonic phrase, normalized to single-space separated words
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Mnemonic {
    phrase: String,
    word_count: usize,
}

impl Mnemonic {
    /// The normalized phrase
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Number of words, one of the valid mnemonic lengths
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Iterate over the words of the phrase
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.phrase.split(' ')
    }

    /// Derive the 64-byte seed for this mnemonic and passphrase
    pub fn to_seed(&self, passphrase: &str) -> Seed {
        derive_seed(self, passphrase)
    }
}

impl FromStr for Mnemonic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        validate_and_normalize(s)
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.phrase)
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("word_count", &self.word_count)
            .finish_non_exhaustive()
    }
}

/// A 64-byte seed derived from a mnemonic, wiped from memory on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_LENGTH]);

impl Seed {
    pub fn as_bytes(&self) -> &[u8; SEED_LENGTH] {
        &self.0
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// Validate a mnemonic phrase and normalize its whitespace.
///
/// Only the word count and wordlist membership are checked, the BIP39
/// checksum is not.
pub fn validate_and_normalize(phrase: &str) -> Result<Mnemonic> {
    let words: Vec<&str> = phrase.split_whitespace().collect();

    if !VALID_WORD_COUNTS.contains(&words.len()) {
        return Err(Error::InvalidMnemonicLength(words.len()));
    }

    let wordlist = WordlistResource::load();
    if let Some(unknown) = words.iter().find(|word| !wordlist.contains(word)) {
        return Err(Error::InvalidMnemonicWord(unknown.to_string()));
    }

    Ok(Mnemonic {
        phrase: words.join(" "),
        word_count: words.len(),
    })
}

/// Validate a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> Result<bool> {
    validate_and_normalize(phrase).map(|_| true)
}

/// Derive a seed with PBKDF2-HMAC-SHA512 over the normalized phrase
pub fn derive_seed(mnemonic: &Mnemonic, passphrase: &str) -> Seed {
    let mut salt = String::with_capacity(SALT_PREFIX.len() + passphrase.len());
    salt.push_str(SALT_PREFIX);
    salt.push_str(passphrase);

    let mut seed = [0u8; SEED_LENGTH];
    pbkdf2::pbkdf2_hmac::<Sha512>(
        mnemonic.phrase().as_bytes(),
        salt.as_bytes(),
        SEED_ITERATIONS,
        &mut seed,
    );
    salt.zeroize();

    debug!(words = mnemonic.word_count(), "Derived seed from mnemonic");
    Seed(seed)
}

/// Generate a seed from a mnemonic phrase and optional passphrase
pub fn mnemonic_to_seed(phrase: &str, passphrase: Option<&str>) -> Result<Seed> {
    let mnemonic = validate_and_normalize(phrase)?;
    Ok(derive_seed(&mnemonic, passphrase.unwrap_or("")))
}

/// Generate a new random mnemonic phrase with the specified strength
pub fn generate_mnemonic(strength: MnemonicStrength) -> Result<Mnemonic> {
    let mut entropy = vec![0u8; strength.entropy_bytes()];
    OsRng.fill_bytes(&mut entropy);

    let generated = bip39::Mnemonic::from_entropy(&entropy)
        .map_err(|e| Error::Mnemonic(e.to_string()));
    entropy.zeroize();

    let mut phrase = generated?.to_string();
    let mnemonic = validate_and_normalize(&phrase);
    phrase.zeroize();
    mnemonic
}
