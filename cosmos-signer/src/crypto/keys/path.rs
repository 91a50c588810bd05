//! Fixed-depth BIP-44 style derivation paths

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Number of levels in every derivation path
pub const PATH_DEPTH: usize = 5;

/// Bit marking a hardened derivation index
pub const HARDENED_BIT: u32 = 1 << 31;

/// Maximum number of decimal digits in a path segment
const MAX_SEGMENT_DIGITS: usize = 3;

/// Check whether an index selects hardened derivation
pub fn is_hardened(index: u32) -> bool {
    index & HARDENED_BIT != 0
}

/// A parsed derivation path of exactly five indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivationPath([u32; PATH_DEPTH]);

impl DerivationPath {
    /// Wrap raw indices; hardened levels carry `HARDENED_BIT`
    pub fn new(indices: [u32; PATH_DEPTH]) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[u32; PATH_DEPTH] {
        &self.0
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        parse_derivation_path(path).map(Self)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for &index in &self.0 {
            if is_hardened(index) {
                write!(f, "/{}'", index & !HARDENED_BIT)?;
            } else {
                write!(f, "/{}", index)?;
            }
        }
        Ok(())
    }
}

impl From<DerivationPath> for [u32; PATH_DEPTH] {
    fn from(path: DerivationPath) -> Self {
        path.0
    }
}

/// Parse a path of the form `m/a/b/c/d/e` into five derivation indices.
///
/// Each segment is one to three decimal digits, optionally followed by `'`
/// to select hardened derivation.
pub fn parse_derivation_path(path: &str) -> Result<[u32; PATH_DEPTH]> {
    let invalid = || Error::InvalidDerivationPath(path.to_string());

    let rest = path.strip_prefix("m/").ok_or_else(invalid)?;
    let segments: Vec<&str> = rest.split('/').collect();
    if segments.len() != PATH_DEPTH {
        return Err(invalid());
    }

    let mut indices = [0u32; PATH_DEPTH];
    for (slot, segment) in indices.iter_mut().zip(segments) {
        let (digits, hardened) = match segment.strip_suffix('\'') {
            Some(digits) => (digits, true),
            None => (segment, false),
        };

        if digits.is_empty()
            || digits.len() > MAX_SEGMENT_DIGITS
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let index: u32 = digits.parse().map_err(|_| invalid())?;
        *slot = if hardened { index | HARDENED_BIT } else { index };
    }

    Ok(indices)
}
