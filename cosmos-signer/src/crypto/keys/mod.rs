//! Key derivation, key pairs and signatures
//!
//! This module provides BIP-32 style derivation of secp256k1 keys along a
//! fixed-depth path, and ECDSA signing with canonical low-S encoding.

pub mod derivation;
pub mod path;
mod private_key;
mod public_key;
mod signature;

pub use derivation::*;
pub use path::{is_hardened, parse_derivation_path, DerivationPath, HARDENED_BIT, PATH_DEPTH};
pub use private_key::*;
pub use public_key::*;
pub use signature::*;
