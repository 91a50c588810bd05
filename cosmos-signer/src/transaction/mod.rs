//! Transaction functionality
//!
//! This module builds the sign documents for externally serialized
//! transactions and signs them for one or more signers.

mod signer;
pub mod types;

pub use signer::*;
pub use types::*;
