//! Transaction wire types consumed by the signing protocol

use prost::Message;
use serde::{Deserialize, Serialize};

use crate::crypto::hash::sha256;

/// The document a signer commits to.
///
/// Field numbers follow `cosmos.tx.v1beta1.SignDoc`; the encoding of this
/// message is what gets hashed and signed.
#[derive(Clone, PartialEq, Message)]
pub struct SignDoc {
    /// Pre-serialized `TxBody`
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    /// Pre-serialized `AuthInfo`
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    #[prost(string, tag = "3")]
    pub chain_id: String,
    #[prost(uint64, tag = "4")]
    pub account_number: u64,
}

impl SignDoc {
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    /// SHA-256 of the encoded document
    pub fn hash(&self) -> [u8; 32] {
        sha256(&self.to_bytes())
    }
}

/// A transaction in raw form: opaque body and auth info plus one signature per signer.
///
/// Field numbers follow `cosmos.tx.v1beta1.TxRaw`.
#[derive(Clone, PartialEq, Message)]
pub struct Tx {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    /// Signatures in `signer_infos` order
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub signatures: Vec<Vec<u8>>,
}

impl Tx {
    /// Create an unsigned transaction from externally serialized parts
    pub fn new(body_bytes: Vec<u8>, auth_info_bytes: Vec<u8>) -> Self {
        Self {
            body_bytes,
            auth_info_bytes,
            signatures: Vec::new(),
        }
    }

    /// Encoded `TxRaw`, ready for a broadcaster
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    /// The sign document bytes for one signer of this transaction
    pub fn sign_doc_bytes(&self, chain_id: &str, account_number: u64) -> Vec<u8> {
        super::build_sign_doc(&self.body_bytes, &self.auth_info_bytes, chain_id, account_number)
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }
}

/// On-chain account data as returned by an account query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Bech32 account address
    pub address: String,
    pub account_number: u64,
    /// Sequence already encoded by the caller into the auth info
    pub sequence: u64,
}

impl AccountInfo {
    pub fn new(address: impl Into<String>, account_number: u64, sequence: u64) -> Self {
        Self {
            address: address.into(),
            account_number,
            sequence,
        }
    }
}
