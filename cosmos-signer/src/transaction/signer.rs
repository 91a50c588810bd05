//! Sign document construction and transaction signing

use tracing::{debug, instrument};

use super::types::{AccountInfo, SignDoc, Tx};
use crate::crypto::hash::sha256;
use crate::crypto::keys::{NonceMode, PrivateKey, Signature};
use crate::error::{Error, Result};

/// Transaction signer
pub trait TransactionSigner {
    /// Sign `tx` for `account_number` on `chain_id`, appending the signature
    fn sign_transaction(&self, tx: &mut Tx, chain_id: &str, account_number: u64) -> Result<Signature>;
}

impl TransactionSigner for PrivateKey {
    fn sign_transaction(&self, tx: &mut Tx, chain_id: &str, account_number: u64) -> Result<Signature> {
        Ok(sign_transaction(tx, self, chain_id, account_number, NonceMode::Deterministic))
    }
}

/// Encode the sign document for the given transaction parts.
///
/// Standard proto3 rules apply: empty fields and a zero account number are
/// omitted from the output.
pub fn build_sign_doc(
    body_bytes: &[u8],
    auth_info_bytes: &[u8],
    chain_id: &str,
    account_number: u64,
) -> Vec<u8> {
    SignDoc {
        body_bytes: body_bytes.to_vec(),
        auth_info_bytes: auth_info_bytes.to_vec(),
        chain_id: chain_id.to_string(),
        account_number,
    }
    .to_bytes()
}

/// SHA-256 of the sign document, the digest each signer actually signs
pub fn sign_doc_hash(
    body_bytes: &[u8],
    auth_info_bytes: &[u8],
    chain_id: &str,
    account_number: u64,
) -> [u8; 32] {
    sha256(&build_sign_doc(body_bytes, auth_info_bytes, chain_id, account_number))
}

/// Sign `tx` with a single signer and append the signature to it.
///
/// The signature is always canonical (low-S).
#[instrument(skip_all, fields(chain_id = %chain_id, account_number = account_number))]
pub fn sign_transaction(
    tx: &mut Tx,
    signer: &PrivateKey,
    chain_id: &str,
    account_number: u64,
    nonce: NonceMode,
) -> Signature {
    let sign_doc = tx.sign_doc_bytes(chain_id, account_number);
    let signature = signer.sign(&sign_doc, nonce, true);
    tx.signatures.push(signature.to_vec());

    debug!(signatures = tx.signatures.len(), "Signed transaction");
    signature
}

/// Sign `tx` with several signers, each against its own account number.
///
/// `signers[i]` signs with `accounts[i].account_number`. Signatures are
/// returned and appended in signer order, which must match the order of the
/// transaction's signer infos.
#[instrument(skip_all, fields(chain_id = %chain_id, signers = signers.len()))]
pub fn multi_sign_transaction(
    tx: &mut Tx,
    signers: &[PrivateKey],
    chain_id: &str,
    accounts: &[AccountInfo],
    nonce: NonceMode,
) -> Result<Vec<Signature>> {
    if signers.len() != accounts.len() {
        return Err(Error::SignerAccountMismatch {
            signers: signers.len(),
            accounts: accounts.len(),
        });
    }

    let signatures: Vec<Signature> = signers
        .iter()
        .zip(accounts)
        .map(|(signer, account)| {
            let sign_doc = tx.sign_doc_bytes(chain_id, account.account_number);
            signer.sign(&sign_doc, nonce, true)
        })
        .collect();

    tx.signatures
        .extend(signatures.iter().map(Signature::to_vec));

    debug!(signatures = tx.signatures.len(), "Signed transaction with multiple signers");
    Ok(signatures)
}
