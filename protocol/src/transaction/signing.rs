//! Producing transaction signatures.
//!
//! The signed message is the raw chain id followed by the transaction
//! bytes. Mixing in the chain id keeps a transaction signed for one network
//! from being replayed on another that shares the same accounts.

use thiserror::Error;

use crate::codec::{decode_hex, ValidationError};
use crate::crypto::{PrivateKey, Signature, SignatureError};

/// A transaction could not be signed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogicError {
    #[error("at least one signing key is required")]
    NoSigningKeys,

    #[error("invalid chain id: {0}")]
    InvalidChainId(#[source] ValidationError),

    #[error(transparent)]
    Signing(#[from] SignatureError),
}

/// `raw(chain_id) ∥ transaction_bytes`.
pub fn signing_message(chain_id: &str, transaction_bytes: &[u8]) -> Result<Vec<u8>, LogicError> {
    let mut message = decode_hex(chain_id).map_err(LogicError::InvalidChainId)?;
    message.extend_from_slice(transaction_bytes);
    Ok(message)
}

/// One signature per key, in key order.
pub fn sign_message(message: &[u8], keys: &[&PrivateKey]) -> Result<Vec<Signature>, LogicError> {
    if keys.is_empty() {
        return Err(LogicError::NoSigningKeys);
    }
    keys.iter()
        .map(|key| Signature::sign(message, key).map_err(LogicError::from))
        .collect()
}
