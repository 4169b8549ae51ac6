//! # Compact Recoverable Signatures
//!
//! The chain stores signatures as 65 bytes, `[i, r, s]`, where `i` is the
//! recovery id plus 31 (27 for "compact", 4 for "compressed key"). Nodes
//! recover the signer's key from the signature instead of being told which
//! key signed, so getting `i` right matters as much as getting `r` and `s`
//! right.
//!
//! The node also insists on canonical signatures: both `r` and `s` must be
//! exactly 32 bytes when DER-encoded, and `s` must be low. Roughly one
//! signature in four fails the DER-length rule, so [`Signature::sign`]
//! keeps asking the nonce generator for another candidate until one passes.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use super::ecdsa::{self, EcSignature};
use super::hash::sha256;
use super::keys::{PrivateKey, PublicKey};
use crate::codec::{decode_hex, ByteReader, ChainDecode, ChainValue, ValidationError};
use crate::config::SIGNING_WARN_INTERVAL;

/// Encoded signature length.
pub const SIGNATURE_LENGTH: usize = 65;

/// Offset added to the recovery id: compact (27) plus compressed (4).
pub const RECOVERY_OFFSET: u8 = 27 + 4;

/// Internal signing failures. Neither should happen with a correct key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// None of the four recovery ids reproduces the signing key.
    #[error("no recovery parameter reproduces the signing key")]
    RecoveryParamNotFound,
}

/// A canonical, recoverable secp256k1 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    recovery: u8,
    inner: EcSignature,
}

impl Signature {
    /// Signs `SHA-256(message)` with `key`.
    ///
    /// Retries with a salted nonce stream until the signature is canonical.
    /// The loop has no upper bound; in practice it finishes within a few
    /// attempts, and a warning is logged every
    /// [`SIGNING_WARN_INTERVAL`] misses.
    pub fn sign(message: &[u8], key: &PrivateKey) -> Result<Self, SignatureError> {
        let digest = sha256(message);
        let mut attempt: u32 = 0;
        let inner = loop {
            let candidate = ecdsa::sign_digest(&digest, key.scalar(), attempt);
            attempt += 1;
            if candidate.is_canonical() {
                break candidate;
            }
            if attempt % SIGNING_WARN_INTERVAL == 0 {
                tracing::warn!(attempts = attempt, "still searching for a canonical signature");
            }
        };

        let recovery_id =
            ecdsa::calc_recovery_param(&digest, &inner, key.public_key().as_affine())
                .ok_or(SignatureError::RecoveryParamNotFound)?;

        Ok(Self {
            recovery: recovery_id + RECOVERY_OFFSET,
            inner,
        })
    }

    /// Parses the 65-byte hex form.
    pub fn from_hex(hex: &str) -> Result<Self, ValidationError> {
        let raw = decode_hex(hex)?;
        let raw: [u8; SIGNATURE_LENGTH] =
            raw.as_slice()
                .try_into()
                .map_err(|_| ValidationError::InvalidLength {
                    expected: SIGNATURE_LENGTH,
                    actual: raw.len(),
                })?;
        Self::from_array(&raw)
    }

    pub fn from_array(raw: &[u8; SIGNATURE_LENGTH]) -> Result<Self, ValidationError> {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&raw[1..33]);
        s.copy_from_slice(&raw[33..]);
        let out_of_range = ValidationError::InvalidKey("signature component out of range");
        Ok(Self {
            recovery: raw[0],
            inner: EcSignature {
                r: ecdsa::scalar_from_bytes(&r).ok_or_else(|| out_of_range.clone())?,
                s: ecdsa::scalar_from_bytes(&s).ok_or(out_of_range)?,
            },
        })
    }

    pub fn to_array(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[0] = self.recovery;
        out[1..33].copy_from_slice(&self.inner.r_bytes());
        out[33..].copy_from_slice(&self.inner.s_bytes());
        out
    }

    /// The header byte `i`.
    pub fn recovery_byte(&self) -> u8 {
        self.recovery
    }

    /// Whether the header marks a compressed public key.
    pub fn is_compressed(&self) -> bool {
        self.recovery.wrapping_sub(27) & 4 != 0
    }

    pub fn ec_signature(&self) -> &EcSignature {
        &self.inner
    }

    /// Recovers the signer of `message` from the header byte.
    pub fn recover_public_key(&self, message: &[u8]) -> Option<PublicKey> {
        let recovery_id = self.recovery.wrapping_sub(27) & 3;
        let point = ecdsa::recover_public_key(&sha256(message), &self.inner, recovery_id)?;
        PublicKey::from_affine(point).ok()
    }

    /// Verifies against a known key without using the header byte.
    pub fn verify(&self, message: &[u8], public_key: &PublicKey) -> bool {
        ecdsa::verify_digest(&sha256(message), &self.inner, public_key.as_affine())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signature").field(&self.bytes()).finish()
    }
}

/// JSON and bytes are both the 65-byte hex.
impl ChainValue for Signature {
    fn value(&self) -> Value {
        Value::String(self.bytes())
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_array());
    }
}

impl ChainDecode for Signature {
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, ValidationError> {
        Self::from_array(&reader.take_array::<SIGNATURE_LENGTH>("Signature")?)
    }
}
