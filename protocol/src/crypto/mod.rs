//! # Cryptographic Primitives for Delegato
//!
//! Everything the client needs to prove it is allowed to act for an
//! account: key derivation from credentials, the chain's textual key
//! formats, and canonical recoverable ECDSA signatures over secp256k1.
//!
//! The curve arithmetic is `k256`'s. We only add what the chain requires on
//! top of it: a deterministic nonce with salted retries, low-S, the DER
//! length rule and the recovery-id search. If you are tempted to replace
//! the nonce derivation with `k256::ecdsa::SigningKey`, don't: its RFC 6979
//! stream differs from ours and the resulting signatures, while valid,
//! will not match the ones every other client produces for the same input.

pub mod ecdsa;
pub mod hash;
pub mod keys;
pub mod signature;

pub use hash::{double_sha256, hmac_sha256, ripemd160, sha256};
pub use keys::{normalize_brain_key, KeyRole, PrivateKey, PublicKey};
pub use signature::{Signature, SignatureError};
