//! # Client Configuration & Constants
//!
//! Every magic number the client needs lives here. Most of them are fixed by
//! the chain itself (version bytes, object ids, the address prefix) and
//! cannot be changed without producing transactions the node will reject.
//! The only runtime-tunable knobs are in [`ApiConfig`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Websocket address of a locally running API node.
pub const DEFAULT_ADDRESS: &str = "ws://127.0.0.1:8091";

/// Chain id of the public Delegato network, hex encoded. It is prepended
/// to every transaction digest, so a signature made for one chain is
/// worthless on another.
pub const DEFAULT_CHAIN_ID: &str =
    "74b66242d0ac8c5c447d04ae10460002fb5ee9c5013dd0d46a7296e259ae95a8";

// ---------------------------------------------------------------------------
// JSON-RPC
// ---------------------------------------------------------------------------

/// Value of the `jsonrpc` member in every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// The node exposes a single RPC method that dispatches on
/// `[namespace, method, params]`.
pub const API_CALL_METHOD: &str = "call";

/// First id handed out by a fresh transport.
pub const FIRST_REQUEST_ID: u64 = 0;

/// Capacity of the transport event fan-out channel. Slow subscribers that
/// fall further behind than this lose the oldest events.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Prefix of textual public keys.
pub const ADDRESS_PREFIX: &str = "BTS";

/// Version byte of WIF private keys.
pub const WIF_VERSION: u8 = 0x80;

/// Version byte of base58 addresses derived from public keys.
pub const ADDRESS_VERSION: u8 = 0x38;

/// Length of every checksum suffix (WIF, public key, address).
pub const CHECKSUM_LENGTH: usize = 4;

/// Shortest password accepted by credential-based key derivation.
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Failed canonical-signature attempts between two warnings.
pub const SIGNING_WARN_INTERVAL: u32 = 10;

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// How far in the future a freshly built transaction expires.
pub const TRANSACTION_EXPIRATION: Duration = Duration::from_secs(10);

/// Fee asset of every operation: the core asset.
pub const FEE_ASSET_ID: &str = "1.3.0";

/// Account recorded as fee payer. Kept for completeness; it is not part of
/// the serialized operation.
pub const FEE_PAYING_ACCOUNT: &str = "1.2.0";

/// Object space/type of accounts.
pub const ACCOUNT_SPACE: u8 = 1;
pub const ACCOUNT_TYPE: u8 = 2;

// ---------------------------------------------------------------------------
// Runtime configuration
// ---------------------------------------------------------------------------

/// Where to connect and which chain to sign for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Websocket URL of the API node.
    pub address: String,
    /// Hex chain id mixed into every signature.
    pub chain_id: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            chain_id: DEFAULT_CHAIN_ID.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_id_is_32_bytes_of_hex() {
        let raw = hex::decode(DEFAULT_CHAIN_ID).expect("valid hex");
        assert_eq!(raw.len(), 32);
    }

    #[test]
    fn expiration_is_ten_seconds() {
        assert_eq!(TRANSACTION_EXPIRATION.as_secs(), 10);
    }

    #[test]
    fn config_fills_missing_fields() {
        let config: ApiConfig =
            serde_json::from_str(r#"{"address": "ws://node:9000"}"#).expect("parse");
        assert_eq!(config.address, "ws://node:9000");
        assert_eq!(config.chain_id, DEFAULT_CHAIN_ID);
    }

    #[test]
    fn fee_ids_parse() {
        use crate::codec::ObjectId;
        assert!(FEE_ASSET_ID.parse::<ObjectId>().is_ok());
        assert!(FEE_PAYING_ACCOUNT.parse::<ObjectId>().is_ok());
    }
}
