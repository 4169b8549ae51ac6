// Copyright (c) 2026 Delegato Contributors. MIT License.
// See LICENSE for details.

//! # Delegato Protocol: Client Library
//!
//! Everything a client needs to talk to a Delegato proof-of-brain chain:
//! encode values exactly the way the node does, derive keys from an
//! account's credentials, assemble and sign transactions, and exchange
//! JSON-RPC messages with an API node over a websocket.
//!
//! ## Architecture
//!
//! - **codec**: the Chain Value type system. Each value has a JSON form for
//!   the RPC layer and a canonical byte form that gets signed.
//! - **crypto**: secp256k1 keys, WIF and `BTS` public key text, brainkey
//!   derivation, and deterministic canonical signatures.
//! - **transaction**: operations, the transaction builder, and the
//!   unsigned to signed type-state.
//! - **jsonrpc**: JSON-RPC 2.0 client over `tokio-tungstenite`.
//! - **api**: typed calls on the node's plugins and the broadcast seam.
//! - **config**: protocol constants and [`ApiConfig`](config::ApiConfig).
//!
//! ## Ground rules
//!
//! 1. Byte output is deterministic. Same inputs, same signature.
//! 2. Library code returns errors; it does not panic on input.
//! 3. The library logs through `tracing` and never installs a subscriber.

pub mod api;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod jsonrpc;
pub mod transaction;
