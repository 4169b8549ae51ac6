//! # API Client
//!
//! The node exposes one JSON-RPC method, `call`, that dispatches on
//! `[namespace, method, params]`. [`Api`] wraps the websocket transport
//! with that convention and groups the remote methods by plugin:
//!
//! ```text
//! api.database()    chain state, blocks, objects, accounts
//! api.network()     transaction broadcast
//! ```
//!
//! It also glues the transaction pipeline to the network: [`Api::transaction`]
//! fills in the reference block from the node, [`Api::sign_transaction`]
//! signs for the configured chain, and the `Api` itself is the
//! [`TransactionBroadcaster`] a [`SignedTransaction`] is handed to.

pub mod database;
pub mod namespace;
pub mod network;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::codec::ValidationError;
use crate::config::{ApiConfig, API_CALL_METHOD};
use crate::crypto::PrivateKey;
use crate::jsonrpc::{JsonRpcWebSocket, RpcError, TransportEvent};
use crate::transaction::{
    LogicError, Operation, SignedTransaction, TransactionBroadcaster, TransactionBuilder,
    UnsignedTransaction,
};

pub use database::{
    Account, Block, ChainProperties, DatabaseApi, DynamicGlobalProperties, ImmutableParameters,
};
pub use namespace::ApiNamespace;
pub use network::NetworkApi;

/// Everything that can go wrong between a method call and its typed result.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Logic(#[from] LogicError),

    #[error("unexpected result shape: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for a Delegato API node.
pub struct Api {
    config: ApiConfig,
    socket: JsonRpcWebSocket,
}

impl Default for Api {
    fn default() -> Self {
        Self::new(ApiConfig::default())
    }
}

impl Api {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            socket: JsonRpcWebSocket::new(),
        }
    }

    pub fn address(&self) -> &str {
        &self.config.address
    }

    pub fn chain_id(&self) -> &str {
        &self.config.chain_id
    }

    pub async fn connect(&self) -> Result<(), ApiError> {
        Ok(self.socket.connect(&self.config.address).await?)
    }

    pub fn disconnect(&self) {
        self.socket.disconnect();
    }

    pub fn is_connected(&self) -> bool {
        self.socket.is_connected()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TransportEvent> {
        self.socket.subscribe()
    }

    /// Calls `method` of `namespace` and returns the raw result.
    pub async fn call(
        &self,
        namespace: ApiNamespace,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, ApiError> {
        let params = vec![namespace.value(), Value::from(method), Value::Array(params)];
        Ok(self.socket.call(API_CALL_METHOD, params).await?)
    }

    /// Like [`Api::call`], decoding the result into `T`.
    pub async fn call_as<T: DeserializeOwned>(
        &self,
        namespace: ApiNamespace,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, ApiError> {
        let result = self.call(namespace, method, params).await?;
        Ok(serde_json::from_value(result)?)
    }

    pub fn database(&self) -> DatabaseApi<'_> {
        DatabaseApi::new(self)
    }

    pub fn network(&self) -> NetworkApi<'_> {
        NetworkApi::new(self)
    }

    /// Builds a transaction over `operations` that references the current
    /// head block and expires shortly.
    pub async fn transaction(
        &self,
        operations: impl IntoIterator<Item = Operation>,
    ) -> Result<UnsignedTransaction, ApiError> {
        let dgp = self.database().get_dynamic_global_properties().await?;
        tracing::debug!(
            head_block_number = dgp.head_block_number,
            head_block_id = %dgp.head_block_id,
            "building transaction"
        );
        let transaction = TransactionBuilder::new(dgp.head_block_number, &dgp.head_block_id)?
            .operations(operations)
            .build()?;
        Ok(transaction)
    }

    /// Signs `transaction` for the configured chain.
    pub fn sign_transaction(
        &self,
        transaction: UnsignedTransaction,
        keys: &[&PrivateKey],
    ) -> Result<SignedTransaction, ApiError> {
        Ok(transaction.sign(&self.config.chain_id, keys)?)
    }
}

#[async_trait]
impl TransactionBroadcaster for Api {
    type Error = ApiError;

    async fn broadcast_transaction(
        &self,
        transaction: &SignedTransaction,
    ) -> Result<Value, ApiError> {
        self.network().broadcast_transaction_synchronous(transaction).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_ADDRESS, DEFAULT_CHAIN_ID};
    use crate::crypto::KeyRole;
    use crate::transaction::PollVote;

    #[test]
    fn default_config() {
        let api = Api::default();
        assert_eq!(api.address(), DEFAULT_ADDRESS);
        assert_eq!(api.chain_id(), DEFAULT_CHAIN_ID);
        assert!(!api.is_connected());
    }

    #[tokio::test]
    async fn calls_fail_while_disconnected() {
        let api = Api::default();
        let err = api.database().get_dynamic_global_properties().await.unwrap_err();
        assert!(matches!(err, ApiError::Rpc(RpcError::Connection(_))));
    }

    #[tokio::test]
    async fn connect_error_names_the_address() {
        let api = Api::new(ApiConfig {
            address: "ws://127.0.0.1:1".into(),
            ..ApiConfig::default()
        });
        let err = api.connect().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "connection error: Cannot connect to ws://127.0.0.1:1"
        );
    }

    #[test]
    fn signing_uses_the_configured_chain() {
        let key = PrivateKey::derive("voter@example.com", "correct horse battery", KeyRole::Active)
            .unwrap();
        let tx = TransactionBuilder::new(7, "0000000711223344aabbccdd")
            .unwrap()
            .operation(PollVote {
                account: "1.2.5".parse().unwrap(),
                variant: "1.11.7".parse().unwrap(),
            })
            .build()
            .unwrap();

        let from_api = Api::default().sign_transaction(tx.clone(), &[&key]).unwrap();
        let direct = tx.sign(DEFAULT_CHAIN_ID, &[&key]).unwrap();
        assert_eq!(from_api, direct);
    }

    #[test]
    fn empty_key_set_is_a_logic_error() {
        let tx = TransactionBuilder::new(7, "0000000711223344aabbccdd")
            .unwrap()
            .build()
            .unwrap();
        let err = Api::default().sign_transaction(tx, &[]).unwrap_err();
        assert!(matches!(err, ApiError::Logic(LogicError::NoSigningKeys)));
    }
}
