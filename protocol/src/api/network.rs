//! The `network_broadcast` plugin.

use serde_json::Value;

use super::namespace::ApiNamespace;
use super::{Api, ApiError};
use crate::codec::ChainValue;
use crate::transaction::SignedTransaction;

/// Borrowed view of [`Api`] scoped to the `network_broadcast` plugin.
#[derive(Clone, Copy)]
pub struct NetworkApi<'a> {
    api: &'a Api,
}

impl<'a> NetworkApi<'a> {
    pub(super) fn new(api: &'a Api) -> Self {
        Self { api }
    }

    /// Pushes `transaction` and waits until the node has included it.
    /// Returns whatever confirmation the node sends back.
    pub async fn broadcast_transaction_synchronous(
        &self,
        transaction: &SignedTransaction,
    ) -> Result<Value, ApiError> {
        tracing::info!(
            operations = transaction.operations().len(),
            expiration = %transaction.expiration(),
            "broadcasting transaction"
        );
        self.api
            .call(
                ApiNamespace::NetworkBroadcast,
                "broadcast_transaction_synchronous",
                vec![transaction.value()],
            )
            .await
    }
}
