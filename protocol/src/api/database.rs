//! The `database` plugin: chain state, blocks and objects.
//!
//! Results arrive with the node's snake_case keys and are decoded straight
//! into the structs below. Fields the client has no use for are kept in
//! `extra` so nothing the node sends is silently lost.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::namespace::ApiNamespace;
use super::{Api, ApiError};
use crate::codec::ObjectId;

/// Parameters fixed at genesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainProperties {
    pub id: ObjectId,
    /// Hex id the client signs against.
    pub chain_id: String,
    pub immutable_parameters: ImmutableParameters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmutableParameters {
    pub min_committee_member_count: u16,
    pub min_witness_count: u16,
    pub num_special_accounts: u32,
    pub num_special_assets: u32,
}

/// Chain state that changes with every block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicGlobalProperties {
    pub id: ObjectId,
    pub head_block_number: u32,
    /// Hex id of the head block; its bytes 4..8 become `ref_block_prefix`.
    pub head_block_id: String,
    /// Head block time, `YYYY-MM-DDTHH:MM:SS`.
    pub time: String,
    pub current_witness: ObjectId,
    #[serde(default)]
    pub last_irreversible_block_num: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A block as returned by `get_block`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub previous: String,
    pub timestamp: String,
    pub witness: ObjectId,
    pub transaction_merkle_root: String,
    pub witness_signature: String,
    #[serde(default)]
    pub transactions: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An account object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: ObjectId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth: u16,
    pub idnp: u64,
    pub locality: ObjectId,
    /// Authorities in their chain JSON form.
    pub owner: Value,
    pub active: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Borrowed view of [`Api`] scoped to the `database` plugin.
#[derive(Clone, Copy)]
pub struct DatabaseApi<'a> {
    api: &'a Api,
}

impl<'a> DatabaseApi<'a> {
    pub(super) fn new(api: &'a Api) -> Self {
        Self { api }
    }

    /// Block `number`, or `None` if the chain is not that long yet.
    pub async fn get_block(&self, number: u32) -> Result<Option<Block>, ApiError> {
        self.api
            .call_as(ApiNamespace::Database, "get_block", vec![json!(number)])
            .await
    }

    pub async fn get_chain_properties(&self) -> Result<ChainProperties, ApiError> {
        self.api
            .call_as(ApiNamespace::Database, "get_chain_properties", vec![])
            .await
    }

    pub async fn get_dynamic_global_properties(
        &self,
    ) -> Result<DynamicGlobalProperties, ApiError> {
        self.api
            .call_as(ApiNamespace::Database, "get_dynamic_global_properties", vec![])
            .await
    }

    /// Raw objects in the order asked for. Unknown ids come back as `null`.
    pub async fn get_objects(&self, ids: &[ObjectId]) -> Result<Vec<Value>, ApiError> {
        let ids: Vec<String> = ids.iter().map(ObjectId::to_string).collect();
        self.api
            .call_as(ApiNamespace::Database, "get_objects", vec![json!(ids)])
            .await
    }

    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, ApiError> {
        self.api
            .call_as(ApiNamespace::Database, "get_account_by_email", vec![json!(email)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_global_properties_decode() {
        let dgp: DynamicGlobalProperties = serde_json::from_value(json!({
            "id": "2.1.0",
            "head_block_number": 1234,
            "head_block_id": "000004d2aabbccdd00112233",
            "time": "2020-05-01T10:00:00",
            "current_witness": "1.6.3",
            "last_irreversible_block_num": 1220,
            "recently_missed_count": 0,
            "dynamic_flags": 0
        }))
        .unwrap();
        assert_eq!(dgp.id.to_string(), "2.1.0");
        assert_eq!(dgp.head_block_number, 1234);
        assert_eq!(dgp.last_irreversible_block_num, 1220);
        assert_eq!(dgp.extra.get("dynamic_flags"), Some(&json!(0)));
    }

    #[test]
    fn chain_properties_decode() {
        let props: ChainProperties = serde_json::from_value(json!({
            "id": "2.11.0",
            "chain_id": "74b66242d0ac8c5c447d04ae10460002fb5ee9c5013dd0d46a7296e259ae95a8",
            "immutable_parameters": {
                "min_committee_member_count": 11,
                "min_witness_count": 11,
                "num_special_accounts": 0,
                "num_special_assets": 0
            }
        }))
        .unwrap();
        assert_eq!(props.immutable_parameters.min_witness_count, 11);
        assert_eq!(props.chain_id.len(), 64);
    }

    #[test]
    fn missing_account_is_none() {
        let account: Option<Account> = serde_json::from_value(Value::Null).unwrap();
        assert!(account.is_none());
    }
}
