//! The two states of a transaction.
//!
//! An [`UnsignedTransaction`] can only be signed, and signing consumes it.
//! A [`SignedTransaction`] can only be inspected and broadcast. Signing
//! twice or broadcasting before signing therefore does not compile.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::codec::{ChainArray, ChainTime, ChainValue, UInt16, UInt32};
use crate::crypto::{PrivateKey, Signature};

use super::operation::Operation;
use super::signing::{sign_message, signing_message, LogicError};

/// Fields shared by both states. Signatures are not part of the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TransactionBody {
    ref_block_num: UInt16,
    ref_block_prefix: UInt32,
    expiration: ChainTime,
    operations: ChainArray<Operation>,
}

impl TransactionBody {
    fn value_with(&self, signatures: Value) -> Value {
        json!({
            "ref_block_num": self.ref_block_num.value(),
            "ref_block_prefix": self.ref_block_prefix.value(),
            "expiration": self.expiration.value(),
            "operations": self.operations.value(),
            "extensions": [],
            "signatures": signatures,
        })
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        self.ref_block_num.write_bytes(out);
        self.ref_block_prefix.write_bytes(out);
        self.expiration.write_bytes(out);
        self.operations.write_bytes(out);
        // No extensions.
        out.push(0);
    }
}

// ---------------------------------------------------------------------------
// UnsignedTransaction
// ---------------------------------------------------------------------------

/// A transaction ready to be signed. Built by
/// [`TransactionBuilder`](super::TransactionBuilder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    body: TransactionBody,
}

impl UnsignedTransaction {
    pub(super) fn new(
        ref_block_num: u16,
        ref_block_prefix: u32,
        expiration: ChainTime,
        operations: Vec<Operation>,
    ) -> Self {
        Self {
            body: TransactionBody {
                ref_block_num: ref_block_num.into(),
                ref_block_prefix: ref_block_prefix.into(),
                expiration,
                operations: operations.into(),
            },
        }
    }

    pub fn ref_block_num(&self) -> u16 {
        self.body.ref_block_num.get()
    }

    pub fn ref_block_prefix(&self) -> u32 {
        self.body.ref_block_prefix.get()
    }

    pub fn expiration(&self) -> ChainTime {
        self.body.expiration
    }

    pub fn operations(&self) -> &[Operation] {
        self.body.operations.items()
    }

    /// Signs with every key in `keys` for the chain identified by
    /// `chain_id` (hex).
    pub fn sign(
        self,
        chain_id: &str,
        keys: &[&PrivateKey],
    ) -> Result<SignedTransaction, LogicError> {
        let message = signing_message(chain_id, &self.to_bytes())?;
        let signatures = sign_message(&message, keys)?;
        tracing::debug!(
            operations = self.body.operations.len(),
            signatures = signatures.len(),
            "signed transaction"
        );
        Ok(SignedTransaction {
            body: self.body,
            signatures: signatures.into(),
        })
    }
}

impl ChainValue for UnsignedTransaction {
    fn value(&self) -> Value {
        self.body.value_with(json!([]))
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        self.body.write_bytes(out)
    }
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// A transaction carrying its signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    body: TransactionBody,
    signatures: ChainArray<Signature>,
}

impl SignedTransaction {
    pub fn signatures(&self) -> &[Signature] {
        self.signatures.items()
    }

    pub fn expiration(&self) -> ChainTime {
        self.body.expiration
    }

    pub fn operations(&self) -> &[Operation] {
        self.body.operations.items()
    }

    /// Sends the transaction through `broadcaster`. May be called again,
    /// for instance after a dropped connection.
    pub async fn broadcast<B>(&self, broadcaster: &B) -> Result<Value, B::Error>
    where
        B: TransactionBroadcaster + ?Sized,
    {
        broadcaster.broadcast_transaction(self).await
    }
}

impl ChainValue for SignedTransaction {
    fn value(&self) -> Value {
        self.body.value_with(self.signatures.value())
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        self.body.write_bytes(out)
    }
}

// ---------------------------------------------------------------------------
// Broadcasting
// ---------------------------------------------------------------------------

/// Something that can deliver a signed transaction to the chain.
#[async_trait]
pub trait TransactionBroadcaster: Send + Sync {
    type Error;

    async fn broadcast_transaction(
        &self,
        transaction: &SignedTransaction,
    ) -> Result<Value, Self::Error>;
}
