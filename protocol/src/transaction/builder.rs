//! Transaction construction via the builder pattern.
//!
//! A transaction references a recent block so the node can reject it on a
//! fork that does not contain that block. The reference is the low 16 bits
//! of the block number plus four bytes of the block id, both taken from the
//! dynamic global properties at build time.
//!
//! The builder does not sign. That happens on the
//! [`UnsignedTransaction`] it returns, which keeps construction testable
//! without key material.

use crate::codec::{decode_hex, ChainTime, ValidationError};
use crate::config::TRANSACTION_EXPIRATION;

use super::operation::Operation;
use super::types::UnsignedTransaction;

/// Byte range of the block id that becomes `ref_block_prefix`.
const PREFIX_RANGE: std::ops::Range<usize> = 4..8;

/// Fluent builder for [`UnsignedTransaction`].
///
/// ```rust
/// use delegato_protocol::transaction::{PollVote, TransactionBuilder};
///
/// let tx = TransactionBuilder::new(42, "0000002a1122334455667788")?
///     .operation(PollVote {
///         account: "1.2.5".parse()?,
///         variant: "1.11.7".parse()?,
///     })
///     .build()?;
/// assert_eq!(tx.ref_block_num(), 42);
/// assert_eq!(tx.ref_block_prefix(), 0x4433_2211);
/// # Ok::<(), delegato_protocol::codec::ValidationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    ref_block_num: u16,
    ref_block_prefix: u32,
    expiration: Option<ChainTime>,
    operations: Vec<Operation>,
}

impl TransactionBuilder {
    /// References the head block described by `head_block_number` and
    /// `head_block_id` (hex). The id must be at least 8 bytes long.
    pub fn new(head_block_number: u32, head_block_id: &str) -> Result<Self, ValidationError> {
        let id = decode_hex(head_block_id)?;
        let prefix: [u8; 4] = id
            .get(PREFIX_RANGE)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(ValidationError::InvalidLength {
                expected: PREFIX_RANGE.end,
                actual: id.len(),
            })?;

        Ok(Self {
            ref_block_num: (head_block_number & 0xFFFF) as u16,
            ref_block_prefix: u32::from_le_bytes(prefix),
            expiration: None,
            operations: Vec::new(),
        })
    }

    /// Sets the expiration explicitly.
    ///
    /// If not called, `build()` uses the current time plus
    /// [`TRANSACTION_EXPIRATION`].
    pub fn expiration(mut self, expiration: ChainTime) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Appends one operation.
    pub fn operation(mut self, operation: impl Into<Operation>) -> Self {
        self.operations.push(operation.into());
        self
    }

    /// Appends several operations, keeping their order.
    pub fn operations(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.operations.extend(operations);
        self
    }

    pub fn build(self) -> Result<UnsignedTransaction, ValidationError> {
        let expiration = match self.expiration {
            Some(expiration) => expiration,
            None => default_expiration()?,
        };
        Ok(UnsignedTransaction::new(
            self.ref_block_num,
            self.ref_block_prefix,
            expiration,
            self.operations,
        ))
    }
}

fn default_expiration() -> Result<ChainTime, ValidationError> {
    let seconds = u32::try_from(TRANSACTION_EXPIRATION.as_secs()).unwrap_or(u32::MAX);
    ChainTime::now()?.checked_add_seconds(seconds)
}
