//! # Transaction Module
//!
//! Construction and signing of Delegato transactions. Every state change on
//! the chain (registering an account, opening a poll, casting a vote) is an
//! [`Operation`] carried inside a transaction.
//!
//! ## Architecture
//!
//! ```text
//! operation.rs   Operation envelope (opcode, fee, fields) and the Fee
//! account.rs     Account registration, updates and roles
//! poll.rs        Polls, votes and vote delegation
//! builder.rs     TransactionBuilder: reference block, expiration, operations
//! types.rs       UnsignedTransaction / SignedTransaction and the broadcaster seam
//! signing.rs     Signing message construction and LogicError
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: [`TransactionBuilder`] produces an [`UnsignedTransaction`].
//! 2. **Sign**: [`UnsignedTransaction::sign`] consumes it and returns a
//!    [`SignedTransaction`].
//! 3. **Broadcast**: [`SignedTransaction::broadcast`] hands it to any
//!    [`TransactionBroadcaster`], usually the [`Api`](crate::api::Api).

pub mod account;
pub mod builder;
pub mod operation;
pub mod poll;
pub mod signing;
pub mod types;

pub use account::{AccountCreate, AccountRole, AccountRoleUpdate, AccountUpdate, SecretAnswer};
pub use builder::TransactionBuilder;
pub use operation::{ChainObject, Fee, Operation};
pub use poll::{
    localized, Language, LocalizedText, PollCreate, PollVariant, PollVote,
    PollVoteDelegationAccept, PollVoteDelegationAcceptAll, PollVoteDelegationCreate,
    PollVoteDelegationReject, PollVoteDelegationWithdraw,
};
pub use signing::LogicError;
pub use types::{SignedTransaction, TransactionBroadcaster, UnsignedTransaction};
