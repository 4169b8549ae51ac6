//! Transport errors.

use serde_json::Value;
use thiserror::Error;

/// Everything that can go wrong between issuing a call and getting its
/// result.
///
/// `Clone` because the same error is delivered to every pending call when
/// a connection drops, and to every event subscriber.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RpcError {
    /// The socket is closed, could not be opened, or dropped mid-call.
    #[error("connection error: {0}")]
    Connection(String),

    /// The server broke the JSON-RPC 2.0 contract.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A message could not be matched to local state.
    #[error("internal error: {0}")]
    Internal(String),

    /// The server answered the call with an error object.
    #[error("an error occurred on method call: {0}")]
    Method(Value),
}

impl RpcError {
    pub(crate) fn not_connected() -> Self {
        Self::Connection("WebSocket is not connected.".to_string())
    }

    pub(crate) fn disconnected() -> Self {
        Self::Connection("WebSocket has been disconnected.".to_string())
    }

    /// The `message` member of a [`RpcError::Method`] payload, if any.
    pub fn method_message(&self) -> Option<&str> {
        match self {
            Self::Method(error) => error.get("message").and_then(Value::as_str),
            _ => None,
        }
    }

    /// The numeric `code` member of a [`RpcError::Method`] payload, if any.
    pub fn method_code(&self) -> Option<i64> {
        match self {
            Self::Method(error) => error.get("code").and_then(Value::as_i64),
            _ => None,
        }
    }
}
