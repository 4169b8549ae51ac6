//! # JSON-RPC 2.0 over WebSocket
//!
//! The Delegato API node speaks JSON-RPC 2.0 on a single websocket. Calls
//! are multiplexed by id and may complete in any order; the node can also
//! push results nobody asked for.
//!
//! ```text
//! error.rs     RpcError
//! message.rs   request shape and inbound frame classification
//! pending.rs   id allocation and the table of calls awaiting a result
//! socket.rs    JsonRpcWebSocket: connection tasks, calls, events
//! ```

pub mod error;
pub mod message;
pub mod pending;
pub mod socket;

pub use error::RpcError;
pub use message::{Inbound, RpcRequest};
pub use pending::PendingCalls;
pub use socket::{JsonRpcWebSocket, TransportEvent};
