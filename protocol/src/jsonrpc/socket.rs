//! The websocket client.
//!
//! A connection is two tasks: a writer draining an mpsc queue into the
//! socket, and a reader sorting incoming frames into call results, pushes
//! and faults. Callers never touch the socket directly; they enqueue a
//! request and wait on the oneshot their id was registered under.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use super::error::RpcError;
use super::message::{Inbound, RpcRequest, NOT_AN_OBJECT, UNKNOWN_CALL};
use super::pending::PendingCalls;
use crate::config::EVENT_CHANNEL_CAPACITY;

/// Things subscribers hear about.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Connected,
    /// Raised once per connection, whoever closed it.
    Disconnected,
    /// A `result` pushed without an `id`.
    Notification(Value),
    /// A frame that could not be attributed to any call.
    Fault(RpcError),
}

/// The live half of a connection.
struct Connection {
    generation: u64,
    outbound: mpsc::UnboundedSender<Message>,
    reader: JoinHandle<()>,
}

struct Shared {
    pending: PendingCalls,
    events: broadcast::Sender<TransportEvent>,
    connection: Mutex<Option<Connection>>,
    generation: AtomicU64,
}

impl Shared {
    fn emit(&self, event: TransportEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Tears down connection `generation` if it is still the current one.
    /// Only the first caller for a given connection gets `Some`.
    fn take_connection(&self, generation: Option<u64>) -> Option<Connection> {
        let mut slot = self.connection.lock();
        match (slot.as_ref(), generation) {
            (Some(current), Some(expected)) if current.generation != expected => None,
            _ => slot.take(),
        }
    }

    fn finish(&self, connection: Connection, reason: &str) {
        let rejected = self.pending.reject_all(&RpcError::disconnected());
        tracing::info!(reason, rejected_calls = rejected, "websocket disconnected");
        drop(connection);
        self.emit(TransportEvent::Disconnected);
    }

    fn handle_text(&self, text: &str) {
        match Inbound::classify(text) {
            Inbound::Response { id, outcome } => {
                tracing::debug!(%id, ok = outcome.is_ok(), "received response");
                if !self.pending.settle(&id, outcome) {
                    tracing::warn!(%id, "response for unknown call");
                    self.emit(TransportEvent::Fault(RpcError::Internal(UNKNOWN_CALL.to_string())));
                }
            }
            Inbound::Notification(result) => {
                tracing::debug!("received notification");
                self.emit(TransportEvent::Notification(result));
            }
            Inbound::Ignored => tracing::trace!("ignoring message without id or result"),
            Inbound::Malformed => {
                tracing::warn!(len = text.len(), "received non-object message");
                self.emit(TransportEvent::Fault(RpcError::Protocol(NOT_AN_OBJECT.to_string())));
            }
        }
    }
}

/// A JSON-RPC 2.0 client over a single websocket.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct JsonRpcWebSocket {
    shared: Arc<Shared>,
}

impl Default for JsonRpcWebSocket {
    fn default() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                pending: PendingCalls::new(),
                events,
                connection: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }
}

impl JsonRpcWebSocket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a connection to `address`, replacing any current one.
    pub async fn connect(&self, address: &str) -> Result<(), RpcError> {
        self.disconnect();

        let (socket, _) = tokio_tungstenite::connect_async(address).await.map_err(|e| {
            tracing::error!(address, error = %e, "websocket connect failed");
            RpcError::Connection(format!("Cannot connect to {address}"))
        })?;
        let (mut sink, mut stream) = socket.split();
        let (outbound, mut queue) = mpsc::unbounded_channel::<Message>();

        let generation = self.shared.generation.fetch_add(1, Ordering::Relaxed) + 1;

        tokio::spawn(async move {
            while let Some(message) = queue.recv().await {
                let closing = matches!(message, Message::Close(_));
                if let Err(e) = sink.send(message).await {
                    tracing::error!(error = %e, "websocket write failed");
                    break;
                }
                if closing {
                    break;
                }
            }
        });

        // Hold the slot until the handle is stored so a connection that dies
        // immediately still finds itself there when tearing down.
        let mut slot = self.shared.connection.lock();
        let shared = Arc::clone(&self.shared);
        let reader = tokio::spawn(async move {
            let reason = loop {
                match stream.next().await {
                    Some(Ok(Message::Text(text))) => shared.handle_text(text.as_str()),
                    Some(Ok(Message::Binary(data))) => {
                        shared.handle_text(&String::from_utf8_lossy(&data))
                    }
                    Some(Ok(Message::Close(_))) => break "closed by server",
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "websocket read failed");
                        break "socket error";
                    }
                    None => break "stream ended",
                }
            };
            if let Some(connection) = shared.take_connection(Some(generation)) {
                shared.finish(connection, reason);
            }
        });

        *slot = Some(Connection {
            generation,
            outbound,
            reader,
        });
        drop(slot);
        tracing::info!(address, "websocket connected");
        self.shared.emit(TransportEvent::Connected);
        Ok(())
    }

    /// Closes the connection, if any, and fails every pending call.
    pub fn disconnect(&self) {
        if let Some(connection) = self.shared.take_connection(None) {
            let _ = connection.outbound.send(Message::Close(None));
            connection.reader.abort();
            self.shared.finish(connection, "closed by client");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.shared.connection.lock().is_some()
    }

    /// Calls `method` with positional `params` and waits for its result.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        let response = {
            // Register and enqueue under the slot lock: a teardown either drains
            // this call or finds the slot already empty.
            let slot = self.shared.connection.lock();
            let connection = slot.as_ref().ok_or_else(RpcError::not_connected)?;

            let (id, response) = self.shared.pending.register();
            let text = match serde_json::to_string(&RpcRequest::new(id, method, &params)) {
                Ok(text) => text,
                Err(e) => {
                    self.shared.pending.cancel(id);
                    return Err(RpcError::Internal(e.to_string()));
                }
            };

            tracing::debug!(id, method, "sending request");
            if connection.outbound.send(Message::text(text)).is_err() {
                self.shared.pending.cancel(id);
                return Err(RpcError::not_connected());
            }
            response
        };

        response.await.unwrap_or_else(|_| Err(RpcError::disconnected()))
    }

    /// Listens for [`TransportEvent`]s. Drop the receiver to stop.
    pub fn subscribe(&self) -> broadcast::Receiver<TransportEvent> {
        self.shared.events.subscribe()
    }

    /// Number of calls still waiting for a response.
    pub fn pending_calls(&self) -> usize {
        self.shared.pending.len()
    }
}

impl Drop for JsonRpcWebSocket {
    fn drop(&mut self) {
        if let Some(connection) = self.shared.take_connection(None) {
            let _ = connection.outbound.send(Message::Close(None));
            connection.reader.abort();
            self.shared.pending.reject_all(&RpcError::disconnected());
        }
    }
}
