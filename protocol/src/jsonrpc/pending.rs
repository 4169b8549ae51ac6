//! Registry of calls awaiting a response.
//!
//! Each call registers a oneshot sender under a fresh id before its request
//! is written, and the reader task settles it when the matching response
//! arrives. Responses may arrive in any order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;

use super::error::RpcError;
use crate::config::FIRST_REQUEST_ID;

pub type CallResult = Result<Value, RpcError>;

#[derive(Debug)]
pub struct PendingCalls {
    next_id: AtomicU64,
    calls: Mutex<HashMap<u64, oneshot::Sender<CallResult>>>,
}

impl Default for PendingCalls {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(FIRST_REQUEST_ID),
            calls: Mutex::new(HashMap::new()),
        }
    }
}

impl PendingCalls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next id and the receiver its result will arrive on.
    /// Ids are never reused, even across reconnects.
    pub fn register(&self) -> (u64, oneshot::Receiver<CallResult>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.calls.lock().insert(id, tx);
        (id, rx)
    }

    /// Settles the call named by `id`. Returns `false` if there is no such
    /// call, including when `id` is not an unsigned integer.
    pub fn settle(&self, id: &Value, outcome: CallResult) -> bool {
        let Some(sender) = id.as_u64().and_then(|id| self.calls.lock().remove(&id)) else {
            return false;
        };
        // The caller may have given up waiting; that is not our problem.
        let _ = sender.send(outcome);
        true
    }

    /// Forgets a call whose request never made it out.
    pub fn cancel(&self, id: u64) {
        self.calls.lock().remove(&id);
    }

    /// Fails every outstanding call with `error`.
    pub fn reject_all(&self, error: &RpcError) -> usize {
        let drained: Vec<_> = self.calls.lock().drain().collect();
        let count = drained.len();
        for (_, sender) in drained {
            let _ = sender.send(Err(error.clone()));
        }
        count
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_start_at_zero_and_increase() {
        let pending = PendingCalls::new();
        let (a, _ra) = pending.register();
        let (b, _rb) = pending.register();
        assert_eq!((a, b), (0, 1));
        assert_eq!(pending.len(), 2);
    }

    #[tokio::test]
    async fn out_of_order_settlement() {
        let pending = PendingCalls::new();
        let (first, rx_first) = pending.register();
        let (second, rx_second) = pending.register();

        assert!(pending.settle(&json!(second), Ok(json!("two"))));
        assert!(pending.settle(&json!(first), Ok(json!("one"))));

        assert_eq!(rx_first.await.unwrap(), Ok(json!("one")));
        assert_eq!(rx_second.await.unwrap(), Ok(json!("two")));
        assert!(pending.is_empty());
    }

    #[test]
    fn unknown_ids_are_reported() {
        let pending = PendingCalls::new();
        let (id, _rx) = pending.register();
        assert!(!pending.settle(&json!(id + 1), Ok(Value::Null)));
        assert!(!pending.settle(&json!("1"), Ok(Value::Null)));
        assert!(pending.settle(&json!(id), Ok(Value::Null)));
        assert!(!pending.settle(&json!(id), Ok(Value::Null)));
    }

    #[tokio::test]
    async fn reject_all_drains() {
        let pending = PendingCalls::new();
        let (_, rx1) = pending.register();
        let (_, rx2) = pending.register();
        let error = RpcError::disconnected();
        assert_eq!(pending.reject_all(&error), 2);
        assert_eq!(rx1.await.unwrap(), Err(error.clone()));
        assert_eq!(rx2.await.unwrap(), Err(error));
        assert!(pending.is_empty());
    }

    #[test]
    fn cancel_forgets_the_call() {
        let pending = PendingCalls::new();
        let (id, _rx) = pending.register();
        pending.cancel(id);
        assert!(!pending.settle(&json!(id), Ok(Value::Null)));
    }
}
