//! JSON-RPC 2.0 message shapes.
//!
//! Outbound we only ever send requests with positional params. Inbound we
//! do not trust the server to be well-formed, so instead of deserializing
//! into a response struct every frame is sorted into an [`Inbound`] by
//! looking at which members are present.

use serde::Serialize;
use serde_json::{Map, Value};

use super::error::RpcError;
use crate::config::JSONRPC_VERSION;

pub(crate) const MISSING_RESULT: &str = "The result member or error member MUST be included.";
pub(crate) const NOT_AN_OBJECT: &str = "Server MUST reply with Object.";
pub(crate) const UNKNOWN_CALL: &str = "Method call cannot be found.";

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest<'a> {
    /// Always "2.0".
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: &'a [Value],
    /// Echoed back in the response.
    pub id: u64,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: &'a [Value]) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
            id,
        }
    }
}

/// What a received frame turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Carries an `id`: settles that call one way or the other.
    Response {
        id: Value,
        outcome: Result<Value, RpcError>,
    },
    /// No `id` but a `result`: a server push.
    Notification(Value),
    /// No `id` and no `result`. Nothing to do.
    Ignored,
    /// Not a JSON object at all.
    Malformed,
}

impl Inbound {
    pub fn classify(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(object)) => Self::from_object(object),
            _ => Self::Malformed,
        }
    }

    fn from_object(mut object: Map<String, Value>) -> Self {
        match object.remove("id") {
            Some(id) => {
                let outcome = if let Some(result) = object.remove("result") {
                    Ok(result)
                } else if let Some(error) = object.remove("error") {
                    Err(RpcError::Method(error))
                } else {
                    Err(RpcError::Protocol(MISSING_RESULT.to_string()))
                };
                Self::Response { id, outcome }
            }
            None => match object.remove("result") {
                Some(result) => Self::Notification(result),
                None => Self::Ignored,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_wire_shape() {
        let params = [json!("database"), json!("get_objects"), json!([["1.2.0"]])];
        let request = RpcRequest::new(7, "call", &params);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "method": "call",
                "params": ["database", "get_objects", [["1.2.0"]]],
                "id": 7,
            })
        );
    }

    #[test]
    fn result_resolves() {
        assert_eq!(
            Inbound::classify(r#"{"jsonrpc":"2.0","id":1,"result":{"a":1}}"#),
            Inbound::Response {
                id: json!(1),
                outcome: Ok(json!({"a": 1})),
            }
        );
    }

    #[test]
    fn null_result_still_resolves() {
        assert_eq!(
            Inbound::classify(r#"{"id":3,"result":null}"#),
            Inbound::Response {
                id: json!(3),
                outcome: Ok(Value::Null),
            }
        );
    }

    #[test]
    fn error_rejects_with_payload() {
        assert_eq!(
            Inbound::classify(r#"{"id":2,"error":{"code":-32000,"message":"boom"}}"#),
            Inbound::Response {
                id: json!(2),
                outcome: Err(RpcError::Method(json!({"code": -32000, "message": "boom"}))),
            }
        );
    }

    #[test]
    fn response_without_result_or_error_is_a_protocol_error() {
        assert_eq!(
            Inbound::classify(r#"{"id":4}"#),
            Inbound::Response {
                id: json!(4),
                outcome: Err(RpcError::Protocol(MISSING_RESULT.to_string())),
            }
        );
    }

    #[test]
    fn pushes_and_noise() {
        assert_eq!(
            Inbound::classify(r#"{"method":"notice","result":[1,2]}"#),
            Inbound::Notification(json!([1, 2]))
        );
        assert_eq!(Inbound::classify(r#"{"method":"notice"}"#), Inbound::Ignored);
    }

    #[test]
    fn non_objects_are_malformed() {
        for text in ["[1,2]", "42", "\"id\"", "null", "{not json"] {
            assert_eq!(Inbound::classify(text), Inbound::Malformed, "{text}");
        }
    }
}
