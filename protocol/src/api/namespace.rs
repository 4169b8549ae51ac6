//! Node-side plugin names.

use std::fmt;

use serde_json::Value;

/// The plugin a call is routed to. Sent as the first element of the
/// `call` params.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiNamespace {
    Database,
    NetworkBroadcast,
    Poll,
    /// The login plugin is addressed by number, not by name.
    Login,
}

impl ApiNamespace {
    /// The JSON value the node expects in the namespace slot.
    pub fn value(self) -> Value {
        match self {
            Self::Database => Value::from("database"),
            Self::NetworkBroadcast => Value::from("network_broadcast"),
            Self::Poll => Value::from("poll"),
            Self::Login => Value::from(1),
        }
    }
}

impl fmt::Display for ApiNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Value::String(name) => f.write_str(&name),
            other => write!(f, "{other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_values() {
        assert_eq!(ApiNamespace::Database.value(), json!("database"));
        assert_eq!(ApiNamespace::NetworkBroadcast.value(), json!("network_broadcast"));
        assert_eq!(ApiNamespace::Poll.value(), json!("poll"));
        assert_eq!(ApiNamespace::Login.value(), json!(1));
    }

    #[test]
    fn display_matches_wire() {
        assert_eq!(ApiNamespace::NetworkBroadcast.to_string(), "network_broadcast");
        assert_eq!(ApiNamespace::Login.to_string(), "1");
    }
}
