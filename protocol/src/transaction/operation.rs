//! Operations and their common envelope.
//!
//! Every operation serializes the same way: the opcode byte, the fee, then
//! the payload fields in declaration order. The JSON form is the pair
//! `[opcode, {fee, ...fields}]`. Payload structs only have to list their
//! fields through [`ChainObject`]; the envelope is handled here.

use serde_json::{Map, Value};

use crate::codec::asset::{ASSET_SPACE, ASSET_TYPE};
use crate::codec::{Asset, ChainValue, ObjectId};
use crate::config::{ACCOUNT_SPACE, ACCOUNT_TYPE};

use super::account::{AccountCreate, AccountRoleUpdate, AccountUpdate};
use super::poll::{
    PollCreate, PollVote, PollVoteDelegationAccept, PollVoteDelegationAcceptAll,
    PollVoteDelegationCreate, PollVoteDelegationReject, PollVoteDelegationWithdraw,
};

// ---------------------------------------------------------------------------
// Field lists
// ---------------------------------------------------------------------------

/// A struct that serializes as its fields in order, keyed by snake_case
/// name in JSON and concatenated in bytes.
pub trait ChainObject {
    /// Calls `visit` once per field, in wire order.
    fn visit_fields(&self, visit: &mut dyn FnMut(&'static str, &dyn ChainValue));

    /// The JSON object of all fields.
    fn field_values(&self) -> Map<String, Value> {
        let mut object = Map::new();
        self.visit_fields(&mut |name, field| {
            object.insert(name.to_string(), field.value());
        });
        object
    }

    /// Concatenated field encodings.
    fn write_fields(&self, out: &mut Vec<u8>) {
        self.visit_fields(&mut |_, field| field.write_bytes(out));
    }
}

// ---------------------------------------------------------------------------
// Fee
// ---------------------------------------------------------------------------

/// The fee attached to every operation.
///
/// The chain does not charge in practice, so this is always zero of the
/// core asset. The paying account is tracked but never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fee {
    pub amount: Asset,
    pub paying_account: ObjectId,
}

impl Default for Fee {
    fn default() -> Self {
        Self {
            amount: Asset::new(0, ObjectId::from_parts(ASSET_SPACE, ASSET_TYPE, 0)),
            paying_account: ObjectId::from_parts(ACCOUNT_SPACE, ACCOUNT_TYPE, 0),
        }
    }
}

impl ChainValue for Fee {
    fn value(&self) -> Value {
        self.amount.value()
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        self.amount.write_bytes(out);
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

macro_rules! operations {
    ($($(#[$meta:meta])* $variant:ident = $opcode:literal),+ $(,)?) => {
        /// One state change requested by a transaction.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum Operation {
            $($(#[$meta])* $variant($variant),)+
        }

        impl Operation {
            /// The chain's numeric identifier of this operation kind.
            pub fn opcode(&self) -> u8 {
                match self {
                    $(Self::$variant(_) => $opcode,)+
                }
            }

            /// Human-readable kind, for logs.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => stringify!($variant),)+
                }
            }

            fn payload(&self) -> &dyn ChainObject {
                match self {
                    $(Self::$variant(op) => op,)+
                }
            }
        }

        $(
            impl From<$variant> for Operation {
                fn from(op: $variant) -> Self {
                    Self::$variant(op)
                }
            }
        )+
    };
}

operations! {
    /// Registers a new account.
    AccountCreate = 0x00,
    /// Changes profile data or keys of an existing account.
    AccountUpdate = 0x01,
    /// Grants or revokes account roles. Admin only.
    AccountRoleUpdate = 0x02,
    /// Opens a new poll. Signed with the owner key.
    PollCreate = 0x0F,
    /// Casts a vote. Signed with the active key.
    PollVote = 0x10,
    PollVoteDelegationCreate = 0x11,
    PollVoteDelegationWithdraw = 0x12,
    PollVoteDelegationAccept = 0x13,
    PollVoteDelegationAcceptAll = 0x14,
    PollVoteDelegationReject = 0x15,
}

impl Operation {
    /// The zero fee every operation carries.
    pub fn fee(&self) -> Fee {
        Fee::default()
    }
}

impl ChainValue for Operation {
    fn value(&self) -> Value {
        let mut object = Map::new();
        object.insert("fee".to_string(), self.fee().value());
        object.extend(self.payload().field_values());
        Value::Array(vec![Value::from(self.opcode()), Value::Object(object)])
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(self.opcode());
        self.fee().write_bytes(out);
        self.payload().write_fields(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(text: &str) -> ObjectId {
        text.parse().unwrap()
    }

    #[test]
    fn fee_is_zero_core_asset() {
        let fee = Fee::default();
        assert_eq!(fee.amount.asset_id.to_string(), crate::config::FEE_ASSET_ID);
        assert_eq!(fee.paying_account.to_string(), crate::config::FEE_PAYING_ACCOUNT);
        assert_eq!(fee.bytes(), "000000000000000000");
        assert_eq!(
            fee.value(),
            serde_json::json!({"amount": 0, "asset_id": "1.3.0"})
        );
    }

    #[test]
    fn poll_vote_envelope() {
        let op = Operation::from(PollVote {
            account: id("1.2.5"),
            variant: id("1.11.7"),
        });
        assert_eq!(op.opcode(), 0x10);
        assert_eq!(op.name(), "PollVote");
        assert_eq!(op.bytes(), "100000000000000000000507");
        assert_eq!(
            op.value(),
            serde_json::json!([16, {
                "fee": {"amount": 0, "asset_id": "1.3.0"},
                "account": "1.2.5",
                "variant": "1.11.7",
            }])
        );
    }

    #[test]
    fn accept_all_has_single_field() {
        let op = Operation::from(PollVoteDelegationAcceptAll {
            delegatee: id("1.2.300"),
        });
        // 300 = 0xac 0x02 as a varint.
        assert_eq!(op.bytes(), "14000000000000000000ac02");
    }
}
