//! Account operations: registration, profile updates and role changes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{
    decode_hex, ByteReader, ChainArray, ChainDecode, ChainOptional, ChainString, ChainValue,
    ObjectId, UInt16, UInt64, ValidationError,
};
use crate::crypto::{sha256, PublicKey};

use super::operation::ChainObject;

/// Length of the hashed secret answer.
pub const SECRET_ANSWER_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// AccountRole
// ---------------------------------------------------------------------------

/// Permissions an account can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Citizen,
    Organizer,
    Admin,
}

impl AccountRole {
    pub fn code(self) -> u8 {
        match self {
            Self::Citizen => 0,
            Self::Organizer => 1,
            Self::Admin => 255,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, ValidationError> {
        match code {
            0 => Ok(Self::Citizen),
            1 => Ok(Self::Organizer),
            255 => Ok(Self::Admin),
            other => Err(ValidationError::UnknownCode {
                type_name: "AccountRole",
                code: u64::from(other),
            }),
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Citizen => write!(f, "citizen"),
            Self::Organizer => write!(f, "organizer"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// Encoded as a single `UInt8`.
impl ChainValue for AccountRole {
    fn value(&self) -> Value {
        Value::from(self.code())
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(self.code());
    }
}

impl ChainDecode for AccountRole {
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, ValidationError> {
        Self::from_code(reader.read_u8("AccountRole")?)
    }
}

// ---------------------------------------------------------------------------
// SecretAnswer
// ---------------------------------------------------------------------------

/// The 32-byte digest of an account's recovery answer. The plain answer
/// never leaves the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretAnswer([u8; SECRET_ANSWER_LENGTH]);

impl SecretAnswer {
    /// Hashes a plain-text answer.
    pub fn digest(answer: &str) -> Self {
        Self(sha256(answer.as_bytes()))
    }

    /// Wraps an already computed digest given as hex.
    pub fn from_hex(hex: &str) -> Result<Self, ValidationError> {
        let raw = decode_hex(hex)?;
        raw.as_slice()
            .try_into()
            .map(Self)
            .map_err(|_| ValidationError::InvalidLength {
                expected: SECRET_ANSWER_LENGTH,
                actual: raw.len(),
            })
    }
}

impl ChainValue for SecretAnswer {
    fn value(&self) -> Value {
        Value::String(hex::encode(self.0))
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Registers a new citizen account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCreate {
    pub first_name: ChainString,
    pub last_name: ChainString,
    /// Year of birth.
    pub birth: UInt16,
    /// National identification number.
    pub idnp: UInt64,
    pub email: ChainString,
    pub locality: ObjectId,
    pub secret_question: ChainString,
    pub secret_answer: SecretAnswer,
    pub owner: PublicKey,
    pub active: PublicKey,
}

impl ChainObject for AccountCreate {
    fn visit_fields(&self, visit: &mut dyn FnMut(&'static str, &dyn ChainValue)) {
        visit("first_name", &self.first_name);
        visit("last_name", &self.last_name);
        visit("birth", &self.birth);
        visit("idnp", &self.idnp);
        visit("email", &self.email);
        visit("locality", &self.locality);
        visit("secret_question", &self.secret_question);
        visit("secret_answer", &self.secret_answer);
        visit("owner", &self.owner);
        visit("active", &self.active);
    }
}

/// Updates an account. Absent fields are left untouched by the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountUpdate {
    pub account: ObjectId,
    pub first_name: ChainOptional<ChainString>,
    pub last_name: ChainOptional<ChainString>,
    pub birth: ChainOptional<UInt16>,
    pub idnp: ChainOptional<UInt64>,
    pub locality: ChainOptional<ObjectId>,
    pub owner: ChainOptional<PublicKey>,
    pub active: ChainOptional<PublicKey>,
}

impl AccountUpdate {
    /// An update of `account` that changes nothing yet.
    pub fn new(account: ObjectId) -> Self {
        Self {
            account,
            first_name: ChainOptional::none(),
            last_name: ChainOptional::none(),
            birth: ChainOptional::none(),
            idnp: ChainOptional::none(),
            locality: ChainOptional::none(),
            owner: ChainOptional::none(),
            active: ChainOptional::none(),
        }
    }
}

impl ChainObject for AccountUpdate {
    fn visit_fields(&self, visit: &mut dyn FnMut(&'static str, &dyn ChainValue)) {
        visit("account", &self.account);
        visit("first_name", &self.first_name);
        visit("last_name", &self.last_name);
        visit("birth", &self.birth);
        visit("idnp", &self.idnp);
        visit("locality", &self.locality);
        visit("owner", &self.owner);
        visit("active", &self.active);
    }
}

/// Replaces the role set of `account`. Must be issued by an admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRoleUpdate {
    pub admin: ObjectId,
    pub account: ObjectId,
    pub roles: ChainArray<AccountRole>,
}

impl ChainObject for AccountRoleUpdate {
    fn visit_fields(&self, visit: &mut dyn FnMut(&'static str, &dyn ChainValue)) {
        visit("admin", &self.admin);
        visit("account", &self.account);
        visit("roles", &self.roles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{KeyRole, PrivateKey};
    use crate::transaction::Operation;
    use serde_json::json;

    fn id(text: &str) -> ObjectId {
        text.parse().unwrap()
    }

    #[test]
    fn role_codes() {
        for role in [AccountRole::Citizen, AccountRole::Organizer, AccountRole::Admin] {
            assert_eq!(AccountRole::from_code(role.code()).unwrap(), role);
        }
        assert_eq!(AccountRole::Admin.bytes(), "ff");
        assert!(matches!(
            AccountRole::from_code(7),
            Err(ValidationError::UnknownCode { code: 7, .. })
        ));
    }

    #[test]
    fn secret_answer_must_be_32_bytes() {
        assert!(SecretAnswer::from_hex(&"ab".repeat(32)).is_ok());
        assert!(matches!(
            SecretAnswer::from_hex("abcd"),
            Err(ValidationError::InvalidLength { expected: 32, actual: 2 })
        ));
        assert_eq!(SecretAnswer::digest("blue").to_bytes(), sha256(b"blue").to_vec());
    }

    #[test]
    fn role_update_layout() {
        let op = Operation::from(AccountRoleUpdate {
            admin: id("1.2.1"),
            account: id("1.2.9"),
            roles: vec![AccountRole::Citizen, AccountRole::Organizer].into(),
        });
        assert_eq!(op.bytes(), format!("02{}0109020001", "00".repeat(9)));
        assert_eq!(op.value()[1]["roles"], json!([0, 1]));
    }

    #[test]
    fn empty_update_is_all_absent_flags() {
        let op = Operation::from(AccountUpdate::new(id("1.2.42")));
        assert_eq!(op.bytes(), format!("01{}2a{}", "00".repeat(9), "00".repeat(7)));
        assert_eq!(op.value()[1]["first_name"], Value::Null);
    }

    #[test]
    fn account_create_embeds_authorities() {
        let owner = PrivateKey::derive("new@example.com", "owner password!", KeyRole::Owner)
            .unwrap()
            .public_key()
            .clone();
        let active = PrivateKey::derive("new@example.com", "owner password!", KeyRole::Active)
            .unwrap()
            .public_key()
            .clone();
        let op = Operation::from(AccountCreate {
            first_name: "Ion".into(),
            last_name: "Popescu".into(),
            birth: UInt16::new(1990),
            idnp: UInt64::new(2_000_000_000_001),
            email: "new@example.com".into(),
            locality: id("1.16.3"),
            secret_question: "Colour?".into(),
            secret_answer: SecretAnswer::digest("blue"),
            owner: owner.clone(),
            active,
        });
        let value = op.value();
        assert_eq!(value[0], json!(0));
        assert_eq!(value[1]["owner"]["key_auths"][0][0], json!(owner.to_wif()));
        assert!(op.bytes().contains(&hex::encode(owner.compressed())));
    }
}
