//! Object identifiers (`space.type.instance`).
//!
//! Only the instance goes on the wire. Space and type are implied by the
//! field that holds the id: an `account` field is always `1.2.x`, a fee
//! asset is always `1.3.x`. Decoding therefore needs that context from the
//! caller, which is why [`ObjectId`] does not implement
//! [`ChainDecode`](super::ChainDecode).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::buffer::{decode_hex, ByteReader};
use super::error::ValidationError;
use super::varint::write_varint;
use super::ChainValue;

/// Largest instance number: the lower 48 bits of the packed form.
pub const MAX_INSTANCE: u64 = (1 << 48) - 1;

/// A chain object reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId {
    space: u8,
    type_id: u8,
    instance: u64,
}

impl ObjectId {
    pub fn new(space: u8, type_id: u8, instance: u64) -> Result<Self, ValidationError> {
        if instance > MAX_INSTANCE {
            return Err(ValidationError::OutOfRange {
                type_name: "ObjectId instance",
                value: i128::from(instance),
                min: 0,
                max: i128::from(MAX_INSTANCE),
            });
        }
        Ok(Self {
            space,
            type_id,
            instance,
        })
    }

    /// Const form of [`ObjectId::new`] for well-known ids. The instance is
    /// truncated to 48 bits.
    pub const fn from_parts(space: u8, type_id: u8, instance: u64) -> Self {
        Self {
            space,
            type_id,
            instance: instance & MAX_INSTANCE,
        }
    }

    pub fn space(&self) -> u8 {
        self.space
    }

    pub fn type_id(&self) -> u8 {
        self.type_id
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }

    /// Packs the id as `space << 56 | type << 48 | instance`.
    pub fn to_u64(&self) -> u64 {
        (u64::from(self.space) << 56) | (u64::from(self.type_id) << 48) | self.instance
    }

    /// Inverse of [`ObjectId::to_u64`].
    pub fn from_u64(packed: u64) -> Self {
        Self {
            space: (packed >> 56) as u8,
            type_id: (packed >> 48) as u8,
            instance: packed & MAX_INSTANCE,
        }
    }

    /// Reads an instance varint and attaches the caller-supplied space/type.
    pub fn read_instance(
        reader: &mut ByteReader<'_>,
        space: u8,
        type_id: u8,
    ) -> Result<Self, ValidationError> {
        let instance = reader.read_varint()?;
        Self::new(space, type_id, instance)
    }

    /// Decodes a hex instance varint in the context of a known space/type.
    pub fn from_bytes(hex: &str, space: u8, type_id: u8) -> Result<Self, ValidationError> {
        let raw = decode_hex(hex)?;
        let mut reader = ByteReader::new(&raw);
        let id = Self::read_instance(&mut reader, space, type_id)?;
        reader.finish()?;
        Ok(id)
    }
}

impl FromStr for ObjectId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidObjectId(s.to_string());
        let mut parts = s.split('.');
        let (Some(space), Some(type_id), Some(instance), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
        if !(all_digits(space) && all_digits(type_id) && all_digits(instance)) {
            return Err(invalid());
        }
        let space = space.parse::<u8>().map_err(|_| invalid())?;
        let type_id = type_id.parse::<u8>().map_err(|_| invalid())?;
        let instance = instance.parse::<u64>().map_err(|_| invalid())?;
        Self::new(space, type_id, instance)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.space, self.type_id, self.instance)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl ChainValue for ObjectId {
    fn value(&self) -> Value {
        Value::String(self.to_string())
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        write_varint(out, self.instance);
    }
}
