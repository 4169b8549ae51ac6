//! # Chain Value Codec
//!
//! The Delegato node speaks a fixed binary layout: little-endian integers,
//! LEB128 length prefixes, and nothing else. There is no schema on the wire
//! and no field tags, so a single misplaced byte turns a vote into garbage
//! that the node will either reject or, worse, happily misread.
//!
//! Every type in this module implements two views of itself:
//!
//! - [`ChainValue::value`] is the JSON shape sent through the RPC layer.
//! - [`ChainValue::to_bytes`] is the canonical byte string that gets signed.
//!
//! Types that can be reconstructed from bytes alone also implement
//! [`ChainDecode`]. Object ids are the exception (see [`ObjectId`]).
//!
//! Hex is the lingua franca at the edges: `bytes()` returns lowercase hex,
//! and `from_bytes()` accepts any mix of upper and lower case.

pub mod asset;
pub mod boolean;
pub mod buffer;
pub mod bytes;
pub mod collection;
pub mod error;
pub mod integer;
pub mod object_id;
pub mod string;
pub mod time;
pub mod varint;

pub use asset::Asset;
pub use boolean::Boolean;
pub use buffer::{decode_hex, ByteReader};
pub use bytes::{Bytes, FixedBytes};
pub use collection::{ChainArray, ChainMap, ChainOptional};
pub use error::ValidationError;
pub use integer::{Int64, UInt16, UInt32, UInt64, UInt8};
pub use object_id::ObjectId;
pub use string::ChainString;
pub use time::ChainTime;

use serde_json::Value;

/// A value with a canonical JSON form and a canonical byte form.
pub trait ChainValue {
    /// JSON representation as it crosses the RPC boundary.
    fn value(&self) -> Value;

    /// Appends the canonical encoding to `out`.
    fn write_bytes(&self, out: &mut Vec<u8>);

    /// Canonical encoding as raw bytes.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_bytes(&mut out);
        out
    }

    /// Canonical encoding as lowercase hex.
    fn bytes(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

/// A chain value that can be rebuilt from its own encoding.
pub trait ChainDecode: Sized {
    /// Reads one value from the front of `reader`.
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, ValidationError>;

    /// Decodes a hex string that must contain exactly one value.
    fn from_bytes(hex: &str) -> Result<Self, ValidationError> {
        let raw = decode_hex(hex)?;
        let mut reader = ByteReader::new(&raw);
        let value = Self::read(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }
}

impl<T: ChainValue + ?Sized> ChainValue for Box<T> {
    fn value(&self) -> Value {
        (**self).value()
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        (**self).write_bytes(out)
    }
}
