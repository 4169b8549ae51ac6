//! Raw byte blobs, with and without a length prefix.

use serde_json::Value;

use super::buffer::{decode_hex, ByteReader};
use super::error::ValidationError;
use super::varint::write_varint;
use super::{ChainDecode, ChainValue};

/// A blob whose length is fixed by the field that holds it, so no prefix
/// is written. The length must be non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixedBytes(Vec<u8>);

impl FixedBytes {
    pub fn new(bytes: Vec<u8>) -> Result<Self, ValidationError> {
        if bytes.is_empty() {
            return Err(ValidationError::EmptyBytes);
        }
        Ok(Self(bytes))
    }

    /// Parses hex, accepting any length.
    pub fn from_hex(hex: &str) -> Result<Self, ValidationError> {
        Self::new(decode_hex(hex)?)
    }

    /// Parses hex and requires exactly `len` bytes.
    pub fn from_hex_exact(hex: &str, len: usize) -> Result<Self, ValidationError> {
        let value = Self::from_hex(hex)?;
        if value.len() != len {
            return Err(ValidationError::InvalidLength {
                expected: len,
                actual: value.len(),
            });
        }
        Ok(value)
    }

    /// Reads `len` raw bytes.
    pub fn read(reader: &mut ByteReader<'_>, len: usize) -> Result<Self, ValidationError> {
        Self::new(reader.take(len, "FixedBytes")?.to_vec())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl ChainValue for FixedBytes {
    fn value(&self) -> Value {
        Value::String(hex::encode(&self.0))
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

/// A variable-length blob: varint byte count, then the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bytes(Vec<u8>);

impl Bytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn from_hex(hex: &str) -> Result<Self, ValidationError> {
        decode_hex(hex).map(Self)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl ChainValue for Bytes {
    fn value(&self) -> Value {
        Value::String(hex::encode(&self.0))
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        write_varint(out, self.0.len() as u64);
        out.extend_from_slice(&self.0);
    }
}

impl ChainDecode for Bytes {
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, ValidationError> {
        let len = reader.read_len()?;
        Ok(Self(reader.take(len, "Bytes")?.to_vec()))
    }
}
