//! Single-byte boolean.

use serde_json::Value;

use super::buffer::ByteReader;
use super::error::ValidationError;
use super::{ChainDecode, ChainValue};

/// `true` encodes as `01`, `false` as `00`. Any non-zero byte decodes as
/// `true`, matching what the node accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Boolean(bool);

impl Boolean {
    pub const fn new(value: bool) -> Self {
        Self(value)
    }

    pub const fn get(self) -> bool {
        self.0
    }
}

impl From<bool> for Boolean {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl ChainValue for Boolean {
    fn value(&self) -> Value {
        Value::Bool(self.0)
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(u8::from(self.0));
    }
}

impl ChainDecode for Boolean {
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, ValidationError> {
        Ok(Self(reader.read_u8("Boolean")? != 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_as_one_byte() {
        assert_eq!(Boolean::new(true).bytes(), "01");
        assert_eq!(Boolean::new(false).bytes(), "00");
    }

    #[test]
    fn any_non_zero_byte_is_true() {
        assert!(Boolean::from_bytes("7f").unwrap().get());
        assert!(!Boolean::from_bytes("00").unwrap().get());
        assert!(Boolean::from_bytes("0001").is_err());
    }
}
