//! Length-prefixed UTF-8 text.

use serde_json::Value;

use super::buffer::ByteReader;
use super::error::ValidationError;
use super::varint::write_varint;
use super::{ChainDecode, ChainValue};

/// UTF-8 string encoded as a varint byte count followed by the raw bytes.
///
/// The prefix counts bytes, not characters: `"ă"` is one character and two
/// bytes, so it encodes as `02c483`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ChainString(String);

impl ChainString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChainString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ChainString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl ChainValue for ChainString {
    fn value(&self) -> Value {
        Value::String(self.0.clone())
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        write_varint(out, self.0.len() as u64);
        out.extend_from_slice(self.0.as_bytes());
    }
}

impl ChainDecode for ChainString {
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, ValidationError> {
        let len = reader.read_len()?;
        let raw = reader.take(len, "ChainString")?;
        let text = std::str::from_utf8(raw).map_err(|_| ValidationError::InvalidUtf8)?;
        Ok(Self(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HELLO: &str = "0d48656c6c6f2c20776f726c6421";

    #[test]
    fn empty_string_is_a_single_zero_byte() {
        assert_eq!(ChainString::new("").bytes(), "00");
    }

    #[test]
    fn encodes_byte_length_prefix() {
        assert_eq!(ChainString::new("Hello, world!").bytes(), HELLO);
        assert_eq!(ChainString::new("ă").bytes(), "02c483");
    }

    #[test]
    fn decodes_mixed_case_hex() {
        assert_eq!(ChainString::from_bytes(HELLO).unwrap().as_str(), "Hello, world!");
        assert_eq!(
            ChainString::from_bytes(&HELLO.to_uppercase()).unwrap().as_str(),
            "Hello, world!"
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(ChainString::from_bytes("1234567").is_err());
        assert!(ChainString::from_bytes("0d48656c6c6g2c20776f726c6421").is_err());
        // Prefix claims more bytes than are present.
        assert!(ChainString::from_bytes("0548656c").is_err());
        assert_eq!(ChainString::from_bytes("01ff"), Err(ValidationError::InvalidUtf8));
    }

    proptest! {
        #[test]
        fn round_trips_any_text(s in ".*") {
            let encoded = ChainString::new(s.clone()).bytes();
            let decoded = ChainString::from_bytes(&encoded).unwrap();
            prop_assert_eq!(decoded.as_str(), s.as_str());
        }
    }
}
