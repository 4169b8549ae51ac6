//! Fixed-width bounded integers.
//!
//! All five types encode little-endian at their declared width. The Rust
//! primitive inside already pins the range, so `From<u16>` and friends are
//! infallible. Wider inputs (JSON numbers, CLI arguments) go through
//! `TryFrom<i128>`, which is where the bounds are actually checked.

use serde_json::Value;

use super::buffer::ByteReader;
use super::error::ValidationError;
use super::{ChainDecode, ChainValue};

macro_rules! chain_integer {
    ($(#[$meta:meta])* $name:ident, $inner:ty, $width:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name($inner);

        impl $name {
            /// Smallest representable value.
            pub const MIN: $inner = <$inner>::MIN;
            /// Largest representable value.
            pub const MAX: $inner = <$inner>::MAX;
            /// Encoded width in bytes.
            pub const WIDTH: usize = $width;

            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl TryFrom<i128> for $name {
            type Error = ValidationError;

            fn try_from(value: i128) -> Result<Self, Self::Error> {
                <$inner>::try_from(value)
                    .map(Self)
                    .map_err(|_| ValidationError::OutOfRange {
                        type_name: stringify!($name),
                        value,
                        min: i128::from(Self::MIN),
                        max: i128::from(Self::MAX),
                    })
            }
        }

        impl ChainValue for $name {
            fn value(&self) -> Value {
                Value::from(self.0)
            }

            fn write_bytes(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.0.to_le_bytes());
            }
        }

        impl ChainDecode for $name {
            fn read(reader: &mut ByteReader<'_>) -> Result<Self, ValidationError> {
                let raw = reader.take_array::<$width>(stringify!($name))?;
                Ok(Self(<$inner>::from_le_bytes(raw)))
            }

            /// Fixed-width types demand the exact byte count up front.
            fn from_bytes(hex: &str) -> Result<Self, ValidationError> {
                let raw = super::decode_hex(hex)?;
                if raw.len() != $width {
                    return Err(ValidationError::InvalidLength {
                        expected: $width,
                        actual: raw.len(),
                    });
                }
                let mut reader = ByteReader::new(&raw);
                Self::read(&mut reader)
            }
        }
    };
}

chain_integer!(
    /// Unsigned 8-bit chain integer.
    UInt8, u8, 1
);
chain_integer!(
    /// Unsigned 16-bit chain integer.
    UInt16, u16, 2
);
chain_integer!(
    /// Unsigned 32-bit chain integer.
    UInt32, u32, 4
);
chain_integer!(
    /// Unsigned 64-bit chain integer.
    UInt64, u64, 8
);
chain_integer!(
    /// Signed 64-bit chain integer, two's complement on the wire.
    Int64, i64, 8
);
