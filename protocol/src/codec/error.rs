//! Validation failures raised while constructing or decoding chain values.
//!
//! Every constructor in [`crate::codec`] and [`crate::crypto`] either returns
//! a fully valid value or one of these. There is no half-built state to
//! recover from, so callers are expected to abort whatever they were doing.

use thiserror::Error;

/// Malformed or out-of-range input at a construction boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The input is not a non-empty sequence of hex digit pairs.
    #[error("given string is not a byte sequence: {0:?}")]
    InvalidHex(String),

    /// A fixed-width decode received the wrong number of bytes.
    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Bytes the type requires.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    /// The byte stream ended before the value was complete.
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEnd(&'static str),

    /// Bytes were left over after decoding a complete value.
    #[error("{0} trailing byte(s) after value")]
    TrailingBytes(usize),

    /// A numeric value fell outside the representable range of its type.
    #[error("{type_name} value {value} is outside [{min}, {max}]")]
    OutOfRange {
        /// Chain type being constructed.
        type_name: &'static str,
        /// Offending value.
        value: i128,
        /// Smallest accepted value.
        min: i128,
        /// Largest accepted value.
        max: i128,
    },

    /// Variable-length integer is truncated or longer than 64 bits.
    #[error("malformed varint")]
    MalformedVarint,

    /// String bytes are not valid UTF-8.
    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    /// Timestamp text does not match `YYYY-MM-DDTHH:MM:SS[.fff][Z]`.
    #[error("invalid time: {0:?}")]
    InvalidTime(String),

    /// Object identifier text is not `space.type.instance`.
    #[error("invalid object id: {0:?}")]
    InvalidObjectId(String),

    /// A byte sequence that must be non-empty was empty.
    #[error("byte sequence cannot be empty")]
    EmptyBytes,

    /// A map was built with the same key twice.
    #[error("duplicate map key {0}")]
    DuplicateKey(String),

    /// A collection that must hold at least one entry was empty.
    #[error("{0} cannot be empty")]
    EmptyCollection(&'static str),

    /// An enum-backed numeric code is not one of the known values.
    #[error("unknown {type_name} code {code}")]
    UnknownCode {
        /// Enum being decoded.
        type_name: &'static str,
        /// Rejected code.
        code: u64,
    },

    /// Base58 text could not be decoded.
    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    /// A key or address checksum does not match its payload.
    #[error("checksum mismatch")]
    ChecksumMismatch,

    /// WIF version byte is not the expected one.
    #[error("invalid version byte: expected {expected:#04x}, got {actual:#04x}")]
    InvalidVersion {
        /// Expected version.
        expected: u8,
        /// Version found in the payload.
        actual: u8,
    },

    /// Public key text does not start with the address prefix.
    #[error("public key must start with {expected:?}")]
    InvalidPrefix {
        /// Required prefix.
        expected: &'static str,
    },

    /// Bytes do not describe a valid secp256k1 scalar or point.
    #[error("invalid key material: {0}")]
    InvalidKey(&'static str),

    /// Password does not meet the minimum length for key derivation.
    #[error("password must be at least {min} characters long")]
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },

    /// Brain key normalizes to nothing.
    #[error("brain key cannot be empty")]
    EmptyBrainKey,
}
