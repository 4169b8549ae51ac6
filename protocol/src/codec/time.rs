//! Second-resolution UTC timestamps.
//!
//! On the wire a timestamp is four little-endian bytes of Unix seconds, so
//! the representable window runs from the epoch to early 2106. The text
//! form is the node's: `YYYY-MM-DDTHH:MM:SS` with no zone designator. On
//! input we tolerate three fractional digits and a trailing `Z` because
//! that is what `Date.toISOString()`-style producers emit, but an explicit
//! offset like `+02:00` is refused rather than silently normalized.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use super::buffer::ByteReader;
use super::error::ValidationError;
use super::{ChainDecode, ChainValue};

const TEXT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A chain timestamp in whole seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainTime(u32);

impl ChainTime {
    /// `1970-01-01T00:00:00`.
    pub const MIN: ChainTime = ChainTime(0);
    /// `2106-02-07T06:28:15`.
    pub const MAX: ChainTime = ChainTime(u32::MAX);

    pub const fn from_unix_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    pub const fn unix_seconds(self) -> u32 {
        self.0
    }

    /// Current wall-clock time, truncated to the second.
    pub fn now() -> Result<Self, ValidationError> {
        Self::try_from(Utc::now())
    }

    /// Returns this instant shifted forward, failing past [`ChainTime::MAX`].
    pub fn checked_add_seconds(self, seconds: u32) -> Result<Self, ValidationError> {
        self.0.checked_add(seconds).map(Self).ok_or(ValidationError::OutOfRange {
            type_name: "ChainTime",
            value: i128::from(self.0) + i128::from(seconds),
            min: 0,
            max: i128::from(u32::MAX),
        })
    }

    pub fn to_datetime(self) -> DateTime<Utc> {
        // Every u32 second count is inside chrono's supported range.
        DateTime::<Utc>::from_timestamp(i64::from(self.0), 0).unwrap_or_default()
    }

    /// Canonical text form.
    pub fn to_text(self) -> String {
        self.to_datetime().format(TEXT_FORMAT).to_string()
    }

    /// Parses the accepted text forms described at module level.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidTime(input.to_string());
        let core = strip_suffixes(input).ok_or_else(invalid)?;
        if !shape_is_valid(core) {
            return Err(invalid());
        }
        let naive = NaiveDateTime::parse_from_str(core, TEXT_FORMAT).map_err(|_| invalid())?;
        Self::try_from(naive.and_utc())
    }
}

/// Drops an optional `Z` and then an optional `.fff`. Returns `None` when a
/// fraction is present but is not exactly three digits.
fn strip_suffixes(input: &str) -> Option<&str> {
    let without_zone = input.strip_suffix('Z').unwrap_or(input);
    match without_zone.rfind('.') {
        Some(dot) => {
            let fraction = &without_zone[dot + 1..];
            (fraction.len() == 3 && fraction.bytes().all(|b| b.is_ascii_digit()))
                .then_some(&without_zone[..dot])
        }
        None => Some(without_zone),
    }
}

/// Checks the fixed digit layout before chrono sees the string; chrono's
/// `%Y` alone would accept signs and extra digits.
fn shape_is_valid(core: &str) -> bool {
    let bytes = core.as_bytes();
    if bytes.len() != 19 {
        return false;
    }
    let digit_ranges: [(usize, u8, u8); 14] = [
        (0, b'1', b'2'),
        (1, b'0', b'9'),
        (2, b'0', b'9'),
        (3, b'0', b'9'),
        (5, b'0', b'1'),
        (6, b'0', b'9'),
        (8, b'0', b'3'),
        (9, b'0', b'9'),
        (11, b'0', b'2'),
        (12, b'0', b'9'),
        (14, b'0', b'5'),
        (15, b'0', b'9'),
        (17, b'0', b'5'),
        (18, b'0', b'9'),
    ];
    let separators = [(4, b'-'), (7, b'-'), (10, b'T'), (13, b':'), (16, b':')];
    digit_ranges
        .iter()
        .all(|&(i, lo, hi)| (lo..=hi).contains(&bytes[i]))
        && separators.iter().all(|&(i, c)| bytes[i] == c)
}

impl TryFrom<DateTime<Utc>> for ChainTime {
    type Error = ValidationError;

    fn try_from(value: DateTime<Utc>) -> Result<Self, Self::Error> {
        let seconds = value.timestamp();
        u32::try_from(seconds)
            .map(Self)
            .map_err(|_| ValidationError::OutOfRange {
                type_name: "ChainTime",
                value: i128::from(seconds),
                min: 0,
                max: i128::from(u32::MAX),
            })
    }
}

impl FromStr for ChainTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ChainTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl ChainValue for ChainTime {
    fn value(&self) -> Value {
        Value::String(self.to_text())
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0.to_le_bytes());
    }
}

impl ChainDecode for ChainTime {
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, ValidationError> {
        Ok(Self(u32::from_le_bytes(reader.take_array::<4>("ChainTime")?)))
    }

    fn from_bytes(hex: &str) -> Result<Self, ValidationError> {
        let raw = super::decode_hex(hex)?;
        let fixed: [u8; 4] = raw
            .as_slice()
            .try_into()
            .map_err(|_| ValidationError::InvalidLength {
                expected: 4,
                actual: raw.len(),
            })?;
        Ok(Self(u32::from_le_bytes(fixed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_known_instant() {
        let time = ChainTime::parse("1997-03-27T05:00:00").unwrap();
        assert_eq!(time.bytes(), "d0fe3933");
        assert_eq!(ChainTime::parse("1997-03-27T05:00:00Z").unwrap(), time);
        assert_eq!(ChainTime::parse("1997-03-27T05:00:00.000Z").unwrap(), time);
        assert_eq!(ChainTime::parse("1997-03-27T05:00:00.999").unwrap(), time);
    }

    #[test]
    fn decodes_range_bounds() {
        assert_eq!(
            ChainTime::from_bytes("00000000").unwrap().value(),
            serde_json::json!("1970-01-01T00:00:00")
        );
        assert_eq!(
            ChainTime::from_bytes("ffffffff").unwrap().value(),
            serde_json::json!("2106-02-07T06:28:15")
        );
        assert_eq!(ChainTime::MAX.to_text(), "2106-02-07T06:28:15");
        assert_eq!(ChainTime::MIN.to_text(), "1970-01-01T00:00:00");
    }

    #[test]
    fn rejects_offsets_and_other_formats() {
        for input in [
            "",
            "1997-03-27T05:00:00+02:00",
            "1997-03-27T07:00:00.000+02:00",
            "Thu, 27 Mar 1997 05:00:00 GMT",
            "1997-03-27 05:00:00",
            "1997-03-27T05:00:00.5Z",
            "1997-13-27T05:00:00",
            "1969-12-31T23:59:59",
            "2106-02-07T06:28:16",
        ] {
            assert!(ChainTime::parse(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn rejects_wrong_byte_counts() {
        for input in ["1234567", "123456789", "000000fg", "0000000000"] {
            assert!(ChainTime::from_bytes(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn datetime_conversion_truncates_to_seconds() {
        let dt = DateTime::<Utc>::from_timestamp(859_438_800, 750_000_000).unwrap();
        assert_eq!(ChainTime::try_from(dt).unwrap().unix_seconds(), 859_438_800);
        let before_epoch = DateTime::<Utc>::from_timestamp(-1, 0).unwrap();
        assert!(ChainTime::try_from(before_epoch).is_err());
    }

    #[test]
    fn checked_add_stops_at_max() {
        assert_eq!(
            ChainTime::from_unix_seconds(10).checked_add_seconds(5).unwrap(),
            ChainTime::from_unix_seconds(15)
        );
        assert!(ChainTime::MAX.checked_add_seconds(1).is_err());
    }
}
