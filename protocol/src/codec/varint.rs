//! LEB128 variable-length integers.
//!
//! Seven payload bits per byte, least significant group first, high bit set
//! on every byte except the last. Used for every length prefix and for
//! object id instances.

use super::error::ValidationError;

/// Longest encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Appends `value` to `out`.
pub fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let group = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(group);
            return;
        }
        out.push(group | 0x80);
    }
}

/// Decodes a varint from the front of `input`, returning the value and the
/// number of bytes consumed.
pub fn read_varint(input: &[u8]) -> Result<(u64, usize), ValidationError> {
    let mut value: u64 = 0;
    for (index, byte) in input.iter().take(MAX_VARINT_LEN).enumerate() {
        let payload = u64::from(byte & 0x7f);
        let shift = 7 * index as u32;
        // The tenth group may only carry the single remaining bit.
        if index == MAX_VARINT_LEN - 1 && payload > 1 {
            return Err(ValidationError::MalformedVarint);
        }
        value |= payload << shift;
        if byte & 0x80 == 0 {
            return Ok((value, index + 1));
        }
    }
    Err(ValidationError::MalformedVarint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encode(value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        write_varint(&mut out, value);
        out
    }

    #[test]
    fn small_values_fit_one_byte() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(1), vec![0x01]);
        assert_eq!(encode(127), vec![0x7f]);
    }

    #[test]
    fn continuation_bit_is_set_on_leading_groups() {
        assert_eq!(encode(128), vec![0x80, 0x01]);
        assert_eq!(encode(300), vec![0xac, 0x02]);
        assert_eq!(encode(u64::MAX).len(), MAX_VARINT_LEN);
    }

    #[test]
    fn truncated_input_is_rejected() {
        assert_eq!(read_varint(&[0x80]), Err(ValidationError::MalformedVarint));
        assert_eq!(read_varint(&[]), Err(ValidationError::MalformedVarint));
    }

    #[test]
    fn overlong_input_is_rejected() {
        let mut bytes = vec![0xff; 9];
        bytes.push(0x02);
        assert_eq!(read_varint(&bytes), Err(ValidationError::MalformedVarint));
    }

    #[test]
    fn trailing_bytes_are_not_consumed() {
        assert_eq!(read_varint(&[0xac, 0x02, 0xff]), Ok((300, 2)));
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(value in any::<u64>()) {
            let bytes = encode(value);
            prop_assert_eq!(read_varint(&bytes), Ok((value, bytes.len())));
        }
    }
}
