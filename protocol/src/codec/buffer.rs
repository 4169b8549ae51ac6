//! Hex parsing and a cursor over decoded bytes.

use super::error::ValidationError;
use super::varint;

/// Decodes a hex string made of one or more digit pairs.
///
/// Case is ignored. The empty string is rejected: a chain value always
/// occupies at least one byte.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, ValidationError> {
    if input.is_empty() {
        return Err(ValidationError::InvalidHex(String::new()));
    }
    hex::decode(input).map_err(|_| ValidationError::InvalidHex(input.to_string()))
}

/// Forward-only reader used by [`super::ChainDecode`] implementations.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Consumes exactly `len` bytes.
    pub fn take(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], ValidationError> {
        if self.remaining() < len {
            return Err(ValidationError::UnexpectedEnd(what));
        }
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    /// Consumes exactly `N` bytes into an array.
    pub fn take_array<const N: usize>(
        &mut self,
        what: &'static str,
    ) -> Result<[u8; N], ValidationError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    pub fn read_u8(&mut self, what: &'static str) -> Result<u8, ValidationError> {
        Ok(self.take(1, what)?[0])
    }

    pub fn read_varint(&mut self) -> Result<u64, ValidationError> {
        let (value, consumed) = varint::read_varint(&self.data[self.position..])?;
        self.position += consumed;
        Ok(value)
    }

    /// Reads a varint that is used as an in-memory length or count.
    pub fn read_len(&mut self) -> Result<usize, ValidationError> {
        let len = self.read_varint()?;
        usize::try_from(len).map_err(|_| ValidationError::MalformedVarint)
    }

    /// Fails if anything is left unread.
    pub fn finish(self) -> Result<(), ValidationError> {
        match self.remaining() {
            0 => Ok(()),
            left => Err(ValidationError::TrailingBytes(left)),
        }
    }
}
