//! Arrays, maps and optionals over other chain values.
//!
//! The composites do not re-validate their elements; anything that made it
//! into a chain type is already valid. The only structural rule enforced
//! here is key uniqueness in [`ChainMap`].

use std::collections::HashSet;

use serde_json::Value;

use super::buffer::ByteReader;
use super::error::ValidationError;
use super::varint::write_varint;
use super::{ChainDecode, ChainValue};

// ---------------------------------------------------------------------------
// Array
// ---------------------------------------------------------------------------

/// Ordered list: varint count, then each element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainArray<T>(Vec<T>);

impl<T> ChainArray<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self(items)
    }

    pub fn items(&self) -> &[T] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> Default for ChainArray<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> From<Vec<T>> for ChainArray<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T> FromIterator<T> for ChainArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: ChainValue> ChainValue for ChainArray<T> {
    fn value(&self) -> Value {
        Value::Array(self.0.iter().map(ChainValue::value).collect())
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        write_varint(out, self.0.len() as u64);
        for item in &self.0 {
            item.write_bytes(out);
        }
    }
}

impl<T: ChainDecode> ChainDecode for ChainArray<T> {
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, ValidationError> {
        let count = reader.read_len()?;
        // Every element takes at least one byte, so cap the reservation.
        let mut items = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            items.push(T::read(reader)?);
        }
        Ok(Self(items))
    }
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

/// Key/value pairs in insertion order: varint count, then `key ∥ value`
/// for each entry. The JSON form is a list of two-element lists, which is
/// how the node represents `flat_map` fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainMap<K, V>(Vec<(K, V)>);

impl<K: ChainValue, V> ChainMap<K, V> {
    /// Builds a map, rejecting keys whose encodings collide.
    pub fn new(entries: Vec<(K, V)>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for (key, _) in &entries {
            if !seen.insert(key.to_bytes()) {
                return Err(ValidationError::DuplicateKey(key.value().to_string()));
            }
        }
        Ok(Self(entries))
    }
}

impl<K, V> ChainMap<K, V> {
    pub fn entries(&self) -> &[(K, V)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> Default for ChainMap<K, V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<K: ChainValue, V: ChainValue> ChainValue for ChainMap<K, V> {
    fn value(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|(k, v)| Value::Array(vec![k.value(), v.value()]))
                .collect(),
        )
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        write_varint(out, self.0.len() as u64);
        for (key, value) in &self.0 {
            key.write_bytes(out);
            value.write_bytes(out);
        }
    }
}

impl<K: ChainValue + ChainDecode, V: ChainDecode> ChainDecode for ChainMap<K, V> {
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, ValidationError> {
        let count = reader.read_len()?;
        let mut entries = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            let key = K::read(reader)?;
            let value = V::read(reader)?;
            entries.push((key, value));
        }
        Self::new(entries)
    }
}

// ---------------------------------------------------------------------------
// Optional
// ---------------------------------------------------------------------------

/// Presence byte followed by the value when present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainOptional<T>(Option<T>);

impl<T> ChainOptional<T> {
    pub fn some(value: T) -> Self {
        Self(Some(value))
    }

    pub fn none() -> Self {
        Self(None)
    }

    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }
}

impl<T> Default for ChainOptional<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> From<Option<T>> for ChainOptional<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T: ChainValue> ChainValue for ChainOptional<T> {
    fn value(&self) -> Value {
        self.0.as_ref().map_or(Value::Null, ChainValue::value)
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        match &self.0 {
            Some(inner) => {
                out.push(1);
                inner.write_bytes(out);
            }
            None => out.push(0),
        }
    }
}

impl<T: ChainDecode> ChainDecode for ChainOptional<T> {
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, ValidationError> {
        match reader.read_u8("ChainOptional presence")? {
            0 => Ok(Self(None)),
            _ => Ok(Self(Some(T::read(reader)?))),
        }
    }
}
