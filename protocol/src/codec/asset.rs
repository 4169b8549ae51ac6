//! Asset amounts.

use serde_json::{json, Value};

use super::buffer::ByteReader;
use super::error::ValidationError;
use super::integer::Int64;
use super::object_id::ObjectId;
use super::{ChainDecode, ChainValue};

/// Object space of protocol objects.
pub const ASSET_SPACE: u8 = 1;
/// Object type of assets inside [`ASSET_SPACE`].
pub const ASSET_TYPE: u8 = 3;

/// An amount of some asset: `amount` (8 bytes) followed by the asset id
/// instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Asset {
    pub amount: Int64,
    pub asset_id: ObjectId,
}

impl Asset {
    pub fn new(amount: i64, asset_id: ObjectId) -> Self {
        Self {
            amount: Int64::new(amount),
            asset_id,
        }
    }
}

impl ChainValue for Asset {
    fn value(&self) -> Value {
        json!({
            "amount": self.amount.value(),
            "asset_id": self.asset_id.value(),
        })
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        self.amount.write_bytes(out);
        self.asset_id.write_bytes(out);
    }
}

impl ChainDecode for Asset {
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, ValidationError> {
        let amount = Int64::read(reader)?;
        let asset_id = ObjectId::read_instance(reader, ASSET_SPACE, ASSET_TYPE)?;
        Ok(Self { amount, asset_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_core_asset() {
        let asset = Asset::new(0, "1.3.0".parse().unwrap());
        assert_eq!(asset.bytes(), "000000000000000000");
        assert_eq!(asset.value(), json!({"amount": 0, "asset_id": "1.3.0"}));
    }

    #[test]
    fn decodes_in_asset_space() {
        let asset = Asset::from_bytes("e80300000000000001").unwrap();
        assert_eq!(asset.amount.get(), 1000);
        assert_eq!(asset.asset_id.to_string(), "1.3.1");
    }
}
