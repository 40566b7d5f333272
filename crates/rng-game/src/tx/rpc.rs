//! The hex-encoded transaction object sent over JSON-RPC.

use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};
use serde::Serialize;
use serde_json::{Map, Value};

use super::TxValue;

/// A transaction in the node's wire format: `0x` quantities and data, checksummed addresses and
/// `gas` for the gas limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RpcTransaction(Map<String, Value>);

impl RpcTransaction {
    /// Encodes the given fields. Unset (`null`) fields are left out.
    pub fn encode(
        from: Option<Address>,
        to: Option<Address>,
        gas_limit: Option<u64>,
        fields: &BTreeMap<String, TxValue>,
    ) -> Self {
        let mut object = Map::new();
        for (key, value) in fields {
            if !value.is_null() {
                object.insert(key.clone(), value.to_rpc());
            }
        }
        if let Some(from) = from {
            object.insert("from".to_string(), TxValue::from(from).to_rpc());
        }
        if let Some(to) = to {
            object.insert("to".to_string(), TxValue::from(to).to_rpc());
        }
        if let Some(gas_limit) = gas_limit {
            object.insert("gas".to_string(), TxValue::from(U256::from(gas_limit)).to_rpc());
        }
        Self(object)
    }

    /// Returns a member of the object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The object as untyped JSON.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Consumes the transaction, returning the JSON object.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for RpcTransaction {
    fn from(object: Map<String, Value>) -> Self {
        Self(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, bytes};
    use serde_json::json;

    #[test]
    fn test_encode() {
        let fields = BTreeMap::from([
            ("data".to_string(), TxValue::from(bytes!("0x5fd7d0ab"))),
            ("value".to_string(), TxValue::from(U256::from(1_000_000_000u64))),
            ("nonce".to_string(), TxValue::Null),
        ]);
        let tx = RpcTransaction::encode(
            Some(address!("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266")),
            Some(address!("0x5fbdb2315678afecb367f032d93f642f64180aa3")),
            Some(53_000),
            &fields,
        );

        assert_eq!(
            serde_json::to_value(&tx).unwrap(),
            json!({
                "from": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
                "to": "0x5FbDB2315678afecb367f032d93F642f64180aa3",
                "gas": "0xcf08",
                "data": "0x5fd7d0ab",
                "value": "0x3b9aca00",
            })
        );
    }
}
