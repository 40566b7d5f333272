//! Pass-through transaction values and their structural copy.

use std::{collections::BTreeMap, fmt, str::FromStr, sync::Arc};

use alloy_primitives::{hex, Address, Bytes, U256};
use serde_json::{Map, Number, Value};

use crate::{Error, Result};

/// Something that knows its own address, such as a contract handle.
///
/// Values of this kind are shared by reference when a request is copied, never duplicated.
pub trait Addressable: fmt::Debug + Send + Sync {
    /// The address this value stands for.
    fn address(&self) -> Address;
}

impl Addressable for Address {
    fn address(&self) -> Address {
        *self
    }
}

/// Request fields that hold quantities. They go out hex-encoded whether they were given as a
/// JSON number, a decimal string or a hex string.
pub const QUANTITY_FIELDS: [&str; 7] =
    ["value", "nonce", "gasPrice", "maxFeePerGas", "maxPriorityFeePerGas", "chainId", "type"];

/// A scalar transaction value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    /// A boolean flag.
    Bool(bool),
    /// An unsigned quantity, encoded as a `0x` quantity on the wire.
    Number(U256),
    /// Free text, passed to the node untouched.
    Text(String),
    /// A byte string, encoded as `0x` data on the wire.
    Bytes(Bytes),
    /// A concrete address.
    Address(Address),
}

/// A transaction field value.
///
/// Each variant has its own copy rule, see [`TxValue::deep_copy`].
#[derive(Debug)]
pub enum TxValue {
    /// An explicitly unset value.
    Null,
    /// A scalar.
    Primitive(Primitive),
    /// An ordered list of values.
    Sequence(Vec<TxValue>),
    /// A keyed collection of values.
    Mapping(BTreeMap<String, TxValue>),
    /// A value that resolves to an address on demand.
    Addressable(Arc<dyn Addressable>),
}

impl TxValue {
    /// Copies the value structurally.
    ///
    /// Scalars are copied by value, sequences element by element in order and mappings key by
    /// key. Addressable values keep pointing at the same capability.
    pub fn deep_copy(&self) -> Self {
        match self {
            Self::Null => Self::Null,
            Self::Primitive(primitive) => Self::Primitive(primitive.clone()),
            Self::Sequence(items) => Self::Sequence(items.iter().map(Self::deep_copy).collect()),
            Self::Mapping(entries) => Self::Mapping(
                entries.iter().map(|(key, value)| (key.clone(), value.deep_copy())).collect(),
            ),
            Self::Addressable(target) => Self::Addressable(Arc::clone(target)),
        }
    }

    /// Builds a value from untyped JSON.
    ///
    /// Fails with [`Error::UnsupportedValue`] on shapes a transaction cannot carry: negative or
    /// fractional numbers.
    pub fn from_json(value: Value) -> Result<Self> {
        Ok(match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Primitive(Primitive::Bool(flag)),
            Value::Number(number) => match number_to_u256(&number) {
                Some(n) => Self::Primitive(Primitive::Number(n)),
                None => return Err(Error::UnsupportedValue(format!("{number} (number)"))),
            },
            Value::String(text) => Self::Primitive(Primitive::Text(text)),
            Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from_json).collect::<Result<_>>()?)
            }
            Value::Object(entries) => Self::Mapping(
                entries
                    .into_iter()
                    .map(|(key, value)| Ok((key, Self::from_json(value)?)))
                    .collect::<Result<_>>()?,
            ),
        })
    }

    /// Builds a quantity from a JSON number, a decimal string or a `0x` hex string.
    pub fn quantity_from_json(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::Null);
        }
        parse_quantity(&value)
            .map(|n| Self::Primitive(Primitive::Number(n)))
            .ok_or_else(|| Error::UnsupportedValue(format!("{value} (quantity)")))
    }

    /// Encodes the value the way a node expects it: quantities and byte strings as `0x` hex,
    /// addresses checksummed.
    pub fn to_rpc(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Primitive(Primitive::Bool(flag)) => Value::Bool(*flag),
            Self::Primitive(Primitive::Number(n)) => Value::String(format!("0x{n:x}")),
            Self::Primitive(Primitive::Text(text)) => Value::String(text.clone()),
            Self::Primitive(Primitive::Bytes(bytes)) => Value::String(hex::encode_prefixed(bytes)),
            Self::Primitive(Primitive::Address(address)) => {
                Value::String(address.to_checksum(None))
            }
            Self::Sequence(items) => Value::Array(items.iter().map(Self::to_rpc).collect()),
            Self::Mapping(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_rpc()))
                    .collect::<Map<_, _>>(),
            ),
            Self::Addressable(target) => Value::String(target.address().to_checksum(None)),
        }
    }

    /// Returns `true` for [`TxValue::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Parses a non-negative integer given as a JSON number, a decimal string or a `0x` hex string.
pub fn parse_quantity(value: &Value) -> Option<U256> {
    match value {
        Value::Number(number) => number_to_u256(number),
        Value::String(text) if !text.trim().is_empty() => U256::from_str(text.trim()).ok(),
        _ => None,
    }
}

/// Integers past `u64` arrive as floats; integral ones are taken at their exact decimal value.
fn number_to_u256(number: &Number) -> Option<U256> {
    if let Some(n) = number.as_u64() {
        return Some(U256::from(n));
    }
    let float = number.as_f64()?;
    if !float.is_finite() || float < 0.0 || float.fract() != 0.0 {
        return None;
    }
    U256::from_str(&format!("{float:.0}")).ok()
}

impl Clone for TxValue {
    fn clone(&self) -> Self {
        self.deep_copy()
    }
}

/// Addressable values compare by the address they expose.
impl PartialEq for TxValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Primitive(a), Self::Primitive(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Mapping(a), Self::Mapping(b)) => a == b,
            (Self::Addressable(a), Self::Addressable(b)) => a.address() == b.address(),
            _ => false,
        }
    }
}

impl From<bool> for TxValue {
    fn from(flag: bool) -> Self {
        Self::Primitive(Primitive::Bool(flag))
    }
}

impl From<u64> for TxValue {
    fn from(n: u64) -> Self {
        Self::Primitive(Primitive::Number(U256::from(n)))
    }
}

impl From<U256> for TxValue {
    fn from(n: U256) -> Self {
        Self::Primitive(Primitive::Number(n))
    }
}

impl From<&str> for TxValue {
    fn from(text: &str) -> Self {
        Self::Primitive(Primitive::Text(text.to_string()))
    }
}

impl From<String> for TxValue {
    fn from(text: String) -> Self {
        Self::Primitive(Primitive::Text(text))
    }
}

impl From<Bytes> for TxValue {
    fn from(bytes: Bytes) -> Self {
        Self::Primitive(Primitive::Bytes(bytes))
    }
}

impl From<Address> for TxValue {
    fn from(address: Address) -> Self {
        Self::Primitive(Primitive::Address(address))
    }
}

impl From<Vec<Self>> for TxValue {
    fn from(items: Vec<Self>) -> Self {
        Self::Sequence(items)
    }
}

impl From<BTreeMap<String, Self>> for TxValue {
    fn from(entries: BTreeMap<String, Self>) -> Self {
        Self::Mapping(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, bytes};
    use serde_json::json;

    #[derive(Debug)]
    struct Contract(Address);

    impl Addressable for Contract {
        fn address(&self) -> Address {
            self.0
        }
    }

    #[test]
    fn test_deep_copy_shares_addressable() {
        let contract: Arc<dyn Addressable> =
            Arc::new(Contract(address!("0x1000000000000000000000000000000000000001")));
        let value = TxValue::Sequence(vec![TxValue::Addressable(Arc::clone(&contract))]);

        let TxValue::Sequence(items) = value.deep_copy() else { panic!("expected a sequence") };
        let TxValue::Addressable(copied) = &items[0] else { panic!("expected an addressable") };
        assert!(Arc::ptr_eq(copied, &contract));
    }

    #[test]
    fn test_deep_copy_preserves_order_and_keys() {
        let value = TxValue::from_json(json!({
            "accessList": [{"address": "0x01", "storageKeys": ["0x02", "0x03"]}],
            "nonce": 7,
            "note": null,
        }))
        .unwrap();

        let once = value.deep_copy();
        let twice = once.deep_copy();
        assert_eq!(once, value);
        assert_eq!(twice, once);
        assert_eq!(once.to_rpc(), value.to_rpc());

        let TxValue::Mapping(entries) = &twice else { panic!("expected a mapping") };
        assert_eq!(entries.keys().collect::<Vec<_>>(), ["accessList", "nonce", "note"]);
    }

    #[test]
    fn test_from_json_rejects_unsupported_numbers() {
        assert!(matches!(TxValue::from_json(json!(-1)), Err(Error::UnsupportedValue(_))));
        assert!(matches!(
            TxValue::from_json(json!({"value": [1.5]})),
            Err(Error::UnsupportedValue(_))
        ));
    }

    #[test]
    fn test_quantities() {
        let hundred_ether = U256::from(100_000_000_000_000_000_000u128);
        assert_eq!(parse_quantity(&json!("1000")), Some(U256::from(1000)));
        assert_eq!(parse_quantity(&json!("0x3e8")), Some(U256::from(1000)));
        assert_eq!(parse_quantity(&json!(1000)), Some(U256::from(1000)));
        assert_eq!(parse_quantity(&json!(100000000000000000000u128 as f64)), Some(hundred_ether));
        assert_eq!(parse_quantity(&json!("100000000000000000000")), Some(hundred_ether));
        assert_eq!(parse_quantity(&json!("")), None);
        assert_eq!(parse_quantity(&json!("ten")), None);
        assert_eq!(parse_quantity(&json!(-1)), None);
        assert_eq!(parse_quantity(&json!(true)), None);

        assert_eq!(TxValue::quantity_from_json(json!("1000")).unwrap().to_rpc(), json!("0x3e8"));
        assert!(TxValue::quantity_from_json(json!(null)).unwrap().is_null());
        assert!(matches!(
            TxValue::quantity_from_json(json!("1.5")),
            Err(Error::UnsupportedValue(_))
        ));
    }

    #[test]
    fn test_to_rpc_hex_encoding() {
        assert_eq!(TxValue::from(0u64).to_rpc(), json!("0x0"));
        assert_eq!(TxValue::from(21_000u64).to_rpc(), json!("0x5208"));
        assert_eq!(TxValue::from(bytes!("0xdeadbeef")).to_rpc(), json!("0xdeadbeef"));
        assert_eq!(TxValue::from("latest").to_rpc(), json!("latest"));
        assert_eq!(
            TxValue::from(address!("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266")).to_rpc(),
            json!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }
}
