//! Partially specified transaction requests.

use std::{collections::BTreeMap, fmt, str::FromStr, sync::Arc};

use alloy_primitives::{Address, Bytes, U256};
use serde_json::Value;

use super::{parse_quantity, Addressable, Primitive, TxValue, QUANTITY_FIELDS};
use crate::{node::Node, Error, Result};

/// A reference to an account that may still need resolving.
#[derive(Clone)]
pub enum AddressRef {
    /// A concrete address.
    Address(Address),
    /// A name (for example an ENS name) that the node resolves.
    Name(String),
    /// A value that knows its own address, such as a contract handle.
    Addressable(Arc<dyn Addressable>),
}

impl AddressRef {
    /// Returns the address when it is known without asking the node.
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Self::Address(address) => Some(*address),
            Self::Name(_) => None,
            Self::Addressable(target) => Some(target.address()),
        }
    }

    /// Like [`AddressRef::as_address`], but fails on a hex address with a bad checksum instead
    /// of treating it as a name.
    pub fn literal(&self) -> Result<Option<Address>> {
        match self {
            Self::Name(name) => parse_hex_address(name).transpose(),
            _ => Ok(self.as_address()),
        }
    }

    /// Resolves the reference to a concrete address, looking names up through `node`.
    pub async fn resolve<N: Node + ?Sized>(&self, node: &N) -> Result<Address> {
        match self {
            Self::Address(address) => Ok(*address),
            Self::Name(name) => {
                if let Some(parsed) = parse_hex_address(name) {
                    return parsed;
                }
                node.resolve_name(name).await?.ok_or_else(|| Error::UnresolvedName(name.clone()))
            }
            Self::Addressable(target) => Ok(target.address()),
        }
    }
}

/// Parses `text` if it has the shape of a hex address (`0x` and 40 hex digits).
///
/// All-lowercase and all-uppercase digits are taken as is. Mixed case must be a valid EIP-55
/// checksum.
fn parse_hex_address(text: &str) -> Option<Result<Address>> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let mixed_case = digits.bytes().any(|b| b.is_ascii_lowercase()) &&
        digits.bytes().any(|b| b.is_ascii_uppercase());
    let parsed = if mixed_case {
        Address::parse_checksummed(text, None).map_err(|e| e.to_string())
    } else {
        Address::from_str(text).map_err(|e| e.to_string())
    };
    Some(parsed.map_err(|reason| Error::InvalidAddress { input: text.to_string(), reason }))
}

/// Hex strings become addresses; anything else is kept as a name.
///
/// A hex address with a bad checksum is kept as is and rejected when the request is resolved.
impl From<&str> for AddressRef {
    fn from(value: &str) -> Self {
        match parse_hex_address(value) {
            Some(Ok(address)) => Self::Address(address),
            _ => Self::Name(value.to_string()),
        }
    }
}

/// Like the `From<&str>` conversion, but rejects a bad checksum right away.
impl FromStr for AddressRef {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match parse_hex_address(value) {
            Some(parsed) => parsed.map(Self::Address),
            None => Ok(Self::Name(value.to_string())),
        }
    }
}

impl From<Address> for AddressRef {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}

impl<T: Addressable + 'static> From<Arc<T>> for AddressRef {
    fn from(target: Arc<T>) -> Self {
        Self::Addressable(target)
    }
}

impl fmt::Debug for AddressRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => write!(f, "{address}"),
            Self::Name(name) => write!(f, "{name:?}"),
            Self::Addressable(target) => write!(f, "{target:?}"),
        }
    }
}

/// A transaction request in which `from`, `to` and the gas limit are optional.
///
/// Every other field is carried in [`TxRequest::fields`] and reaches the node unchanged, apart
/// from hex encoding.
#[derive(Debug, Clone, Default)]
pub struct TxRequest {
    /// The sender; defaults to the signing identity.
    pub from: Option<AddressRef>,
    /// The recipient; absent for contract creation.
    pub to: Option<AddressRef>,
    /// The gas limit; estimated by the node when absent.
    pub gas_limit: Option<u64>,
    /// Remaining fields, keyed by their JSON-RPC name.
    pub fields: BTreeMap<String, TxValue>,
}

impl TxRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender.
    pub fn with_from(mut self, from: impl Into<AddressRef>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Sets the recipient.
    pub fn with_to(mut self, to: impl Into<AddressRef>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Sets the gas limit.
    pub const fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Sets the call data.
    pub fn with_data(self, data: impl Into<Bytes>) -> Self {
        self.with_field("data", data.into())
    }

    /// Sets the transferred value in wei.
    pub fn with_value(self, value: U256) -> Self {
        self.with_field("value", value)
    }

    /// Sets an arbitrary pass-through field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<TxValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Copies the request structurally, see [`TxValue::deep_copy`].
    pub fn deep_copy(&self) -> Self {
        Self {
            from: self.from.clone(),
            to: self.to.clone(),
            gas_limit: self.gas_limit,
            fields: self
                .fields
                .iter()
                .map(|(key, value)| (key.clone(), value.deep_copy()))
                .collect(),
        }
    }

    /// Parses a request from a JSON object such as `{"to": "vitalik.eth", "value": "0x1"}`.
    ///
    /// `from` and `to` accept addresses or names, `gasLimit` (or `gas`) accepts a number or a hex
    /// quantity. `null` members count as unset.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(members) = value else {
            return Err(Error::UnsupportedValue(format!("{value} (expected an object)")));
        };

        let mut request = Self::new();
        for (key, value) in members {
            if value.is_null() {
                continue;
            }
            if key == "from" || key == "to" {
                let Value::String(text) = &value else {
                    return Err(Error::UnsupportedValue(format!("{value} ({key})")));
                };
                let reference = text.parse::<AddressRef>()?;
                if key == "from" {
                    request.from = Some(reference);
                } else {
                    request.to = Some(reference);
                }
            } else if key == "gasLimit" || key == "gas" {
                request.gas_limit = Some(parse_gas_limit(value)?);
            } else if QUANTITY_FIELDS.contains(&key.as_str()) {
                let quantity = TxValue::quantity_from_json(value)?;
                request.fields.insert(key, quantity);
            } else {
                request.fields.insert(key, TxValue::from_json(value)?);
            }
        }
        Ok(request)
    }

    /// Returns the call data, if set as bytes.
    pub fn data(&self) -> Option<&Bytes> {
        match self.fields.get("data") {
            Some(TxValue::Primitive(Primitive::Bytes(data))) => Some(data),
            _ => None,
        }
    }
}

fn parse_gas_limit(value: Value) -> Result<u64> {
    parse_quantity(&value)
        .and_then(|gas| u64::try_from(gas).ok())
        .ok_or_else(|| Error::UnsupportedValue(format!("{value} (gasLimit)")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use serde_json::json;

    #[test]
    fn test_address_ref_from_str() {
        assert!(matches!(
            AddressRef::from("0xF39FD6E51AAD88F6F4CE6AB8827279CFFFB92266"),
            AddressRef::Address(a) if a == address!("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266")
        ));
        assert!(matches!(AddressRef::from("game.eth"), AddressRef::Name(n) if n == "game.eth"));
    }

    #[test]
    fn test_from_json() {
        let request = TxRequest::from_json(json!({
            "to": "0x1000000000000000000000000000000000000001",
            "gas": "0x5208",
            "from": null,
            "value": 1,
            "data": "0x",
        }))
        .unwrap();

        assert!(request.from.is_none());
        assert_eq!(
            request.to.and_then(|to| to.as_address()),
            Some(address!("0x1000000000000000000000000000000000000001"))
        );
        assert_eq!(request.gas_limit, Some(21_000));
        assert_eq!(request.fields.len(), 2);
        assert_eq!(request.fields["data"], TxValue::from("0x"));
    }

    #[test]
    fn test_from_json_quantities() {
        let request = TxRequest::from_json(json!({
            "value": "1000",
            "nonce": "0x7",
            "maxFeePerGas": 100000000000000000000u128 as f64,
            "gasLimit": "21000",
            "note": "1000",
        }))
        .unwrap();

        assert_eq!(request.gas_limit, Some(21_000));
        assert_eq!(request.fields["value"].to_rpc(), json!("0x3e8"));
        assert_eq!(request.fields["nonce"].to_rpc(), json!("0x7"));
        assert_eq!(request.fields["maxFeePerGas"].to_rpc(), json!("0x56bc75e2d63100000"));
        // Only quantity fields are converted.
        assert_eq!(request.fields["note"].to_rpc(), json!("1000"));

        assert!(matches!(
            TxRequest::from_json(json!({"value": "-5"})),
            Err(Error::UnsupportedValue(_))
        ));
    }

    #[test]
    fn test_address_checksum() {
        let valid = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
        let bad = "0xF39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

        assert!(matches!(valid.parse::<AddressRef>(), Ok(AddressRef::Address(_))));
        assert!(matches!(
            bad.parse::<AddressRef>(),
            Err(Error::InvalidAddress { ref input, .. }) if input == bad
        ));
        assert!(matches!(
            TxRequest::from_json(json!({ "to": bad })),
            Err(Error::InvalidAddress { .. })
        ));

        // The infallible conversion defers the error to resolution.
        let deferred = AddressRef::from(bad);
        assert!(deferred.as_address().is_none());
        assert!(matches!(deferred.literal(), Err(Error::InvalidAddress { .. })));
        assert!(matches!(AddressRef::from("game.eth").literal(), Ok(None)));
    }

    #[test]
    fn test_from_json_rejects_bad_shapes() {
        assert!(matches!(TxRequest::from_json(json!([])), Err(Error::UnsupportedValue(_))));
        assert!(matches!(
            TxRequest::from_json(json!({"to": 5})),
            Err(Error::UnsupportedValue(_))
        ));
        assert!(matches!(
            TxRequest::from_json(json!({"gasLimit": "lots"})),
            Err(Error::UnsupportedValue(_))
        ));
    }
}
