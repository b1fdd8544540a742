use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::ToPrimitive;

use super::error::EncodeError;

/// Dictionary payload. Iterates in the order keys were first seen; equality
/// ignores order.
pub type BDict = IndexMap<Vec<u8>, BValue>;

/// A bencode value.
///
/// ```
/// use bencode_cli::bencode::{decode_bencode, BValue};
///
/// let value = decode_bencode(b"d4:spaml1:a1:bee").unwrap();
/// let spam = value.get(b"spam").and_then(BValue::as_list).unwrap();
/// assert_eq!(spam[0].as_str(), Some("a"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BValue {
	ByteString(Vec<u8>), // raw bytes for any string
	Integer(BigInt),
	List(Vec<BValue>),
	Dict(BDict), // keys are raw bytes, sorted only when encoding
}

impl BValue {
	/// Byte string holding the UTF-8 bytes of `s`.
	pub fn string(s: &str) -> Self {
		BValue::ByteString(s.as_bytes().to_vec())
	}

	pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
		BValue::ByteString(b.into())
	}

	pub fn integer(i: impl Into<BigInt>) -> Self {
		BValue::Integer(i.into())
	}

	/// Builds a dictionary from caller-supplied pairs.
	///
	/// Keys must be byte strings; any other case is rejected rather than
	/// stringified. A repeated key keeps its first position and its last value.
	///
	/// ```
	/// use bencode_cli::bencode::BValue;
	///
	/// let dict = BValue::try_dict([(BValue::string("b"), BValue::from(1))]).unwrap();
	/// assert_eq!(dict.get(b"b").and_then(BValue::as_i64), Some(1));
	///
	/// assert!(BValue::try_dict([(BValue::from(1), BValue::from(2))]).is_err());
	/// ```
	pub fn try_dict<I>(pairs: I) -> Result<Self, EncodeError>
	where
		I: IntoIterator<Item = (BValue, BValue)>,
	{
		let mut map = BDict::new();
		for (key, value) in pairs {
			match key {
				BValue::ByteString(bytes) => {
					map.insert(bytes, value);
				}
				other => {
					return Err(EncodeError::NonStringKey {
						type_name: other.type_name().to_string(),
					})
				}
			}
		}
		Ok(BValue::Dict(map))
	}

	/// Human readable name of the case, used in error messages.
	pub fn type_name(&self) -> &'static str {
		match self {
			BValue::ByteString(_) => "byte string",
			BValue::Integer(_) => "integer",
			BValue::List(_) => "list",
			BValue::Dict(_) => "dictionary",
		}
	}

	pub fn as_integer(&self) -> Option<&BigInt> {
		match self {
			BValue::Integer(i) => Some(i),
			_ => None,
		}
	}

	/// The integer, if it is one and fits in an `i64`.
	pub fn as_i64(&self) -> Option<i64> {
		self.as_integer().and_then(ToPrimitive::to_i64)
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			BValue::ByteString(b) => Some(b.as_slice()),
			_ => None,
		}
	}

	/// The byte string as text, if it is one and is valid UTF-8.
	pub fn as_str(&self) -> Option<&str> {
		self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
	}

	pub fn as_list(&self) -> Option<&[BValue]> {
		match self {
			BValue::List(l) => Some(l.as_slice()),
			_ => None,
		}
	}

	pub fn as_dict(&self) -> Option<&BDict> {
		match self {
			BValue::Dict(d) => Some(d),
			_ => None,
		}
	}

	pub fn into_dict(self) -> Option<BDict> {
		match self {
			BValue::Dict(d) => Some(d),
			_ => None,
		}
	}

	/// Looks up `key` if this value is a dictionary.
	pub fn get(&self, key: &[u8]) -> Option<&BValue> {
		self.as_dict()?.get(key)
	}
}

impl From<i64> for BValue {
	fn from(i: i64) -> Self {
		BValue::Integer(i.into())
	}
}

impl From<i32> for BValue {
	fn from(i: i32) -> Self {
		BValue::Integer(i.into())
	}
}

impl From<u64> for BValue {
	fn from(i: u64) -> Self {
		BValue::Integer(i.into())
	}
}

impl From<BigInt> for BValue {
	fn from(i: BigInt) -> Self {
		BValue::Integer(i)
	}
}

impl From<&str> for BValue {
	fn from(s: &str) -> Self {
		BValue::string(s)
	}
}

impl From<String> for BValue {
	fn from(s: String) -> Self {
		BValue::ByteString(s.into_bytes())
	}
}

impl From<Vec<u8>> for BValue {
	fn from(b: Vec<u8>) -> Self {
		BValue::ByteString(b)
	}
}

impl From<Vec<BValue>> for BValue {
	fn from(l: Vec<BValue>) -> Self {
		BValue::List(l)
	}
}

impl From<BDict> for BValue {
	fn from(d: BDict) -> Self {
		BValue::Dict(d)
	}
}
