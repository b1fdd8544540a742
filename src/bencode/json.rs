use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde_json::{json, Map, Value};

use super::bvalue::{BDict, BValue};
use super::encode::encode_bvalue;
use super::error::EncodeError;

/// Marker key for byte strings that are not valid UTF-8.
pub const BYTES_HEX_KEY: &str = "_bytes_hex";
/// Marker key for integers outside the `i64`/`u64` range.
pub const BIGINT_KEY: &str = "_bigint";
/// Marker key wrapping a dictionary that would otherwise read as a marker.
pub const DICT_KEY: &str = "_dict";
/// Marker key for a dictionary with non-UTF-8 keys; every key is hex-encoded.
pub const DICT_HEX_KEY: &str = "_dict_hex";

const MARKER_KEYS: [&str; 4] = [BYTES_HEX_KEY, BIGINT_KEY, DICT_KEY, DICT_HEX_KEY];

/// Convert a `BValue` into JSON (using Serde JSON `Value`).
///
/// - `Integer(i)` => JSON number, or `{"_bigint": "<decimal>"}` when it does
///   not fit in 64 bits
/// - `ByteString(bytes)` => string if UTF-8, otherwise `{"_bytes_hex": "<hex>"}`
/// - `List(...)` => JSON array
/// - `Dict(...)` => JSON object in dictionary order. A dictionary with a key
///   that is not UTF-8 becomes `{"_dict_hex": {"<hex key>": ...}}`, and one
///   whose only key is a marker key is wrapped as `{"_dict": {...}}`, so
///   [`json_to_bvalue`] always gets the same value back.
pub fn bvalue_to_json(bv: &BValue) -> Value {
	match bv {
		BValue::Integer(i) => {
			if let Some(n) = i.to_i64() {
				json!(n)
			} else if let Some(n) = i.to_u64() {
				json!(n)
			} else {
				marker(BIGINT_KEY, i.to_string())
			}
		}
		BValue::ByteString(bytes) => match std::str::from_utf8(bytes) {
			Ok(utf8_str) => Value::String(utf8_str.to_owned()),
			Err(_) => marker(BYTES_HEX_KEY, hex::encode(bytes)),
		},
		BValue::List(list_items) => Value::Array(list_items.iter().map(bvalue_to_json).collect()),
		BValue::Dict(map) => dict_to_json(map),
	}
}

fn dict_to_json(map: &BDict) -> Value {
	let utf8_keys: Option<Vec<&str>> = map
		.keys()
		.map(|k| std::str::from_utf8(k).ok())
		.collect();

	let Some(keys) = utf8_keys else {
		let hex_map = map
			.iter()
			.map(|(k, v)| (hex::encode(k), bvalue_to_json(v)))
			.collect();
		return wrap(DICT_HEX_KEY, Value::Object(hex_map));
	};

	let json_map: Map<String, Value> = keys
		.into_iter()
		.zip(map.values())
		.map(|(k, v)| (k.to_owned(), bvalue_to_json(v)))
		.collect();
	let looks_like_marker =
		json_map.len() == 1 && json_map.keys().all(|k| MARKER_KEYS.contains(&k.as_str()));
	if looks_like_marker {
		wrap(DICT_KEY, Value::Object(json_map))
	} else {
		Value::Object(json_map)
	}
}

/// Convert JSON into a `BValue`.
///
/// JSON has types bencode cannot carry: `null`, booleans and floating-point
/// numbers are rejected with [`EncodeError::UnsupportedType`]. The marker
/// objects produced by [`bvalue_to_json`] are turned back into byte strings,
/// integers and dictionaries.
pub fn json_to_bvalue(value: &Value) -> Result<BValue, EncodeError> {
	match value {
		Value::Null => Err(unsupported("null")),
		Value::Bool(_) => Err(unsupported("boolean")),
		Value::Number(n) => {
			if let Some(i) = n.as_i64() {
				Ok(BValue::from(i))
			} else if let Some(u) = n.as_u64() {
				Ok(BValue::from(u))
			} else {
				Err(unsupported("float"))
			}
		}
		Value::String(s) => Ok(BValue::string(s)),
		Value::Array(items) => items
			.iter()
			.map(json_to_bvalue)
			.collect::<Result<Vec<_>, _>>()
			.map(BValue::List),
		Value::Object(map) => match from_marker(map) {
			Some(marked) => marked,
			None => object_to_dict(map.iter().map(|(k, v)| (k.as_bytes().to_vec(), v))),
		},
	}
}

fn object_to_dict<'a>(
	entries: impl Iterator<Item = (Vec<u8>, &'a Value)>,
) -> Result<BValue, EncodeError> {
	let mut dict = BDict::new();
	for (k, v) in entries {
		dict.insert(k, json_to_bvalue(v)?);
	}
	Ok(BValue::Dict(dict))
}

/// Encode a JSON document straight to bencode.
///
/// ```
/// use bencode_cli::bencode::encode_json;
///
/// let json = serde_json::json!({ "greeting": "hi" });
/// assert_eq!(encode_json(&json).unwrap(), b"d8:greeting2:hie");
/// assert!(encode_json(&serde_json::json!(0.22)).is_err());
/// ```
pub fn encode_json(value: &Value) -> Result<Vec<u8>, EncodeError> {
	encode_bvalue(&json_to_bvalue(value)?)
}

fn marker(key: &str, payload: String) -> Value {
	wrap(key, Value::String(payload))
}

fn wrap(key: &str, inner: Value) -> Value {
	let mut map = Map::new();
	map.insert(key.to_string(), inner);
	Value::Object(map)
}

fn unsupported(type_name: &str) -> EncodeError {
	EncodeError::UnsupportedType {
		type_name: type_name.to_string(),
	}
}

// Single-key objects carrying a valid payload; anything else is a plain dictionary.
fn from_marker(map: &Map<String, Value>) -> Option<Result<BValue, EncodeError>> {
	if map.len() != 1 {
		return None;
	}
	let (key, value) = map.iter().next()?;
	match key.as_str() {
		BYTES_HEX_KEY => hex::decode(value.as_str()?).ok().map(|b| Ok(BValue::ByteString(b))),
		BIGINT_KEY => BigInt::parse_bytes(value.as_str()?.as_bytes(), 10)
			.map(|i| Ok(BValue::Integer(i))),
		DICT_KEY => {
			let inner = value.as_object()?;
			Some(object_to_dict(inner.iter().map(|(k, v)| (k.as_bytes().to_vec(), v))))
		}
		DICT_HEX_KEY => {
			let inner = value.as_object()?;
			let keys = inner
				.keys()
				.map(|k| hex::decode(k).ok())
				.collect::<Option<Vec<_>>>()?;
			Some(object_to_dict(keys.into_iter().zip(inner.values())))
		}
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bencode::decode_bencode;

	#[test]
	fn test_bvalue_to_json() {
		let value = decode_bencode(b"d3:fooi42e3:barl4:spami1eee").unwrap();
		assert_eq!(bvalue_to_json(&value), json!({ "foo": 42, "bar": ["spam", 1] }));
	}

	#[test]
	fn test_binary_bytes_to_hex() {
		let value = BValue::bytes(vec![0xde, 0xad, 0xbe, 0xef]);
		assert_eq!(bvalue_to_json(&value), json!({ "_bytes_hex": "deadbeef" }));
		assert_eq!(json_to_bvalue(&bvalue_to_json(&value)).unwrap(), value);
	}

	#[test]
	fn test_big_integer_marker() {
		let huge: BigInt = "123456789012345678901234567890".parse().unwrap();
		let value = BValue::Integer(huge);
		assert_eq!(
			bvalue_to_json(&value),
			json!({ "_bigint": "123456789012345678901234567890" })
		);
		assert_eq!(json_to_bvalue(&bvalue_to_json(&value)).unwrap(), value);
	}

	#[test]
	fn test_u64_stays_a_number() {
		let value = BValue::from(u64::MAX);
		assert_eq!(bvalue_to_json(&value), json!(u64::MAX));
		assert_eq!(json_to_bvalue(&json!(u64::MAX)).unwrap(), value);
	}

	#[test]
	fn test_invalid_marker_is_a_dict() {
		let value = json_to_bvalue(&json!({ "_bytes_hex": "not hex" })).unwrap();
		assert_eq!(value.get(b"_bytes_hex").and_then(BValue::as_str), Some("not hex"));

		let value = json_to_bvalue(&json!({ "_bigint": "1", "other": 2 })).unwrap();
		assert_eq!(value.as_dict().map(|d| d.len()), Some(2));

		let value = json_to_bvalue(&json!({ "_dict_hex": { "zz": 1 } })).unwrap();
		assert!(value.get(b"_dict_hex").and_then(|v| v.get(b"zz")).is_some());
	}

	#[test]
	fn test_dict_that_looks_like_a_marker() {
		let value = decode_bencode(b"d10:_bytes_hex2:abe").unwrap();
		let json = bvalue_to_json(&value);
		assert_eq!(json, json!({ "_dict": { "_bytes_hex": "ab" } }));
		assert_eq!(json_to_bvalue(&json).unwrap(), value);
		assert_eq!(encode_json(&json).unwrap(), b"d10:_bytes_hex2:abe");

		for key in ["_bigint", "_dict", "_dict_hex"] {
			let value = BValue::try_dict([(BValue::string(key), BValue::from(1))]).unwrap();
			assert_eq!(json_to_bvalue(&bvalue_to_json(&value)).unwrap(), value, "{key}");
		}
	}

	#[test]
	fn test_non_utf8_keys_stay_distinct() {
		let value = decode_bencode(b"d1:\xffi1e1:\xfei2ee").unwrap();
		let json = bvalue_to_json(&value);
		assert_eq!(json, json!({ "_dict_hex": { "ff": 1, "fe": 2 } }));
		assert_eq!(json_to_bvalue(&json).unwrap(), value);
		assert_eq!(encode_json(&json).unwrap(), b"d1:\xfei2e1:\xffi1ee");
	}

	#[test]
	fn test_mixed_keys_are_all_hex_encoded() {
		let value = decode_bencode(b"d1:ai1e1:\xffi2ee").unwrap();
		assert_eq!(
			bvalue_to_json(&value),
			json!({ "_dict_hex": { "61": 1, "ff": 2 } })
		);
	}

	#[test]
	fn test_objects_keep_dictionary_order() {
		let value = decode_bencode(b"d1:bi1e1:ai2ee").unwrap();
		assert_eq!(serde_json::to_string(&bvalue_to_json(&value)).unwrap(), r#"{"b":1,"a":2}"#);
	}

	#[test]
	fn test_unsupported_json_types() {
		for (input, type_name) in [
			(json!(0.22), "float"),
			(json!(null), "null"),
			(json!(true), "boolean"),
			(json!([1, [2, null]]), "null"),
			(json!({ "a": { "b": 1.5 } }), "float"),
		] {
			assert_eq!(
				json_to_bvalue(&input),
				Err(EncodeError::UnsupportedType {
					type_name: type_name.to_string()
				})
			);
		}
	}

	#[test]
	fn test_encode_json() {
		assert_eq!(encode_json(&json!({ "greeting": "hi" })).unwrap(), b"d8:greeting2:hie");
		assert_eq!(encode_json(&json!({ "b": 1, "a": 2 })).unwrap(), b"d1:ai2e1:bi1ee");
		assert_eq!(encode_json(&json!([1, "2", "3"])).unwrap(), b"li1e1:21:3e");
		assert_eq!(encode_json(&json!(2222)).unwrap(), b"i2222e");
	}
}
