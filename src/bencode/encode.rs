use super::bvalue::BValue;
use super::error::EncodeError;
use super::MAX_DEPTH;

/// Encode a `BValue` into canonical bencode.
///
/// Dictionary entries are written in ascending byte order of their keys,
/// whatever order the map holds them in, so equal values always produce
/// identical bytes.
///
/// ```
/// use bencode_cli::bencode::{encode_bvalue, BValue};
///
/// let dict = BValue::try_dict([
///     (BValue::string("b"), BValue::from(1)),
///     (BValue::string("a"), BValue::from(2)),
/// ])
/// .unwrap();
/// assert_eq!(encode_bvalue(&dict).unwrap(), b"d1:ai2e1:bi1ee");
/// ```
pub fn encode_bvalue(value: &BValue) -> Result<Vec<u8>, EncodeError> {
	encode_with_limit(value, MAX_DEPTH)
}

/// Like [`encode_bvalue`] with an explicit bound on nested lists/dictionaries.
pub fn encode_with_limit(value: &BValue, max_depth: usize) -> Result<Vec<u8>, EncodeError> {
	let mut out: Vec<u8> = Vec::new();
	encode_value(value, &mut out, 0, max_depth)?;
	Ok(out)
}

fn encode_value(
	value: &BValue,
	out: &mut Vec<u8>,
	depth: usize,
	max_depth: usize,
) -> Result<(), EncodeError> {
	match value {
		BValue::Integer(i) => {
			out.push(b'i');
			out.extend_from_slice(i.to_string().as_bytes());
			out.push(b'e');
		}
		BValue::ByteString(bytes) => encode_bytes(bytes, out),
		BValue::List(items) => {
			check_depth(depth, max_depth)?;
			out.push(b'l');
			for item in items {
				encode_value(item, out, depth + 1, max_depth)?;
			}
			out.push(b'e');
		}
		BValue::Dict(dict) => {
			check_depth(depth, max_depth)?;
			out.push(b'd');
			let mut entries: Vec<(&Vec<u8>, &BValue)> = dict.iter().collect();
			entries.sort_by(|a, b| a.0.cmp(b.0));
			for (key, val) in entries {
				encode_bytes(key, out);
				encode_value(val, out, depth + 1, max_depth)?;
			}
			out.push(b'e');
		}
	}
	Ok(())
}

// length is the raw byte count
fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
	out.extend_from_slice(bytes.len().to_string().as_bytes());
	out.push(b':');
	out.extend_from_slice(bytes);
}

fn check_depth(depth: usize, max_depth: usize) -> Result<(), EncodeError> {
	if depth >= max_depth {
		return Err(EncodeError::NestingTooDeep { limit: max_depth });
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use num_bigint::BigInt;

	use super::*;
	use crate::bencode::BDict;

	#[test]
	fn test_encode_string() {
		assert_eq!(encode_bvalue(&BValue::string("hello")).unwrap(), b"5:hello");
		assert_eq!(encode_bvalue(&BValue::string("")).unwrap(), b"0:");
	}

	#[test]
	fn test_encode_string_counts_bytes() {
		// two characters, four bytes
		assert_eq!(encode_bvalue(&BValue::string("éé")).unwrap(), "4:éé".as_bytes());
		assert_eq!(
			encode_bvalue(&BValue::bytes(vec![0xff, 0x00])).unwrap(),
			b"2:\xff\x00"
		);
	}

	#[test]
	fn test_encode_integer() {
		assert_eq!(encode_bvalue(&BValue::from(2222)).unwrap(), b"i2222e");
		assert_eq!(encode_bvalue(&BValue::from(-42)).unwrap(), b"i-42e");
		assert_eq!(encode_bvalue(&BValue::from(0)).unwrap(), b"i0e");
	}

	#[test]
	fn test_encode_negative_zero() {
		let zero = -BigInt::from(0);
		assert_eq!(encode_bvalue(&BValue::Integer(zero)).unwrap(), b"i0e");
	}

	#[test]
	fn test_encode_big_integer() {
		let huge: BigInt = "-123456789012345678901234567890".parse().unwrap();
		assert_eq!(
			encode_bvalue(&BValue::Integer(huge)).unwrap(),
			b"i-123456789012345678901234567890e"
		);
	}

	#[test]
	fn test_encode_list() {
		let list = BValue::List(vec![BValue::from(1), BValue::string("2"), BValue::string("3")]);
		assert_eq!(encode_bvalue(&list).unwrap(), b"li1e1:21:3e");
	}

	#[test]
	fn test_encode_dict_sorts_keys() {
		let mut dict = BDict::new();
		dict.insert(b"b".to_vec(), BValue::from(1));
		dict.insert(b"a".to_vec(), BValue::from(2));
		assert_eq!(encode_bvalue(&BValue::Dict(dict)).unwrap(), b"d1:ai2e1:bi1ee");
	}

	#[test]
	fn test_encode_dict_sorts_by_raw_bytes() {
		let mut dict = BDict::new();
		dict.insert(vec![0xff], BValue::from(1));
		dict.insert(b"ab".to_vec(), BValue::from(2));
		dict.insert(b"a".to_vec(), BValue::from(3));
		dict.insert(b"B".to_vec(), BValue::from(4));
		assert_eq!(
			encode_bvalue(&BValue::Dict(dict)).unwrap(),
			b"d1:Bi4e1:ai3e2:abi2e1:\xffi1ee"
		);
	}

	#[test]
	fn test_encode_nested() {
		let mut inner = BDict::new();
		inner.insert(b"9".to_vec(), BValue::from(10));
		let mut outer = BDict::new();
		outer.insert(b"8".to_vec(), BValue::Dict(inner));
		outer.insert(
			b"35".to_vec(),
			BValue::List(vec![BValue::from(1), BValue::from(2)]),
		);
		assert_eq!(
			encode_bvalue(&BValue::Dict(outer)).unwrap(),
			b"d2:35li1ei2ee1:8d1:9i10eee"
		);
	}

	#[test]
	fn test_encode_depth_limit() {
		let nested = BValue::List(vec![BValue::List(vec![BValue::List(vec![])])]);
		assert!(encode_with_limit(&nested, 3).is_ok());
		assert_eq!(
			encode_with_limit(&nested, 2),
			Err(EncodeError::NestingTooDeep { limit: 2 })
		);
	}
}
