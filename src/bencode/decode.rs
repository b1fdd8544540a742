use std::sync::LazyLock;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use regex::bytes::Regex;
use serde::{Deserialize, Serialize};

use super::bvalue::{BDict, BValue};
use super::error::DecodeError;
use super::MAX_DEPTH;

// Body of `i...e`. The empty body is handled separately.
static INTEGER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("integer pattern is valid"));

// Canonical integers: no leading zeros, no negative zero.
static CANONICAL_INTEGER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^(0|-?[1-9][0-9]*)$").expect("canonical pattern is valid"));

/// What to do when a dictionary repeats a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeys {
	/// The later value replaces the earlier one; the key keeps its first position.
	#[default]
	LastWins,
	Reject,
}

/// Decoder policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
	/// Maximum number of nested lists/dictionaries.
	pub max_depth: usize,
	/// Reject `ie`, leading zeros and `-0`.
	pub strict_integers: bool,
	pub duplicate_keys: DuplicateKeys,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: MAX_DEPTH,
			strict_integers: false,
			duplicate_keys: DuplicateKeys::LastWins,
		}
	}
}

/// Decodes a complete bencoded buffer with the default (lenient) options.
///
/// The whole input must be exactly one value; anything after it is
/// [`DecodeError::TrailingData`].
pub fn decode_bencode(input: &[u8]) -> Result<BValue, DecodeError> {
	decode_with(input, &DecodeOptions::default())
}

pub fn decode_with(input: &[u8], options: &DecodeOptions) -> Result<BValue, DecodeError> {
	let mut cursor = Cursor {
		input,
		pos: 0,
		options,
	};
	let value = cursor.read_value(0)?;

	if cursor.pos < input.len() {
		return Err(DecodeError::TrailingData { offset: cursor.pos });
	}
	Ok(value)
}

/// Read position for one decode call. Lives on the stack of `decode_with`
/// and is only handed down by `&mut`.
struct Cursor<'a> {
	input: &'a [u8],
	pos: usize,
	options: &'a DecodeOptions,
}

impl Cursor<'_> {
	fn at_end(&self) -> bool {
		self.pos >= self.input.len()
	}

	fn peek(&self) -> Option<u8> {
		self.input.get(self.pos).copied()
	}

	/// Offset of the next `needle` at or after the cursor.
	fn find(&self, needle: u8) -> Option<usize> {
		self.input[self.pos..]
			.iter()
			.position(|&b| b == needle)
			.map(|i| self.pos + i)
	}

	fn read_value(&mut self, depth: usize) -> Result<BValue, DecodeError> {
		match self.peek() {
			None => Err(DecodeError::UnexpectedEndOfInput { offset: self.pos }),
			Some(b'i') => self.read_integer(),
			Some(b'l') => self.read_list(depth),
			Some(b'd') => self.read_dictionary(depth),
			Some(c) if c.is_ascii_digit() => self.read_string(),
			Some(c) => Err(DecodeError::UnknownToken {
				offset: self.pos,
				token: c as char,
			}),
		}
	}

	fn read_integer(&mut self) -> Result<BValue, DecodeError> {
		let start = self.pos;
		self.pos += 1; // skip 'i'

		let end = self
			.find(b'e')
			.ok_or(DecodeError::UnterminatedInteger { offset: start })?;
		let body = &self.input[self.pos..end];

		let value = parse_integer(body, self.options.strict_integers).ok_or_else(|| {
			DecodeError::InvalidInteger {
				offset: self.pos,
				literal: String::from_utf8_lossy(body).into_owned(),
			}
		})?;

		// add 1 to account for 'e'
		self.pos = end + 1;
		Ok(BValue::Integer(value))
	}

	/// Reads `<length>:<bytes>`.
	fn read_string(&mut self) -> Result<BValue, DecodeError> {
		let start = self.pos;
		let colon = self
			.find(b':')
			.ok_or(DecodeError::InvalidStringLength { offset: start })?;

		let length = parse_length(&self.input[start..colon])
			.ok_or(DecodeError::InvalidStringLength { offset: start })?;
		if length.is_negative() {
			return Err(DecodeError::NegativeLength { offset: start });
		}

		let data_start = colon + 1;
		let available = self.input.len() - data_start;
		// a length too large for usize can never be satisfied either
		let length = match length.to_usize() {
			Some(n) if n <= available => n,
			_ => {
				return Err(DecodeError::UnexpectedEndOfString {
					offset: data_start,
					length,
					available,
				})
			}
		};

		let data = self.input[data_start..data_start + length].to_vec();
		self.pos = data_start + length;
		Ok(BValue::ByteString(data))
	}

	fn read_list(&mut self, depth: usize) -> Result<BValue, DecodeError> {
		let start = self.pos;
		self.enter(depth)?;
		self.pos += 1; // skip 'l'

		let mut items = Vec::new();
		while self.peek() != Some(b'e') {
			if self.at_end() {
				return Err(DecodeError::UnterminatedList { offset: start });
			}
			items.push(self.read_value(depth + 1)?);
		}

		self.pos += 1;
		Ok(BValue::List(items))
	}

	fn read_dictionary(&mut self, depth: usize) -> Result<BValue, DecodeError> {
		let start = self.pos;
		self.enter(depth)?;
		self.pos += 1; // skip 'd'

		let mut map = BDict::new();
		while self.peek() != Some(b'e') {
			if self.at_end() {
				return Err(DecodeError::UnterminatedDictionary { offset: start });
			}

			let key_offset = self.pos;
			let key = self.read_value(depth + 1)?;
			// a key with nothing after it is a truncated dictionary, whatever its type
			if self.at_end() {
				return Err(DecodeError::UnterminatedDictionary { offset: start });
			}
			let key = match key {
				BValue::ByteString(bytes) => bytes,
				other => {
					return Err(DecodeError::NonStringKey {
						offset: key_offset,
						type_name: other.type_name(),
					})
				}
			};

			if self.options.duplicate_keys == DuplicateKeys::Reject && map.contains_key(&key) {
				return Err(DecodeError::DuplicateKey {
					offset: key_offset,
					key: String::from_utf8_lossy(&key).into_owned(),
				});
			}

			let value = self.read_value(depth + 1)?;
			map.insert(key, value);
		}

		self.pos += 1;
		Ok(BValue::Dict(map))
	}

	/// Fails if opening one more container would exceed the depth limit.
	fn enter(&self, depth: usize) -> Result<(), DecodeError> {
		if depth >= self.options.max_depth {
			return Err(DecodeError::NestingTooDeep {
				offset: self.pos,
				limit: self.options.max_depth,
			});
		}
		Ok(())
	}
}

fn parse_integer(body: &[u8], strict: bool) -> Option<BigInt> {
	if body.is_empty() {
		// `ie` is accepted as zero unless strict
		return (!strict).then(BigInt::zero);
	}
	if !INTEGER.is_match(body) {
		return None;
	}
	if strict && !CANONICAL_INTEGER.is_match(body) {
		return None;
	}
	BigInt::parse_bytes(body, 10)
}

/// Parses a string length prefix. A sign is tolerated here so that a negative
/// length is reported as such rather than as garbage. The value is unbounded;
/// the caller compares it against what is left of the input.
fn parse_length(span: &[u8]) -> Option<BigInt> {
	if !INTEGER.is_match(span) {
		return None;
	}
	BigInt::parse_bytes(span, 10)
}
