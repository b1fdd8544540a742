use num_bigint::BigInt;
use thiserror::Error;

/// Reasons a byte buffer is rejected by the decoder.
///
/// Every variant carries the byte offset at which the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
	#[error("Unexpected end of input at byte {offset}")]
	UnexpectedEndOfInput { offset: usize },

	#[error("Unknown token {token:?} at byte {offset}")]
	UnknownToken { offset: usize, token: char },

	#[error("Unterminated integer starting at byte {offset}")]
	UnterminatedInteger { offset: usize },

	#[error("Invalid integer {literal:?} at byte {offset}")]
	InvalidInteger { offset: usize, literal: String },

	#[error("Invalid string length at byte {offset}")]
	InvalidStringLength { offset: usize },

	#[error("Negative string length at byte {offset}")]
	NegativeLength { offset: usize },

	#[error("Unexpected end of string at byte {offset}: {length} bytes declared, {available} available")]
	UnexpectedEndOfString { offset: usize, length: BigInt, available: usize },

	#[error("Unterminated list starting at byte {offset}")]
	UnterminatedList { offset: usize },

	#[error("Unterminated dictionary starting at byte {offset}")]
	UnterminatedDictionary { offset: usize },

	#[error("Dictionary keys must be strings, got {type_name} at byte {offset}")]
	NonStringKey { offset: usize, type_name: &'static str },

	#[error("Duplicate dictionary key {key:?} at byte {offset}")]
	DuplicateKey { offset: usize, key: String },

	#[error("Nesting deeper than {limit} levels at byte {offset}")]
	NestingTooDeep { offset: usize, limit: usize },

	#[error("Unexpected trailing data at byte {offset}")]
	TrailingData { offset: usize },
}

impl DecodeError {
	/// Byte offset into the input where decoding stopped.
	pub fn offset(&self) -> usize {
		match *self {
			DecodeError::UnexpectedEndOfInput { offset }
			| DecodeError::UnknownToken { offset, .. }
			| DecodeError::UnterminatedInteger { offset }
			| DecodeError::InvalidInteger { offset, .. }
			| DecodeError::InvalidStringLength { offset }
			| DecodeError::NegativeLength { offset }
			| DecodeError::UnexpectedEndOfString { offset, .. }
			| DecodeError::UnterminatedList { offset }
			| DecodeError::UnterminatedDictionary { offset }
			| DecodeError::NonStringKey { offset, .. }
			| DecodeError::DuplicateKey { offset, .. }
			| DecodeError::NestingTooDeep { offset, .. }
			| DecodeError::TrailingData { offset } => offset,
		}
	}
}

/// Reasons a value cannot be turned into bencode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
	#[error("Unsupported type for bencode: {type_name}")]
	UnsupportedType { type_name: String },

	#[error("Dictionary keys must be strings, got: {type_name}")]
	NonStringKey { type_name: String },

	#[error("Nesting deeper than {limit} levels")]
	NestingTooDeep { limit: usize },
}
