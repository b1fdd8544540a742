//! Bencode encoding and decoding ([BEP-3]).
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! Decoding accepts a little more than it produces (`ie` is zero, leading
//! zeros are tolerated, dictionary keys may come in any order); encoding
//! always emits the canonical form.
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

pub mod bvalue;
pub mod decode;
pub mod encode;
pub mod error;
pub mod json;

pub use bvalue::{BDict, BValue};   // re-export
pub use decode::{decode_bencode, decode_with, DecodeOptions, DuplicateKeys};   // re-export
pub use encode::{encode_bvalue, encode_with_limit};   // re-export
pub use error::{DecodeError, EncodeError};
pub use json::{bvalue_to_json, encode_json, json_to_bvalue};

/// Default bound on nested lists/dictionaries for both directions.
pub const MAX_DEPTH: usize = 256;
