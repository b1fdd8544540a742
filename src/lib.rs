// lib.rs - Library interface for the bencode CLI

pub mod bencode;
pub mod config;
pub mod engine;
pub mod file_io;

// Re-export commonly used types for easier testing
pub use bencode::{
    bvalue_to_json, decode_bencode, decode_with, encode_bvalue, encode_json, encode_with_limit,
    json_to_bvalue, BDict, BValue, DecodeError, DecodeOptions, DuplicateKeys, EncodeError,
};
pub use config::Config;
