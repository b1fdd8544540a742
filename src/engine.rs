// src/engine.rs
use anyhow::Context;
use clap::{ArgAction, ArgGroup, Parser};
use log::{debug, info};
use std::path::PathBuf;

use crate::bencode::{bvalue_to_json, decode_with, encode_with_limit, json_to_bvalue};
use crate::config::Config;
use crate::file_io::{read_input, write_output};

/// Convert between bencode and JSON.
#[derive(Parser, Debug)]
#[command(name = "bencode", version)]
#[command(group(ArgGroup::new("mode").required(true).args(["decode", "encode"])))]
pub struct Cli {
    /// Decode bencode input and print it as JSON
    #[arg(short, long)]
    pub decode: bool,

    /// Encode JSON input as bencode
    #[arg(short, long)]
    pub encode: bool,

    /// Read input from this file instead of stdin
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Write the result to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Configuration file (defaults to ./bencode.toml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Decode,
    Encode,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.encode {
            Mode::Encode
        } else {
            Mode::Decode
        }
    }
}

pub fn use_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.pretty {
        config.pretty = true;
    }

    let input = match cli.file.as_deref() {
        Some(path) => read_input(Some(path))
            .with_context(|| format!("Failed to read input file {}", path.display()))?,
        None => read_input(None).context("Failed to read stdin")?,
    };

    let mode = cli.mode();
    info!("{:?}: {} input bytes", mode, input.len());
    let output = match mode {
        Mode::Decode => decode_to_json(&input, &config)?.into_bytes(),
        Mode::Encode => encode_from_json(&input, &config)?,
    };

    match cli.output.as_deref() {
        Some(path) => write_output(Some(path), &output)
            .with_context(|| format!("Failed to write output file {}", path.display()))?,
        None => write_output(None, &output).context("Failed to write stdout")?,
    }
    info!("{:?}: {} output bytes", mode, output.len());
    Ok(())
}

/// Decodes a bencoded buffer and renders it as JSON text (newline terminated).
pub fn decode_to_json(input: &[u8], config: &Config) -> anyhow::Result<String> {
    let value = decode_with(input, &config.decode_options())?;
    debug!("Decoded {} value", value.type_name());

    let json_val = bvalue_to_json(&value);
    let mut text = if config.pretty {
        serde_json::to_string_pretty(&json_val)?
    } else {
        serde_json::to_string(&json_val)?
    };
    text.push('\n');
    Ok(text)
}

/// Parses JSON text and encodes it as bencode.
pub fn encode_from_json(input: &[u8], config: &Config) -> anyhow::Result<Vec<u8>> {
    let json_val: serde_json::Value =
        serde_json::from_slice(input).context("Input is not valid JSON")?;
    let value = json_to_bvalue(&json_val)?;
    debug!("Encoding {} value", value.type_name());
    Ok(encode_with_limit(&value, config.max_depth)?)
}
