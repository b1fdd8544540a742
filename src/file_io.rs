// src/file_io.rs
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

/// Reads the whole input, from `path` if given, otherwise from stdin.
pub fn read_input(path: Option<&Path>) -> io::Result<Vec<u8>> {
	let mut buf = Vec::new();
	match path {
		Some(path) => {
			File::open(path)?.read_to_end(&mut buf)?;
			debug!("Read {} bytes from {}", buf.len(), path.display());
		}
		None => {
			io::stdin().lock().read_to_end(&mut buf)?;
			debug!("Read {} bytes from stdin", buf.len());
		}
	}
	Ok(buf)
}

/// Writes `data` to `path` (created or truncated) if given, otherwise to stdout.
pub fn write_output(path: Option<&Path>, data: &[u8]) -> io::Result<()> {
	match path {
		Some(path) => {
			let mut writer = BufWriter::new(File::create(path)?);
			writer.write_all(data)?;
			writer.flush()?;
			debug!("Wrote {} bytes to {}", data.len(), path.display());
		}
		None => {
			let mut stdout = io::stdout().lock();
			stdout.write_all(data)?;
			stdout.flush()?;
		}
	}
	Ok(())
}
