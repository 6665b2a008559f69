use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a content body from a file path, with `-` meaning stdin.
pub fn read_body(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        return read_stdin();
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Read a content body from stdin until EOF.
pub fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(buffer)
}

/// File name to use for a local path inside a gist payload.
pub fn entry_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
        .with_context(|| format!("Path has no usable file name: {}", path.display()))
}
