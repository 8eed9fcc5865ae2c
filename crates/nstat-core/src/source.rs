//! Payload sources: where a stats dump is read from.
//!
//! Reading is the only I/O in this crate. Every source yields a parsed JSON
//! object; anything else is a [`LoadError`].

use crate::error::LoadError;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A place a stats payload can come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Stdin,
    /// Pasted text.
    Text(String),
}

impl Source {
    /// Interpret a command-line argument; `-` means stdin.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Source::Stdin
        } else {
            Source::File(PathBuf::from(arg))
        }
    }

    /// Default snapshot name for this source.
    pub fn label(&self) -> String {
        match self {
            Source::File(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Source::Stdin => "stdin".to_string(),
            Source::Text(_) => "pasted".to_string(),
        }
    }

    /// Read and parse the payload.
    pub fn read(&self) -> Result<Value, LoadError> {
        match self {
            Source::File(path) => parse_payload(&read_file(path)?),
            Source::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .map_err(|source| LoadError::Io { path: PathBuf::from("<stdin>"), source })?;
                parse_payload(&text)
            }
            Source::Text(text) => parse_payload(text),
        }
    }
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path)
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })
}

/// Parse `text` as a stats payload. The top-level value must be an object.
pub fn parse_payload(text: &str) -> Result<Value, LoadError> {
    let value: Value = serde_json::from_str(text)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(LoadError::NotAnObject { found: json_kind(&value) })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
