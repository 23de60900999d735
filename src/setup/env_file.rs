//! `.env` writer
//!
//! Keys already present are rewritten in place; everything else in the file, comments
//! included, is left as it was. Values are quoted so that `dotenvy` reads them back
//! verbatim.

use crate::setup::SetupError;
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        EnvFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sets `key` to `value`, creating the file if needed.
    pub fn set_key(&self, key: &str, value: &str) -> Result<(), SetupError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(source) => {
                return Err(SetupError::EnvFile {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let updated = upsert(&contents, key, value);
        fs::write(&self.path, updated).map_err(|source| SetupError::EnvFile {
            path: self.path.clone(),
            source,
        })?;

        debug!("set {key} in {}", self.path.display());
        Ok(())
    }
}

fn upsert(contents: &str, key: &str, value: &str) -> String {
    let assignment = format!("{key}={}", quote(value));
    let mut replaced = false;
    let mut lines = Vec::new();

    for line in contents.lines() {
        if line_key(line) == Some(key) {
            // later duplicates would shadow the new value
            if !replaced {
                lines.push(assignment.clone());
                replaced = true;
            }
        } else {
            lines.push(line.to_owned());
        }
    }

    if !replaced {
        lines.push(assignment);
    }

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

/// Key assigned on this line, if it is an assignment.
fn line_key(line: &str) -> Option<&str> {
    let line = line.trim_start();
    if line.starts_with('#') {
        return None;
    }

    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, _) = line.split_once('=')?;
    let key = key.trim();
    (!key.is_empty()).then_some(key)
}

fn quote(value: &str) -> String {
    if !value.contains('\'') && !value.contains('\n') {
        return format!("'{value}'");
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '$' => quoted.push_str("\\$"),
            '\n' => quoted.push_str("\\n"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
