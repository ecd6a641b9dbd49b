//! Java-style `.properties` reader.
//!
//! Covers the subset build tools actually write: `key=value` and
//! `key:value` pairs, `#`/`!` comments, and backslash line continuations.
//! Values wrapped in one matching pair of quotes are unquoted.

use std::collections::HashMap;
use std::path::Path;

/// Property name to value. Later writers win when tables are merged.
pub type PropertyTable = HashMap<String, String>;

/// Reads a `.properties` file.
///
/// A missing file is not an error: it yields an empty table. Other read
/// failures are logged and also yield an empty table, since every
/// properties file consulted by the resolvers is optional.
pub fn read_properties_file(path: &Path) -> PropertyTable {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            tracing::debug!("Read properties file {:?}", path);
            parse_properties(&content)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => PropertyTable::new(),
        Err(e) => {
            tracing::warn!("Failed to read properties file {:?}: {}", path, e);
            PropertyTable::new()
        }
    }
}

/// Parses `.properties` content into a table.
pub fn parse_properties(content: &str) -> PropertyTable {
    let mut table = PropertyTable::new();

    for line in logical_lines(content) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let (key, value) = match trimmed.find(['=', ':']) {
            Some(idx) => (trimmed[..idx].trim(), trimmed[idx + 1..].trim()),
            None => (trimmed, ""),
        };
        if key.is_empty() {
            continue;
        }

        table.insert(key.to_string(), strip_quotes(value).to_string());
    }

    table
}

/// Joins physical lines ending in an unescaped backslash.
fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending = String::new();

    for raw in content.lines() {
        let part = if pending.is_empty() {
            raw
        } else {
            raw.trim_start()
        };

        if continues(part) {
            pending.push_str(&part[..part.len() - 1]);
        } else {
            pending.push_str(part);
            lines.push(std::mem::take(&mut pending));
        }
    }
    if !pending.is_empty() {
        lines.push(pending);
    }

    lines
}

fn continues(line: &str) -> bool {
    let trailing = line.bytes().rev().take_while(|&b| b == b'\\').count();
    trailing % 2 == 1
}

fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &value[1..value.len() - 1];
        }
    }
    value
}
