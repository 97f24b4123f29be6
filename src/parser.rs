//! `my.cnf` loader.
//!
//! The grammar is the permissive INI dialect MySQL itself accepts:
//! - `=` is the only key/value delimiter
//! - lines without a delimiter are flag keys with an empty value
//! - inline comments are part of the value, quotes are kept verbatim
//! - unrecognizable lines are skipped
//! - the same key twice in one section is an error

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::document::{Document, Entry};

/// `[name]` up to the last `]`; anything after it is ignored.
static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(?P<name>.*)\]").expect("section header regex is valid"));

const BOM: char = '\u{FEFF}';

/// Error type for loading a `my.cnf`
#[derive(Debug)]
pub enum ParseError {
    /// IO error reading the file
    Io(io::Error),
    /// The same key appears twice in one section
    DuplicateKey {
        section: String,
        key: String,
        line: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io(e) => write!(f, "failed to read file: {e}"),
            ParseError::DuplicateKey { section, key, line } => write!(
                f,
                "duplicate key '{key}' in section [{section}] at line {line}"
            ),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            ParseError::DuplicateKey { .. } => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        ParseError::Io(e)
    }
}

/// Load and parse a `my.cnf` from the given path.
pub fn parse_file(path: &Path) -> Result<Document, ParseError> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parse `my.cnf` content.
///
/// Entries before the first section header belong to no section and are
/// dropped, since the format has no default section.
pub fn parse_str(content: &str) -> Result<Document, ParseError> {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let mut doc = Document::new();
    let mut current: Option<String> = None;

    for (line_idx, raw) in content.lines().enumerate() {
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            // An unclosed or empty header is skipped like any other
            // unrecognizable line.
            if let Some(caps) = SECTION_HEADER.captures(line) {
                let name = caps["name"].trim();
                if !name.is_empty() {
                    doc.section_mut_or_insert(name);
                    current = Some(name.to_string());
                }
            }
            continue;
        }

        let Some(entry) = parse_entry(line) else {
            continue;
        };

        let Some(section_name) = current.as_deref() else {
            continue;
        };

        let section = doc.section_mut_or_insert(section_name);
        if section.has_key(&entry.key) {
            return Err(ParseError::DuplicateKey {
                section: section_name.to_string(),
                key: entry.key,
                line: line_idx + 1,
            });
        }
        section.push(entry);
    }

    Ok(doc)
}

/// Split a trimmed, non-comment line into an entry.
///
/// Returns `None` when the key would be empty.
fn parse_entry(line: &str) -> Option<Entry> {
    let (key, value) = match line.split_once('=') {
        Some((key, value)) => (key.trim(), value.trim()),
        None => return Some(Entry::flag(line)),
    };

    if key.is_empty() {
        return None;
    }

    Some(Entry::new(key, value))
}
