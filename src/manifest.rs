//! Append-only link manifest (`known_links.toml`).
//!
//! One line per successful operation:
//!
//! ```text
//! "/home/u/.vimrc" = "vimrc"
//! ```
//!
//! Each line is a self-contained TOML key/value pair, so the file doubles as
//! a human-readable log and, as long as no link path repeats, a flat TOML
//! table.  Entries are never rewritten or removed.
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::error::{ConfshelfError, Result};

/// A single manifest entry: a link in the filesystem and the repository
/// member it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedLink {
    /// Where the symbolic link lives.
    pub link_path: PathBuf,
    /// Name of the linked file inside the repository root.
    pub repo_relative_name: String,
}

impl ManagedLink {
    /// Create a new entry.
    #[must_use]
    pub fn new(link_path: impl Into<PathBuf>, repo_relative_name: impl Into<String>) -> Self {
        Self {
            link_path: link_path.into(),
            repo_relative_name: repo_relative_name.into(),
        }
    }

    /// Render this entry as one manifest line, including the trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfshelfError::NonUtf8Path`] if the link path is not valid UTF-8.
    pub fn to_line(&self) -> Result<String> {
        let key = self
            .link_path
            .to_str()
            .ok_or_else(|| ConfshelfError::NonUtf8Path {
                path: self.link_path.clone(),
            })?;
        Ok(format!(
            "{} = {}\n",
            quote(key),
            quote(&self.repo_relative_name)
        ))
    }
}

/// Encode `s` as a TOML basic string.
///
/// Ordinary paths pass through unchanged; only `"`, `\` and control
/// characters are escaped.  The `toml` serializer is not used here because
/// it picks literal strings (`'...'`) for values containing `\` or `"`,
/// and every manifest line must keep the `"<link>" = "<name>"` shape.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Reader/writer for the manifest file.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    /// Create a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, creating the file if needed.
    ///
    /// The line is rendered up front and written with a single `write_all`,
    /// so an unrepresentable entry writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfshelfError::NonUtf8Path`] for a non-UTF-8 link path, or
    /// [`ConfshelfError::Io`] if the file cannot be opened or written.
    pub fn append(&self, entry: &ManagedLink) -> Result<()> {
        let line = entry.to_line()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                ConfshelfError::io(format!("failed to open \"{}\"", self.path.display()), e)
            })?;
        file.write_all(line.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| {
                ConfshelfError::io(format!("failed to write \"{}\"", self.path.display()), e)
            })
    }

    /// Read every entry in file order, duplicates included.
    ///
    /// A missing file reads as an empty manifest.  Blank lines and `#`
    /// comments are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfshelfError::Io`] if the file exists but cannot be read,
    /// or [`ConfshelfError::Config`] if a line is not a quoted key/value pair.
    pub fn read(&self) -> Result<Vec<ManagedLink>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ConfshelfError::io(
                    format!("failed to read \"{}\"", self.path.display()),
                    e,
                ));
            }
        };
        parse_entries(&content).map_err(|(line_no, message)| {
            ConfshelfError::config(&self.path, format!("line {line_no}: {message}"))
        })
    }

    /// Latest recorded repository name per link path (last occurrence wins).
    ///
    /// # Errors
    ///
    /// Propagates errors from [`ManifestStore::read`].
    pub fn latest(&self) -> Result<BTreeMap<PathBuf, String>> {
        Ok(self
            .read()?
            .into_iter()
            .map(|entry| (entry.link_path, entry.repo_relative_name))
            .collect())
    }
}

/// Parse manifest text line by line.  Errors carry the 1-based line number.
fn parse_entries(content: &str) -> std::result::Result<Vec<ManagedLink>, (usize, String)> {
    let mut entries = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let table: toml::Table = toml::from_str(line).map_err(|e| (idx + 1, e.message().to_string()))?;
        let mut pairs = table.into_iter();
        let (key, value) = match (pairs.next(), pairs.next()) {
            (Some(pair), None) => pair,
            _ => return Err((idx + 1, "expected exactly one entry".to_string())),
        };
        let toml::Value::String(name) = value else {
            return Err((idx + 1, format!("value for \"{key}\" is not a string")));
        };
        entries.push(ManagedLink::new(key, name));
    }
    Ok(entries)
}
