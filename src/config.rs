//! User configuration (`~/.confshelf/config.toml`).
//!
//! The file is seeded with commented defaults on first run and read on every
//! invocation.  Only two keys are understood; unknown keys are ignored so
//! that newer files keep working with older binaries.
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfshelfError, Result};

/// The only configuration format version this build understands.
pub const CONFIG_VERSION: &str = "1";

/// Content written by [`ensure_default`].
pub const DEFAULT_CONFIG: &str = r#"# Configuration format version.
# Do not modify this variable!
config_version = "1"
# An absolute path to a repository.
# The path doesn't have to be a git repository.
repository_path = ""
"#;

/// Parsed configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Format version of the file; must equal [`CONFIG_VERSION`].
    pub config_version: String,
    /// Absolute repository location, or empty for the default.
    pub repository_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: CONFIG_VERSION.to_string(),
            repository_path: String::new(),
        }
    }
}

impl Config {
    /// Load and validate the configuration at `path`.
    ///
    /// A missing file yields [`Config::default`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfshelfError::Io`] if the file exists but cannot be read,
    /// or [`ConfshelfError::Config`] if it does not parse, names an unknown
    /// `config_version`, or sets a relative `repository_path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfshelfError::io(
                    format!("failed to read \"{}\"", path.display()),
                    e,
                ));
            }
        };
        let config: Self =
            toml::from_str(&content).map_err(|e| ConfshelfError::config(path, e.message()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.config_version != CONFIG_VERSION {
            return Err(ConfshelfError::config(
                path,
                format!(
                    "unsupported config_version \"{}\" (expected \"{CONFIG_VERSION}\")",
                    self.config_version
                ),
            ));
        }
        if !self.repository_path.is_empty() && !Path::new(&self.repository_path).is_absolute() {
            return Err(ConfshelfError::config(
                path,
                format!(
                    "repository_path \"{}\" must be absolute",
                    self.repository_path
                ),
            ));
        }
        Ok(())
    }

    /// The configured repository root, if one is set.
    #[must_use]
    pub fn repository_override(&self) -> Option<PathBuf> {
        (!self.repository_path.is_empty()).then(|| PathBuf::from(&self.repository_path))
    }
}

/// Write [`DEFAULT_CONFIG`] to `path` unless something already exists there.
///
/// Returns `true` if the file was created.
///
/// # Errors
///
/// Returns [`ConfshelfError::Config`] if a non-file entry occupies `path`,
/// or [`ConfshelfError::Io`] if the file cannot be written.
pub fn ensure_default(path: &Path) -> Result<bool> {
    match path.symlink_metadata() {
        Ok(meta) if meta.is_file() || meta.is_symlink() => return Ok(false),
        Ok(_) => return Err(ConfshelfError::config(path, "not a regular file")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(ConfshelfError::io(
                format!("failed to retrieve status of \"{}\"", path.display()),
                e,
            ));
        }
    }
    std::fs::write(path, DEFAULT_CONFIG).map_err(|e| {
        ConfshelfError::io(format!("failed to write \"{}\"", path.display()), e)
    })?;
    Ok(true)
}
