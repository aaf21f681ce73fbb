//! Canonical locations under the application directory.
//!
//! All locations derive from a single home directory value:
//!
//! ```text
//! <home>/.confshelf/
//!   config.toml
//!   known_links.toml
//!   repo/            <- repository root (unless overridden in config.toml)
//! ```
//!
//! An [`AppPaths`] value is built once per invocation and passed down
//! explicitly; nothing below the command layer reads the environment.
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::error::{ConfshelfError, Result};

/// Name of the private application directory inside the home directory.
pub const APP_DIR_NAME: &str = ".confshelf";
/// Default repository directory, relative to the application directory.
pub const REPOSITORY_DIR: &str = "repo";
/// Manifest file, relative to the application directory.
pub const MANIFEST_FILE: &str = "known_links.toml";
/// Configuration file, relative to the application directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Resolved locations for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    app_dir: PathBuf,
    repository_root: PathBuf,
}

impl AppPaths {
    /// Build the layout for a known home directory.
    #[must_use]
    pub fn from_home(home: impl Into<PathBuf>) -> Self {
        let app_dir = home.into().join(APP_DIR_NAME);
        let repository_root = app_dir.join(REPOSITORY_DIR);
        Self {
            app_dir,
            repository_root,
        }
    }

    /// Build the layout from the process environment (`HOME`, then `USERPROFILE`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfshelfError::HomeNotSet`] if neither variable holds a
    /// non-empty value, or [`ConfshelfError::HomeNotAbsolute`] if it is relative.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Build the layout using `lookup` to read environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfshelfError::HomeNotSet`] if neither `HOME` nor
    /// `USERPROFILE` yields a non-empty value, and
    /// [`ConfshelfError::HomeNotAbsolute`] if the value found is a relative
    /// path.  Links point at absolute repository paths, so every location
    /// must be absolute.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Result<Self> {
        let home = ["HOME", "USERPROFILE"]
            .into_iter()
            .filter_map(lookup)
            .find(|value| !value.is_empty())
            .map(PathBuf::from)
            .ok_or(ConfshelfError::HomeNotSet)?;
        if !home.is_absolute() {
            return Err(ConfshelfError::HomeNotAbsolute { path: home });
        }
        Ok(Self::from_home(home))
    }

    /// Replace the repository root (from the `repository_path` config setting).
    #[must_use]
    pub fn with_repository_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.repository_root = root.into();
        self
    }

    /// Location of `suffix` inside the application directory.
    #[must_use]
    pub fn resolve(&self, suffix: impl AsRef<Path>) -> PathBuf {
        self.app_dir.join(suffix)
    }

    /// The application directory itself.
    #[must_use]
    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// Directory holding the canonical copies of managed files.
    #[must_use]
    pub fn repository_root(&self) -> &Path {
        &self.repository_root
    }

    /// The append-only link manifest.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.resolve(MANIFEST_FILE)
    }

    /// The configuration file.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.resolve(CONFIG_FILE)
    }

    /// Location of the repository member called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfshelfError::InvalidName`] if `name` is empty, absolute,
    /// or contains `..`, since such a name would not stay inside the
    /// repository.
    pub fn path_relative_to_repository(&self, name: &str) -> Result<PathBuf> {
        validate_member_name(name)?;
        Ok(self.repository_root.join(name))
    }
}

/// Check that `name` is a relative path made only of normal components.
fn validate_member_name(name: &str) -> Result<()> {
    let invalid = |reason| ConfshelfError::InvalidName {
        name: name.to_string(),
        reason,
    };
    let mut has_normal = false;
    for component in Path::new(name).components() {
        match component {
            Component::Normal(_) => has_normal = true,
            Component::CurDir => {}
            Component::ParentDir => return Err(invalid("must not contain '..'")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("must be relative to the repository"));
            }
        }
    }
    if has_normal {
        Ok(())
    } else {
        Err(invalid("must name a file"))
    }
}
