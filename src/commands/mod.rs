//! Top-level subcommand orchestration.
//!
//! Every command that touches the application directory starts from a
//! [`CommandSetup`], which resolves paths, creates the directories, seeds
//! and loads the configuration, and applies the repository override.
pub mod link;
pub mod list;
pub mod manage;
pub mod restore;
pub mod setup;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::bootstrap;
use crate::config::{self, Config};
use crate::logging::Log;
use crate::paths::AppPaths;

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Resolved locations, with any configured repository override applied.
    pub paths: AppPaths,
    /// The loaded configuration.
    pub config: Config,
}

impl CommandSetup {
    /// Resolve paths from `HOME` and run [`CommandSetup::for_paths`].
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory is unknown, or if
    /// [`CommandSetup::for_paths`] fails.
    pub fn init(log: &dyn Log) -> Result<Self> {
        let paths = AppPaths::from_env()?;
        Self::for_paths(paths, log)
    }

    /// Bootstrap the application directory under `paths`, seed and load the
    /// configuration, and make sure the effective repository root exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created or the
    /// configuration cannot be written, read or validated.
    pub fn for_paths(paths: AppPaths, log: &dyn Log) -> Result<Self> {
        bootstrap::ensure_directories(&paths, log)?;

        let config_path = paths.config_path();
        if config::ensure_default(&config_path)? {
            log.debug(&format!("wrote default {}", config_path.display()));
        }
        let config = Config::load(&config_path)?;

        let paths = match config.repository_override() {
            Some(root) => {
                log.debug(&format!("repository root: {}", root.display()));
                let paths = paths.with_repository_root(root);
                bootstrap::ensure_directories(&paths, log)?;
                paths
            }
            None => paths,
        };

        Ok(Self { paths, config })
    }
}

/// Make a command-line path absolute against the current directory without
/// resolving symlinks, so the recorded path is the one the user named.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("failed to resolve \"{}\"", path.display()))
}
