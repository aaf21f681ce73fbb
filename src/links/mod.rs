//! Link operation engine.
//!
//! Two mutating workflows share this engine:
//!
//! - [`LinkEngine::manage`] moves an external file into the repository and
//!   leaves a symbolic link in its place;
//! - [`LinkEngine::link_existing`] creates a new symbolic link elsewhere that
//!   points at a file already in the repository.
//!
//! Each is a short linear pipeline: every precondition is checked before the
//! first mutation, then the mutations run in order with no rollback and no
//! retry.  A failure after the first mutation is reported as
//! [`ConfshelfError::Incomplete`] carrying the last completed [`Stage`].
//!
//! [`LinkEngine::audit`] is the read-only counterpart used by `list`, and
//! [`LinkEngine::restore`] recreates recorded links that have gone missing.
mod audit;
mod link_existing;
mod manage;
mod restore;
mod stage;

pub use audit::LinkState;
pub use restore::RestoreOutcome;
pub use stage::Stage;

use std::fmt;
use std::path::Path;

use crate::error::{ConfshelfError, Result};
use crate::logging::Log;
use crate::manifest::{ManagedLink, ManifestStore};
use crate::operations::FileSystemOps;
use crate::paths::AppPaths;

/// Runs link operations against one application directory.
pub struct LinkEngine<'a> {
    paths: &'a AppPaths,
    fs: &'a dyn FileSystemOps,
    manifest: ManifestStore,
    log: &'a dyn Log,
}

impl fmt::Debug for LinkEngine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkEngine")
            .field("paths", self.paths)
            .field("manifest", &self.manifest)
            .finish_non_exhaustive()
    }
}

impl<'a> LinkEngine<'a> {
    /// Create an engine recording into the manifest at `paths.manifest_path()`.
    #[must_use]
    pub fn new(paths: &'a AppPaths, fs: &'a dyn FileSystemOps, log: &'a dyn Log) -> Self {
        Self {
            paths,
            fs,
            manifest: ManifestStore::new(paths.manifest_path()),
            log,
        }
    }

    /// The manifest this engine appends to.
    #[must_use]
    pub const fn manifest(&self) -> &ManifestStore {
        &self.manifest
    }

    /// Fail unless `path` can be written to the manifest.
    fn require_utf8(path: &Path) -> Result<()> {
        if path.to_str().is_some() {
            Ok(())
        } else {
            Err(ConfshelfError::NonUtf8Path {
                path: path.to_path_buf(),
            })
        }
    }

    /// Fail unless `path` exists and is a regular file.
    fn require_regular_file(&self, path: &Path) -> Result<()> {
        if !self.fs.exists(path) {
            return Err(ConfshelfError::NotFound {
                path: path.to_path_buf(),
            });
        }
        if !self.fs.is_regular_file(path)? {
            return Err(ConfshelfError::NotRegularFile {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Fail if anything, including a dangling symlink, exists at `path`.
    fn require_absent(&self, path: &Path) -> Result<()> {
        if self.fs.exists(path) {
            return Err(ConfshelfError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Create the symlink at `link`.  A failure here leaves the filesystem
    /// as it was before the call.
    fn create_link(&self, target: &Path, link: &Path) -> Result<()> {
        self.fs.symlink(target, link).map_err(|e| {
            ConfshelfError::io(
                format!(
                    "failed to create symlink (link: \"{}\", dst: \"{}\")",
                    link.display(),
                    target.display()
                ),
                e,
            )
        })
    }

    /// Append `entry` as the final step.  The link is already in place, so a
    /// failure is reported as incomplete at [`Stage::Linked`].
    fn record(&self, entry: &ManagedLink) -> Result<()> {
        self.manifest.append(entry).map_err(|e| {
            let line = entry.to_line().unwrap_or_default();
            ConfshelfError::Incomplete {
                stage: Stage::Linked,
                recovery: format!(
                    "the link is in place but unrecorded; append {} to \"{}\" by hand",
                    line.trim_end(),
                    self.manifest.path().display()
                ),
                source: Box::new(e),
            }
        })?;
        self.log.debug(&format!(
            "recorded {} in {}",
            entry.link_path.display(),
            self.manifest.path().display()
        ));
        Ok(())
    }
}
