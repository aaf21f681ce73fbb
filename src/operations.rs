//! Filesystem guard and mutation primitives.
//!
//! The [`FileSystemOps`] trait is the seam between the link engine and the
//! real filesystem, so that partial-failure paths can be unit-tested without
//! provoking real OS errors.  Production code uses [`SystemFileSystemOps`];
//! tests use `MockFileSystemOps`.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ConfshelfError, Result};

/// Abstraction over the filesystem calls used by the link engine.
pub trait FileSystemOps {
    /// Returns `true` if any entry exists at `path`, including a dangling
    /// symlink.  Never fails: a status error reads as "does not exist".
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a regular file.
    ///
    /// Symlinks are not followed, so a link to a file reports `false`, as do
    /// directories and special files.  A missing entry also reports `false`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfshelfError::Io`] if the entry's status cannot be
    /// retrieved for a reason other than non-existence.
    fn is_regular_file(&self, path: &Path) -> Result<bool>;

    /// Move `from` to `to` (a single `rename(2)`; no copy fallback).
    ///
    /// # Errors
    ///
    /// Returns the OS error if the rename fails.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Create a symbolic link at `link` pointing to `target`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the link cannot be created, including when
    /// `link` already exists.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Read the target of the symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }

    fn is_regular_file(&self, path: &Path) -> Result<bool> {
        match path.symlink_metadata() {
            Ok(meta) => Ok(meta.file_type().is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ConfshelfError::io(
                format!("failed to retrieve status of \"{}\"", path.display()),
                e,
            )),
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link)
        }

        #[cfg(windows)]
        {
            if target.is_dir() {
                std::os::windows::fs::symlink_dir(target, link)
            } else {
                std::os::windows::fs::symlink_file(target, link)
            }
        }
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// Pre-configure existing paths and regular files, and optionally make a
/// mutation fail, then hand `&mock` to the link engine.  Successful
/// mutations are recorded so tests can assert on what was (not) attempted.
///
/// ```ignore
/// let fs = MockFileSystemOps::new()
///     .with_file("/home/u/.vimrc")
///     .failing_symlink(io::ErrorKind::PermissionDenied);
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    existing: std::cell::RefCell<Vec<PathBuf>>,
    files: std::cell::RefCell<Vec<PathBuf>>,
    symlinks: std::cell::RefCell<Vec<(PathBuf, PathBuf)>>,
    status_error: Option<io::ErrorKind>,
    rename_error: Option<io::ErrorKind>,
    symlink_error: Option<io::ErrorKind>,
    calls: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as existing without making it a regular file.
    #[must_use]
    pub fn with_existing(self, path: impl Into<PathBuf>) -> Self {
        self.existing.borrow_mut().push(path.into());
        self
    }

    /// Mark `path` as a regular file (also marks it as existing).
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
        let p = path.into();
        self.existing.borrow_mut().push(p.clone());
        self.files.borrow_mut().push(p);
        self
    }

    /// Make every [`FileSystemOps::is_regular_file`] call fail with `kind`.
    #[must_use]
    pub const fn failing_status(mut self, kind: io::ErrorKind) -> Self {
        self.status_error = Some(kind);
        self
    }

    /// Make every [`FileSystemOps::rename`] call fail with `kind`.
    #[must_use]
    pub const fn failing_rename(mut self, kind: io::ErrorKind) -> Self {
        self.rename_error = Some(kind);
        self
    }

    /// Make every [`FileSystemOps::symlink`] call fail with `kind`.
    #[must_use]
    pub const fn failing_symlink(mut self, kind: io::ErrorKind) -> Self {
        self.symlink_error = Some(kind);
        self
    }

    /// Names of the mutation calls attempted so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: &str) {
        self.calls.borrow_mut().push(call.to_string());
    }
}

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        self.existing.borrow().iter().any(|p| p == path)
    }

    fn is_regular_file(&self, path: &Path) -> Result<bool> {
        if let Some(kind) = self.status_error {
            return Err(ConfshelfError::io(
                format!("failed to retrieve status of \"{}\"", path.display()),
                io::Error::from(kind),
            ));
        }
        Ok(self.files.borrow().iter().any(|p| p == path))
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.record("rename");
        if let Some(kind) = self.rename_error {
            return Err(io::Error::from(kind));
        }
        self.existing.borrow_mut().retain(|p| p != from);
        self.existing.borrow_mut().push(to.to_path_buf());
        let mut files = self.files.borrow_mut();
        if files.iter().any(|p| p == from) {
            files.retain(|p| p != from);
            files.push(to.to_path_buf());
        }
        Ok(())
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        self.record("symlink");
        if let Some(kind) = self.symlink_error {
            return Err(io::Error::from(kind));
        }
        if self.exists(link) {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        self.existing.borrow_mut().push(link.to_path_buf());
        self.symlinks
            .borrow_mut()
            .push((link.to_path_buf(), target.to_path_buf()));
        Ok(())
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        self.symlinks
            .borrow()
            .iter()
            .find(|(link, _)| link == path)
            .map(|(_, target)| target.clone())
            .ok_or_else(|| io::Error::from(io::ErrorKind::InvalidInput))
    }
}
