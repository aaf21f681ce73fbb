//! Manage: move a file into the repository and link it back.
use std::path::Path;

use super::{LinkEngine, Stage};
use crate::error::{ConfshelfError, Result};
use crate::manifest::ManagedLink;

impl LinkEngine<'_> {
    /// Move `source` into the repository as `name`, replace it with a
    /// symbolic link to the repository copy, and record the pair.
    ///
    /// Preconditions, checked in order before anything is touched: `name` is
    /// a valid repository name and `source` is UTF-8, `source` exists,
    /// `source` is a regular file (not a symlink), and the repository member
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// - [`ConfshelfError::InvalidName`] / [`ConfshelfError::NonUtf8Path`] for
    ///   unusable arguments;
    /// - [`ConfshelfError::NotFound`] if `source` does not exist;
    /// - [`ConfshelfError::NotRegularFile`] if `source` is not a regular file;
    /// - [`ConfshelfError::AlreadyExists`] if the repository member exists;
    /// - [`ConfshelfError::Io`] if the move fails (nothing changed);
    /// - [`ConfshelfError::Incomplete`] at [`Stage::Moved`] if the symlink
    ///   cannot be created, or at [`Stage::Linked`] if the manifest cannot be
    ///   written.  Neither state is rolled back.
    pub fn manage(&self, source: &Path, name: &str) -> Result<ManagedLink> {
        let member = self.paths.path_relative_to_repository(name)?;
        Self::require_utf8(source)?;
        self.require_regular_file(source)?;
        self.require_absent(&member)?;
        let mut stage = Stage::Validated;
        self.log.debug(&format!(
            "{stage}: {} -> {}",
            source.display(),
            member.display()
        ));

        self.fs.rename(source, &member).map_err(|e| {
            ConfshelfError::io(
                format!(
                    "failed to move \"{}\" to \"{}\"",
                    source.display(),
                    member.display()
                ),
                e,
            )
        })?;
        stage = Stage::Moved;
        self.log.debug(&format!("{stage}: {}", member.display()));

        self.create_link(&member, source)
            .map_err(|e| ConfshelfError::Incomplete {
                stage,
                recovery: format!(
                    "the file now lives only at \"{}\"; move it back to \"{}\" or create the link by hand",
                    member.display(),
                    source.display()
                ),
                source: Box::new(e),
            })?;
        stage = Stage::Linked;
        self.log.debug(&format!("{stage}: {}", source.display()));

        let entry = ManagedLink::new(source, name);
        self.record(&entry)?;
        stage = Stage::Recorded;
        self.log.debug(&format!("{stage}: {}", source.display()));
        Ok(entry)
    }
}
