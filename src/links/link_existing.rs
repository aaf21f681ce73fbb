//! LinkExisting: point a new symbolic link at a repository member.
use std::path::Path;

use super::{LinkEngine, Stage};
use crate::error::Result;
use crate::manifest::ManagedLink;

impl LinkEngine<'_> {
    /// Create a symbolic link at `link` pointing at the repository member
    /// `name`, and record the pair.
    ///
    /// # Errors
    ///
    /// - [`ConfshelfError::InvalidName`] / [`ConfshelfError::NonUtf8Path`] for
    ///   unusable arguments;
    /// - [`ConfshelfError::NotFound`] if the member does not exist;
    /// - [`ConfshelfError::NotRegularFile`] if the member is not a regular file;
    /// - [`ConfshelfError::AlreadyExists`] if anything exists at `link`;
    /// - [`ConfshelfError::Io`] if the link cannot be created (nothing changed);
    /// - [`ConfshelfError::Incomplete`] at [`Stage::Linked`] if the manifest
    ///   cannot be written.
    ///
    /// [`ConfshelfError::InvalidName`]: crate::error::ConfshelfError::InvalidName
    /// [`ConfshelfError::NonUtf8Path`]: crate::error::ConfshelfError::NonUtf8Path
    /// [`ConfshelfError::NotFound`]: crate::error::ConfshelfError::NotFound
    /// [`ConfshelfError::NotRegularFile`]: crate::error::ConfshelfError::NotRegularFile
    /// [`ConfshelfError::AlreadyExists`]: crate::error::ConfshelfError::AlreadyExists
    /// [`ConfshelfError::Io`]: crate::error::ConfshelfError::Io
    /// [`ConfshelfError::Incomplete`]: crate::error::ConfshelfError::Incomplete
    pub fn link_existing(&self, name: &str, link: &Path) -> Result<ManagedLink> {
        let member = self.paths.path_relative_to_repository(name)?;
        Self::require_utf8(link)?;
        self.require_regular_file(&member)?;
        self.require_absent(link)?;
        self.log.debug(&format!(
            "{}: {} -> {}",
            Stage::Validated,
            link.display(),
            member.display()
        ));

        self.create_link(&member, link)?;
        self.log.debug(&format!("{}: {}", Stage::Linked, link.display()));

        let entry = ManagedLink::new(link, name);
        self.record(&entry)?;
        self.log
            .debug(&format!("{}: {}", Stage::Recorded, link.display()));
        Ok(entry)
    }
}
