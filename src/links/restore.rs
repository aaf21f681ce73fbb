//! Restore: recreate recorded links that have gone missing.
use std::fmt;

use super::{LinkEngine, LinkState, Stage};
use crate::error::Result;
use crate::manifest::ManagedLink;

/// What [`LinkEngine::restore`] did with one recorded link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The link was missing and has been recreated.
    Restored,
    /// The link was already in place.
    AlreadyCorrect,
    /// The entry was left alone; something else occupies the link path or
    /// the repository member is unusable.
    Skipped(LinkState),
}

impl RestoreOutcome {
    /// Whether the entry still needs the operator's attention.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

impl fmt::Display for RestoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Restored => f.write_str("restored"),
            Self::AlreadyCorrect => f.write_str("ok"),
            Self::Skipped(state) => write!(f, "skipped, {state}"),
        }
    }
}

impl LinkEngine<'_> {
    /// Recreate the link of every recorded entry whose link path is empty.
    ///
    /// Works from the latest entry per link path.  Only [`LinkState::Missing`]
    /// entries are touched; anything found at a link path is never replaced,
    /// and entries whose repository member is gone are reported as skipped.
    /// The manifest is not written, since every restored pair is already
    /// recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read, or
    /// [`ConfshelfError::Io`](crate::error::ConfshelfError::Io) if a link
    /// cannot be created.  Links restored before the failure stay in place;
    /// running restore again picks up where it stopped.
    pub fn restore(&self) -> Result<Vec<(ManagedLink, RestoreOutcome)>> {
        let mut outcomes = Vec::new();
        for (entry, state) in self.audit_all()? {
            let outcome = match state {
                LinkState::Correct => RestoreOutcome::AlreadyCorrect,
                LinkState::Missing => {
                    let member = self
                        .paths
                        .path_relative_to_repository(&entry.repo_relative_name)?;
                    self.create_link(&member, &entry.link_path)?;
                    self.log.debug(&format!(
                        "{}: {} -> {}",
                        Stage::Linked,
                        entry.link_path.display(),
                        member.display()
                    ));
                    RestoreOutcome::Restored
                }
                other => RestoreOutcome::Skipped(other),
            };
            outcomes.push((entry, outcome));
        }
        Ok(outcomes)
    }
}
