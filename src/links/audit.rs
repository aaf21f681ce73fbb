//! Read-only classification of manifest entries against the filesystem.
use std::fmt;
use std::path::{Path, PathBuf};

use super::LinkEngine;
use crate::error::Result;
use crate::manifest::ManagedLink;

/// State of one recorded link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// The link resolves to its repository member, which is a regular file.
    Correct,
    /// Nothing exists at the link path.
    Missing,
    /// Something other than the expected link lives at the link path.
    Incorrect {
        /// What was found instead.
        current: String,
    },
    /// The repository member cannot be linked to.
    Invalid {
        /// Why the entry cannot be satisfied.
        reason: String,
    },
}

impl LinkState {
    /// Whether the entry is in its expected state.
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correct => f.write_str("ok"),
            Self::Missing => f.write_str("missing"),
            Self::Incorrect { current } => write!(f, "incorrect ({current})"),
            Self::Invalid { reason } => write!(f, "invalid ({reason})"),
        }
    }
}

impl LinkEngine<'_> {
    /// Classify one manifest entry.  Never touches the filesystem beyond
    /// reading status and link targets.
    #[must_use]
    pub fn audit(&self, entry: &ManagedLink) -> LinkState {
        let member = match self
            .paths
            .path_relative_to_repository(&entry.repo_relative_name)
        {
            Ok(member) => member,
            Err(e) => return LinkState::Invalid { reason: e.to_string() },
        };

        match self.fs.is_regular_file(&member) {
            Ok(true) => {}
            Ok(false) if self.fs.exists(&member) => {
                return LinkState::Invalid {
                    reason: format!("{} is not a regular file", member.display()),
                };
            }
            Ok(false) => {
                return LinkState::Invalid {
                    reason: format!("{} does not exist", member.display()),
                };
            }
            Err(e) => return LinkState::Invalid { reason: e.to_string() },
        }

        let link = &entry.link_path;
        self.fs.read_link(link).map_or_else(
            |_| {
                if self.fs.exists(link) {
                    LinkState::Incorrect {
                        current: "not a symbolic link".to_string(),
                    }
                } else {
                    LinkState::Missing
                }
            },
            |target| {
                let resolved = resolve_target(link, &target);
                if points_to(&resolved, &member) {
                    LinkState::Correct
                } else {
                    LinkState::Incorrect {
                        current: format!("points to {}", target.display()),
                    }
                }
            },
        )
    }

    /// Audit the latest entry for every recorded link path, ordered by path.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed.
    pub fn audit_all(&self) -> Result<Vec<(ManagedLink, LinkState)>> {
        Ok(self
            .manifest
            .latest()?
            .into_iter()
            .map(|(link_path, name)| {
                let entry = ManagedLink::new(link_path, name);
                let state = self.audit(&entry);
                (entry, state)
            })
            .collect())
    }
}

/// Relative link targets are relative to the directory holding the link.
fn resolve_target(link: &Path, target: &Path) -> PathBuf {
    if target.is_absolute() {
        target.to_path_buf()
    } else {
        link.parent()
            .map_or_else(|| target.to_path_buf(), |dir| dir.join(target))
    }
}

/// Compare a link target with the expected member, falling back to
/// canonical forms so that `..` segments and symlinked parents still match.
fn points_to(target: &Path, member: &Path) -> bool {
    if target == member {
        return true;
    }
    match (dunce::canonicalize(target), dunce::canonicalize(member)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::links::test_helpers::TempHome;
    use crate::operations::SystemFileSystemOps;

    #[test]
    fn managed_file_is_correct() {
        let home = TempHome::new();
        let source = home.file(".vimrc", "x");
        let engine = LinkEngine::new(&home.paths, &SystemFileSystemOps, home.log());
        let entry = engine.manage(&source, "vimrc").unwrap();

        assert_eq!(engine.audit(&entry), LinkState::Correct);
    }

    #[test]
    fn removed_link_is_missing() {
        let home = TempHome::new();
        let source = home.file(".vimrc", "x");
        let engine = LinkEngine::new(&home.paths, &SystemFileSystemOps, home.log());
        let entry = engine.manage(&source, "vimrc").unwrap();
        std::fs::remove_file(&source).unwrap();

        assert_eq!(engine.audit(&entry), LinkState::Missing);
    }

    #[test]
    fn retargeted_link_is_incorrect() {
        let home = TempHome::new();
        let source = home.file(".vimrc", "x");
        let other = home.file("other", "y");
        let engine = LinkEngine::new(&home.paths, &SystemFileSystemOps, home.log());
        let entry = engine.manage(&source, "vimrc").unwrap();
        std::fs::remove_file(&source).unwrap();
        std::os::unix::fs::symlink(&other, &source).unwrap();

        let state = engine.audit(&entry);
        assert!(
            matches!(&state, LinkState::Incorrect { current } if current.contains("other")),
            "{state:?}"
        );
    }

    #[test]
    fn replaced_by_regular_file_is_incorrect() {
        let home = TempHome::new();
        let source = home.file(".vimrc", "x");
        let engine = LinkEngine::new(&home.paths, &SystemFileSystemOps, home.log());
        let entry = engine.manage(&source, "vimrc").unwrap();
        std::fs::remove_file(&source).unwrap();
        std::fs::write(&source, "local").unwrap();

        assert_eq!(
            engine.audit(&entry),
            LinkState::Incorrect {
                current: "not a symbolic link".to_string()
            }
        );
    }

    #[test]
    fn orphaned_entry_is_invalid() {
        let home = TempHome::new();
        let source = home.file(".vimrc", "x");
        let engine = LinkEngine::new(&home.paths, &SystemFileSystemOps, home.log());
        let entry = engine.manage(&source, "vimrc").unwrap();
        std::fs::remove_file(home.paths.repository_root().join("vimrc")).unwrap();

        assert!(matches!(engine.audit(&entry), LinkState::Invalid { .. }));
    }

    #[test]
    fn relative_link_target_is_resolved_against_link_dir() {
        let home = TempHome::new();
        let member = home.paths.repository_root().join("bashrc");
        std::fs::write(&member, "x").unwrap();
        let link = home.dir.path().join(".bashrc");
        std::os::unix::fs::symlink(".confshelf/repo/bashrc", &link).unwrap();
        let engine = LinkEngine::new(&home.paths, &SystemFileSystemOps, home.log());

        let state = engine.audit(&ManagedLink::new(&link, "bashrc"));
        assert_eq!(state, LinkState::Correct);
    }

    #[test]
    fn audit_all_uses_latest_entry_per_link() {
        let home = TempHome::new();
        let engine = LinkEngine::new(&home.paths, &SystemFileSystemOps, home.log());
        let source = home.file(".vimrc", "x");
        engine
            .manifest()
            .append(&ManagedLink::new(&source, "stale"))
            .unwrap();
        engine.manage(&home.file(".zshrc", "z"), "zshrc").unwrap();
        let entry = ManagedLink::new(&source, "vimrc");
        std::fs::remove_file(&source).unwrap();
        std::fs::write(home.paths.repository_root().join("vimrc"), "x").unwrap();
        engine.link_existing("vimrc", &source).unwrap();

        let audited = engine.audit_all().unwrap();

        assert_eq!(audited.len(), 2);
        assert!(audited.contains(&(entry, LinkState::Correct)));
        assert!(audited.iter().all(|(_, state)| state.is_correct()));
    }

    #[test]
    fn audit_does_not_modify_anything() {
        let home = TempHome::new();
        let engine = LinkEngine::new(&home.paths, &SystemFileSystemOps, home.log());
        let entry = ManagedLink::new(home.dir.path().join(".gone"), "gone");

        assert!(matches!(engine.audit(&entry), LinkState::Invalid { .. }));
        assert!(!engine.manifest().path().exists());
    }

    #[test]
    fn display_is_short() {
        assert_eq!(LinkState::Correct.to_string(), "ok");
        assert_eq!(
            LinkState::Incorrect {
                current: "points to /x".to_string()
            }
            .to_string(),
            "incorrect (points to /x)"
        );
    }
}
