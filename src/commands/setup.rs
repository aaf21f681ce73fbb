//! Command: create the application directory and initialise the repository.
use std::path::Path;

use anyhow::{Context as _, Result};
use git2::{ErrorCode, Repository, RepositoryInitOptions};

use super::CommandSetup;
use crate::logging::Log;

/// Run the setup command.
///
/// # Errors
///
/// Returns an error if bootstrap fails or the repository cannot be
/// initialised.
pub fn run(log: &dyn Log) -> Result<()> {
    log.stage("Setting up confshelf");
    let setup = CommandSetup::init(log)?;
    execute(&setup, log)?;
    Ok(())
}

/// Initialise the repository root of an already bootstrapped setup.
///
/// Returns `false` if it was already a git repository, which is reported as
/// a warning rather than an error.
///
/// # Errors
///
/// Returns an error if git initialisation fails for any other reason.
pub fn execute(setup: &CommandSetup, log: &dyn Log) -> Result<bool> {
    let root = setup.paths.repository_root();
    let created = init_repository(root)?;
    if created {
        log.info(&format!("initialised git repository in {}", root.display()));
    } else {
        log.warn(&format!("already set up: {}", root.display()));
    }
    Ok(created)
}

/// `git init` without re-initialising an existing repository.
fn init_repository(root: &Path) -> Result<bool> {
    let mut opts = RepositoryInitOptions::new();
    opts.no_reinit(true).mkdir(false);
    match Repository::init_opts(root, &opts) {
        Ok(_) => Ok(true),
        Err(e) if e.code() == ErrorCode::Exists => Ok(false),
        Err(e) => Err(e)
            .with_context(|| format!("failed to initialise git repository in {}", root.display())),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::TestLog;
    use crate::paths::AppPaths;

    #[test]
    fn setup_initialises_repository_once() {
        let home = tempfile::tempdir().unwrap();
        let log = TestLog::default();
        let setup = CommandSetup::for_paths(AppPaths::from_home(home.path()), &log).unwrap();

        assert!(execute(&setup, &log).unwrap());
        assert!(setup.paths.repository_root().join(".git").is_dir());
        assert!(log.at("warn").is_empty());

        assert!(!execute(&setup, &log).unwrap());
        let warnings = log.at("warn");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("already set up"), "{warnings:?}");
    }

    #[test]
    fn setup_keeps_existing_files() {
        let home = tempfile::tempdir().unwrap();
        let log = TestLog::default();
        let setup = CommandSetup::for_paths(AppPaths::from_home(home.path()), &log).unwrap();
        let member = setup.paths.repository_root().join("vimrc");
        std::fs::write(&member, "x").unwrap();

        execute(&setup, &log).unwrap();

        assert_eq!(std::fs::read_to_string(&member).unwrap(), "x");
    }
}
