//! Command: move a file into the repository and link it back.
use std::path::Path;

use anyhow::Result;

use super::{CommandSetup, absolute};
use crate::links::LinkEngine;
use crate::logging::Log;
use crate::manifest::ManagedLink;
use crate::operations::SystemFileSystemOps;

/// Run the manage command.
///
/// # Errors
///
/// Returns an error if setup fails or the file cannot be managed.
pub fn run(source: &Path, name: &str, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(log)?;
    execute(&setup, source, name, log)?;
    Ok(())
}

/// Manage `source` as `name` using an already initialised setup.
///
/// # Errors
///
/// Returns an error if `source` cannot be made absolute or any step of the
/// operation fails; see [`LinkEngine::manage`].
pub fn execute(
    setup: &CommandSetup,
    source: &Path,
    name: &str,
    log: &dyn Log,
) -> Result<ManagedLink> {
    let source = absolute(source)?;
    log.stage(&format!("Managing {}", source.display()));
    let engine = LinkEngine::new(&setup.paths, &SystemFileSystemOps, log);
    let entry = engine.manage(&source, name)?;
    log.info(&format!(
        "{} -> {}",
        entry.link_path.display(),
        setup.paths.repository_root().join(name).display()
    ));
    Ok(entry)
}
