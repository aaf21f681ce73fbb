//! Command: link a new location to a file already in the repository.
use std::path::Path;

use anyhow::Result;

use super::{CommandSetup, absolute};
use crate::links::LinkEngine;
use crate::logging::Log;
use crate::manifest::ManagedLink;
use crate::operations::SystemFileSystemOps;

/// Run the link command.
///
/// # Errors
///
/// Returns an error if setup fails or the link cannot be created.
pub fn run(name: &str, link: &Path, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(log)?;
    execute(&setup, name, link, log)?;
    Ok(())
}

/// Link `link` to the repository member `name` using an already
/// initialised setup.
///
/// # Errors
///
/// Returns an error if `link` cannot be made absolute or any step of the
/// operation fails; see [`LinkEngine::link_existing`].
pub fn execute(
    setup: &CommandSetup,
    name: &str,
    link: &Path,
    log: &dyn Log,
) -> Result<ManagedLink> {
    let link = absolute(link)?;
    log.stage(&format!("Linking {}", link.display()));
    let engine = LinkEngine::new(&setup.paths, &SystemFileSystemOps, log);
    let entry = engine.link_existing(name, &link)?;
    log.info(&format!(
        "{} -> {}",
        entry.link_path.display(),
        setup.paths.repository_root().join(name).display()
    ));
    Ok(entry)
}
