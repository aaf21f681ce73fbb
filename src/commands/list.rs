//! Command: show every recorded link and whether it is still intact.
use anyhow::Result;

use super::CommandSetup;
use crate::links::{LinkEngine, LinkState};
use crate::logging::Log;
use crate::manifest::ManagedLink;
use crate::operations::SystemFileSystemOps;

/// Run the list command.
///
/// # Errors
///
/// Returns an error if setup fails or the manifest cannot be read.
pub fn run(log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(log)?;
    execute(&setup, log)?;
    Ok(())
}

/// Audit and report every recorded link.  Broken links are reported as
/// warnings but do not fail the command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed.
pub fn execute(setup: &CommandSetup, log: &dyn Log) -> Result<Vec<(ManagedLink, LinkState)>> {
    log.stage("Managed links");
    let engine = LinkEngine::new(&setup.paths, &SystemFileSystemOps, log);
    let audited = engine.audit_all()?;
    if audited.is_empty() {
        log.info("no managed links");
        return Ok(audited);
    }

    for (entry, state) in &audited {
        let line = format!(
            "{} -> {} [{state}]",
            entry.link_path.display(),
            entry.repo_relative_name
        );
        if state.is_correct() {
            log.info(&line);
        } else {
            log.warn(&line);
        }
    }

    let broken = audited.iter().filter(|(_, s)| !s.is_correct()).count();
    if broken > 0 {
        log.warn(&format!("{broken} of {} link(s) need attention", audited.len()));
    }
    Ok(audited)
}
