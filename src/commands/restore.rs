//! Command: recreate recorded links that have gone missing.
use anyhow::Result;

use super::CommandSetup;
use crate::links::{LinkEngine, RestoreOutcome};
use crate::logging::Log;
use crate::manifest::ManagedLink;
use crate::operations::SystemFileSystemOps;

/// Run the restore command.
///
/// # Errors
///
/// Returns an error if setup fails, the manifest cannot be read, or a link
/// cannot be created.
pub fn run(log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(log)?;
    execute(&setup, log)?;
    Ok(())
}

/// Restore every missing link and report the rest.  Entries that cannot be
/// restored without replacing something are warnings, not failures.
///
/// # Errors
///
/// See [`LinkEngine::restore`].
pub fn execute(
    setup: &CommandSetup,
    log: &dyn Log,
) -> Result<Vec<(ManagedLink, RestoreOutcome)>> {
    log.stage("Restoring links");
    let engine = LinkEngine::new(&setup.paths, &SystemFileSystemOps, log);
    let outcomes = engine.restore()?;
    if outcomes.is_empty() {
        log.info("no managed links");
        return Ok(outcomes);
    }

    let mut restored = 0usize;
    let mut already_ok = 0usize;
    let mut skipped = 0usize;
    for (entry, outcome) in &outcomes {
        let line = format!(
            "{} -> {} [{outcome}]",
            entry.link_path.display(),
            entry.repo_relative_name
        );
        match outcome {
            RestoreOutcome::Restored => {
                restored += 1;
                log.info(&line);
            }
            RestoreOutcome::AlreadyCorrect => {
                already_ok += 1;
                log.debug(&line);
            }
            RestoreOutcome::Skipped(_) => {
                skipped += 1;
                log.warn(&line);
            }
        }
    }

    log.info(&format!("{restored} restored, {already_ok} already ok, {skipped} skipped"));
    Ok(outcomes)
}
