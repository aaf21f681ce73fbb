//! Idempotent creation of the application and repository directories.
use std::fs::DirBuilder;
use std::path::Path;

use crate::error::{ConfshelfError, Result};
use crate::logging::Log;
use crate::paths::AppPaths;

/// Make sure the application directory and the repository root exist.
///
/// Directories are created recursively, private to the owner on Unix.
/// Running this again is a no-op.
///
/// # Errors
///
/// Returns [`ConfshelfError::Io`] if a directory cannot be created,
/// including when a non-directory already occupies one of the paths.
pub fn ensure_directories(paths: &AppPaths, log: &dyn Log) -> Result<()> {
    create_private_dir(paths.app_dir(), log)?;
    create_private_dir(paths.repository_root(), log)
}

fn create_private_dir(path: &Path, log: &dyn Log) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt as _;
        builder.mode(0o700);
    }
    builder.create(path).map_err(|e| {
        ConfshelfError::io(
            format!("failed to create directory \"{}\"", path.display()),
            e,
        )
    })?;
    log.debug(&format!("created {}", path.display()));
    Ok(())
}
