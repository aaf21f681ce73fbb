//! Domain-specific error types for confshelf.
//!
//! Library modules return [`ConfshelfError`]; command handlers at the CLI
//! boundary convert it to [`anyhow::Error`] via the standard `?` operator.
//!
//! Every error classifies into one of five [`ErrorKind`]s:
//!
//! ```text
//! Configuration    HOME unset, unreadable or unsupported config.toml
//! NotFound         a required input path does not exist
//! InvalidArgument  an input exists but is the wrong kind, or a bad name
//! Conflict         a path that must not exist already does
//! Io               a filesystem call failed (carries the OS error text)
//! ```
//!
//! Failures after the first filesystem mutation of an operation are wrapped in
//! [`ConfshelfError::Incomplete`], which records the last completed
//! [`Stage`] and how to recover by hand.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::links::Stage;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, ConfshelfError>;

/// Coarse classification of a [`ConfshelfError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required environment value or configuration setting is missing or invalid.
    Configuration,
    /// A required input path does not exist.
    NotFound,
    /// An input exists but is the wrong kind, or an argument is malformed.
    InvalidArgument,
    /// A target path that must not exist already does.
    Conflict,
    /// An underlying filesystem call failed.
    Io,
}

/// Top-level error type for confshelf.
#[derive(Error, Debug)]
pub enum ConfshelfError {
    /// Neither `HOME` nor `USERPROFILE` is set.
    #[error("\"HOME\" variable not set")]
    HomeNotSet,

    /// The home directory value is a relative path.
    #[error("home directory \"{}\" is not an absolute path", path.display())]
    HomeNotAbsolute {
        /// The value read from the environment.
        path: PathBuf,
    },

    /// The configuration file could not be parsed or holds an invalid value.
    #[error("invalid configuration in {}: {message}", path.display())]
    Config {
        /// Path of the offending file.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// A required input path does not exist.
    #[error("\"{}\" does not exist", path.display())]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// An input path exists but is not a regular file.
    #[error("\"{}\" is not a regular file", path.display())]
    NotRegularFile {
        /// The offending path.
        path: PathBuf,
    },

    /// A repository member name cannot be used.
    #[error("invalid repository name \"{name}\": {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A path cannot be recorded in the manifest because it is not valid UTF-8.
    #[error("\"{}\" is not valid UTF-8", path.display())]
    NonUtf8Path {
        /// The offending path (displayed lossily).
        path: PathBuf,
    },

    /// A path that must not exist already does.
    #[error("\"{}\" already exists", path.display())]
    AlreadyExists {
        /// The existing path.
        path: PathBuf,
    },

    /// A filesystem call failed.
    #[error("{action}: {source}")]
    Io {
        /// Description of the attempted action, naming the path(s) involved.
        action: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// A mutation failed after earlier mutations of the same operation succeeded.
    #[error("{source} (completed: {stage}; {recovery})")]
    Incomplete {
        /// Last stage that completed before the failure.
        stage: Stage,
        /// What the operator has to do to finish or undo the operation.
        recovery: String,
        /// The failure that stopped the operation.
        #[source]
        source: Box<ConfshelfError>,
    },
}

impl ConfshelfError {
    /// Build an [`ConfshelfError::Io`] from an action description and an OS error.
    #[must_use]
    pub fn io(action: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            action: action.into(),
            source,
        }
    }

    /// Build a [`ConfshelfError::Config`] for `path`.
    #[must_use]
    pub fn config(path: &Path, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Classify this error.
    ///
    /// [`ConfshelfError::Incomplete`] reports the kind of the failure it wraps.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HomeNotSet | Self::HomeNotAbsolute { .. } | Self::Config { .. } => {
                ErrorKind::Configuration
            }
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NotRegularFile { .. } | Self::InvalidName { .. } | Self::NonUtf8Path { .. } => {
                ErrorKind::InvalidArgument
            }
            Self::AlreadyExists { .. } => ErrorKind::Conflict,
            Self::Io { .. } => ErrorKind::Io,
            Self::Incomplete { source, .. } => source.kind(),
        }
    }

    /// The stage an interrupted operation reached, if this error reports one.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Incomplete { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
