//! Progress of a link operation.
use std::fmt;

/// Last completed step of a link operation.
///
/// Manage walks `Validated → Moved → Linked → Recorded`; LinkExisting skips
/// `Moved`.  A failure is reported together with the stage it stopped after,
/// which tells the operator exactly what is left to repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// All preconditions hold; nothing has been touched yet.
    Validated,
    /// The source file now lives in the repository.
    Moved,
    /// The symbolic link exists.
    Linked,
    /// The manifest entry is written; the operation is complete.
    Recorded,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Validated => "validated",
            Self::Moved => "moved",
            Self::Linked => "linked",
            Self::Recorded => "recorded",
        })
    }
}
