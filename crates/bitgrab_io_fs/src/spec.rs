//! Read specification models and top-level error types.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Pattern matching mode for ignore lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumReadPatternMode {
    /// Shell-like wildcards (`*`, `?`, character classes).
    Glob,
    /// Regular expression pattern, matched anywhere in the path.
    Regex,
    /// Exact substring match.
    Literal,
}

/// Which form of a file path ignore patterns are matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumReadPatternScope {
    /// Path below the root with `/` separators, e.g. `sub/a.txt`.
    RelativePath,
    /// Absolute path of the file, root included.
    AbsolutePath,
}

/// Coarse classification of [`RecordError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumRecordErrorKind {
    NotADirectory,
    ReadFailure,
    WriteFailure,
    InvalidPattern,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for [`crate::DirectoryRecord::read_with_options`].
#[derive(Debug, Clone)]
pub struct SpecReadOptions {
    /// Ignore patterns applied to each file path (see `rule_pattern_scope`).
    pub patterns_ignore: Option<Vec<String>>,
    /// Pattern interpretation mode.
    pub rule_pattern: EnumReadPatternMode,
    /// Path form the patterns are matched against.
    pub rule_pattern_scope: EnumReadPatternScope,
    /// Maximum worker threads for the content-read stage.
    pub num_workers_max: Option<usize>,
}

impl Default for SpecReadOptions {
    fn default() -> Self {
        Self {
            patterns_ignore: None,
            rule_pattern: EnumReadPatternMode::Glob,
            rule_pattern_scope: EnumReadPatternScope::RelativePath,
            num_workers_max: None,
        }
    }
}

/// Failure of a record construction or replication call.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Root path does not exist or is not a directory.
    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// Listing a directory or reading a file failed.
    #[error("Failed to read {}: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Creating a directory or writing a file failed.
    #[error("Failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Ignore pattern failed to compile.
    #[error("Invalid ignore pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl RecordError {
    pub fn kind(&self) -> EnumRecordErrorKind {
        match self {
            Self::NotADirectory { .. } => EnumRecordErrorKind::NotADirectory,
            Self::ReadFailure { .. } => EnumRecordErrorKind::ReadFailure,
            Self::WriteFailure { .. } => EnumRecordErrorKind::WriteFailure,
            Self::InvalidPattern { .. } => EnumRecordErrorKind::InvalidPattern,
        }
    }

    /// Offending path, if the error is path-scoped.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotADirectory { path }
            | Self::ReadFailure { path, .. }
            | Self::WriteFailure { path, .. } => Some(path),
            Self::InvalidPattern { .. } => None,
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ReadFailure {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::WriteFailure {
            path: path.into(),
            source,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::io;
    use std::path::Path;

    use super::{EnumRecordErrorKind, RecordError};

    #[test]
    fn record_error_display_carries_path_and_cause() {
        let err = RecordError::read(
            "/data/in/a.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert_eq!(err.kind(), EnumRecordErrorKind::ReadFailure);
        assert_eq!(err.path(), Some(Path::new("/data/in/a.txt")));
        assert_eq!(
            err.to_string(),
            "Failed to read /data/in/a.txt: permission denied"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn invalid_pattern_has_no_path() {
        let err = RecordError::InvalidPattern {
            pattern: "(".to_string(),
            message: "unclosed group".to_string(),
        };
        assert_eq!(err.kind(), EnumRecordErrorKind::InvalidPattern);
        assert!(err.path().is_none());
    }
}
