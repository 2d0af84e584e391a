//! Error types for coursecat.
//!
//! Library crates use [`CatalogError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::fmt;
use std::path::PathBuf;

/// Which filename rule a classification failure broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationRule {
    /// None of the program-name keywords occurs in the filename.
    MissingMajorKeyword,
    /// No 4-digit year immediately followed by the cohort marker.
    MissingCohortMarker { marker: String },
    /// The filename does not start with the template prefix + 4-digit year.
    MissingTemplatePrefix { prefix: String },
}

impl fmt::Display for ClassificationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMajorKeyword => write!(f, "no program-name keyword found"),
            Self::MissingCohortMarker { marker } => {
                write!(f, "no 4-digit entry year followed by '{marker}'")
            }
            Self::MissingTemplatePrefix { prefix } => {
                write!(f, "name does not start with '{prefix}' followed by a 4-digit year")
            }
        }
    }
}

/// Top-level error type for all coursecat operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A source filename does not follow its collection's naming convention.
    #[error("cannot classify {file:?}: {rule}")]
    Classification {
        file: String,
        rule: ClassificationRule,
    },

    /// Computed grade level falls outside 1..=4.
    #[error(
        "grade level {level} out of range 1..=4 (reference start year {reference_start_year}, entry year {entry_year})"
    )]
    GradeOutOfRange {
        reference_start_year: i32,
        entry_year: i32,
        level: i64,
    },

    /// An error raised while processing a specific source file.
    #[error("{file}: {source}")]
    InFile {
        file: String,
        #[source]
        source: Box<CatalogError>,
    },

    /// A tabular source file could not be read.
    #[error("table error at {path:?}: {message}")]
    Table { path: PathBuf, message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Output serialization error.
    #[error("export error: {0}")]
    Export(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a classification error for `file`.
    pub fn classification(file: impl Into<String>, rule: ClassificationRule) -> Self {
        Self::Classification {
            file: file.into(),
            rule,
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a table read error for `path`.
    pub fn table(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Table {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the source file name. Classification errors already carry it
    /// and are returned unchanged.
    pub fn in_file(self, file: impl Into<String>) -> Self {
        match self {
            Self::Classification { .. } | Self::InFile { .. } => self,
            other => Self::InFile {
                file: file.into(),
                source: Box::new(other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = CatalogError::config("bad academic year");
        assert_eq!(err.to_string(), "config error: bad academic year");

        let err = CatalogError::classification(
            "课表.csv",
            ClassificationRule::MissingCohortMarker {
                marker: "级".into(),
            },
        );
        assert!(err.to_string().contains("课表.csv"));
        assert!(err.to_string().contains("'级'"));
    }

    #[test]
    fn in_file_wraps_grade_errors_once() {
        let err = CatalogError::GradeOutOfRange {
            reference_start_year: 2025,
            entry_year: 2026,
            level: 0,
        }
        .in_file("软件工程2026级.csv")
        .in_file("ignored.csv");

        let msg = err.to_string();
        assert!(msg.starts_with("软件工程2026级.csv: grade level 0"));
        assert!(!msg.contains("ignored.csv"));
    }

    #[test]
    fn in_file_keeps_classification_errors() {
        let err = CatalogError::classification("x.csv", ClassificationRule::MissingMajorKeyword)
            .in_file("other.csv");
        assert!(matches!(err, CatalogError::Classification { ref file, .. } if file == "x.csv"));
    }
}
