//! # Core Type Definitions
//!
//! Identifiers and the error type shared by every gradebook module:
//! - Record identifiers (`StudentId`, `TeacherId`, `DisciplineId`, `GroupId`, `GradeId`)
//! - Error types (`GradebookError`)
//!
//! Identifiers are plain integers on disk. The newtypes only keep a grade's
//! foreign keys from being mixed up in code; they are never checked against
//! the collections they point into.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// RECORD IDENTIFIERS
// =============================================================================

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Get the raw id value.
            #[must_use]
            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

record_id!(
    /// Identifier of a student account.
    StudentId
);

record_id!(
    /// Identifier of a teacher account.
    TeacherId
);

record_id!(
    /// Identifier of a discipline.
    DisciplineId
);

record_id!(
    /// Identifier of a study group.
    GroupId
);

record_id!(
    /// Identifier of a grade. Unique within the store when allocated
    /// through `Store::next_grade_id`.
    GradeId
);

impl GradeId {
    /// The id following this one, saturating at `u64::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the gradebook.
///
/// - Lookups that find nothing return `Option::None`, not an error
/// - Use `Result<T, GradebookError>` for fallible operations
/// - Nothing is repaired or retried; failures surface immediately
#[derive(Debug, Error)]
pub enum GradebookError {
    /// A structurally required key was absent while decoding a record.
    #[error("Missing field `{field}` in {record} record")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    /// A record the caller cannot proceed without does not exist.
    #[error("{record} not found: {id}")]
    NotFound { record: &'static str, id: u64 },

    /// The backing file could not be read or written.
    #[error("Persistence failure at {path}: {message}")]
    Persistence { path: String, message: String },

    /// The backing file exists but is not a five-collection document.
    #[error("Malformed store: {0}")]
    MalformedStore(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A record had the right keys but a value of the wrong type.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl GradebookError {
    /// Build a persistence error for `path` from an I/O failure.
    pub fn persistence(path: &std::path::Path, err: impl fmt::Display) -> Self {
        Self::Persistence {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
