//! # Primitives
//!
//! Fixed constants for the gradebook: collection names of the data file,
//! the date format, and the conventions callers are expected to validate.

use std::ops::RangeInclusive;

/// Names of the five collections in the data file, in the order they are written.
pub const COLLECTIONS: [&str; 5] = ["students", "teachers", "disciplines", "grades", "groups"];

/// Default data file name used when nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "gradebook.json";

/// Date format for `Grade::date` (ISO 8601 calendar date).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Maximum accepted size of a data file.
///
/// Checked before parsing so a runaway file fails fast instead of being
/// buffered into a JSON tree.
pub const MAX_STORE_FILE_SIZE: usize = 64 * 1024 * 1024; // 64 MiB

/// Conventional range of grade values.
///
/// The store accepts any value; callers that take user input check against this.
pub const GRADE_VALUES: RangeInclusive<u8> = 2..=5;

/// Conventional assessment types. Stored and matched as free text.
pub const ASSESSMENT_TYPES: [&str; 4] = ["exam", "pass/fail", "coursework", "practicum"];

/// Scale of `report::Rating` (hundredths).
pub const RATING_SCALE: u64 = 100;
