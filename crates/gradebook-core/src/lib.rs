//! # gradebook-core
//!
//! Student grade records kept in a single JSON file - THE LOGIC.
//!
//! The crate holds students, teachers, disciplines, groups and grades in
//! memory, rewrites the whole data file on every mutation, and answers
//! filtered grade searches by joining grades against students and
//! disciplines by id.
//!
//! ## Constraints
//!
//! - Synchronous and single-threaded; one writer per data file
//! - No async, no network, no logging dependency (the app layer logs)
//! - Foreign keys on grades are never validated
//! - Lookups return owned copies; in-place edits go through `*_mut` + `save`

// =============================================================================
// MODULES
// =============================================================================

pub mod formats;
pub mod primitives;
pub mod records;
pub mod report;
pub mod search;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{DisciplineId, GradeId, GradebookError, GroupId, StudentId, TeacherId};

// =============================================================================
// RE-EXPORTS: Records and Store
// =============================================================================

pub use records::{Account, Discipline, Grade, Group, Record, Role, Student, Teacher};
pub use report::{Rating, student_grades, student_rating};
pub use search::Search;
pub use store::{Dataset, Store, StoreCounts};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{dataset_from_bytes, dataset_to_bytes};
