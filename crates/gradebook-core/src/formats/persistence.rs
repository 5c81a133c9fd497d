//! # Persistence Format
//!
//! JSON serialization of the whole gradebook.
//!
//! Format: one UTF-8 JSON object with five arrays, written in this order:
//! `students`, `teachers`, `disciplines`, `grades`, `groups`.
//! Output is pretty-printed with two-space indentation and non-ASCII text
//! left unescaped, so the file stays readable and safe to hand-edit.
//!
//! ## Validation
//!
//! Loading checks, in order:
//! 1. Maximum payload size (`MAX_STORE_FILE_SIZE`), before any parsing
//! 2. Well-formed JSON with an object at the root
//! 3. Every collection present and an array
//! 4. Every record decodable (`Record::from_value`)
//!
//! Any failure rejects the whole file. Nothing is partially loaded.

use crate::primitives::{COLLECTIONS, MAX_STORE_FILE_SIZE};
use crate::records::Record;
use crate::{Dataset, GradebookError};
use serde_json::{Map, Value};

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a dataset to bytes.
///
/// This is a pure transformation - no file I/O.
pub fn dataset_to_bytes(dataset: &Dataset) -> Result<Vec<u8>, GradebookError> {
    serde_json::to_vec_pretty(dataset).map_err(|e| GradebookError::SerializationError(e.to_string()))
}

/// Deserialize a dataset from bytes.
///
/// This is a pure transformation - no file I/O.
pub fn dataset_from_bytes(bytes: &[u8]) -> Result<Dataset, GradebookError> {
    check_store_size(bytes.len() as u64)?;

    let root: Value = serde_json::from_slice(bytes)
        .map_err(|e| GradebookError::MalformedStore(format!("Invalid JSON: {}", e)))?;

    let Value::Object(mut root) = root else {
        return Err(GradebookError::MalformedStore(
            "Top-level value must be an object".to_string(),
        ));
    };

    let [students, teachers, disciplines, grades, groups] = COLLECTIONS;
    Ok(Dataset {
        students: take_collection(&mut root, students)?,
        teachers: take_collection(&mut root, teachers)?,
        disciplines: take_collection(&mut root, disciplines)?,
        grades: take_collection(&mut root, grades)?,
        groups: take_collection(&mut root, groups)?,
    })
}

/// Reject a payload of `len` bytes above `MAX_STORE_FILE_SIZE`.
pub fn check_store_size(len: u64) -> Result<(), GradebookError> {
    if len > MAX_STORE_FILE_SIZE as u64 {
        return Err(GradebookError::MalformedStore(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            len, MAX_STORE_FILE_SIZE
        )));
    }
    Ok(())
}

/// Remove the named array from the root object and decode each element.
fn take_collection<R: Record>(
    root: &mut Map<String, Value>,
    name: &str,
) -> Result<Vec<R>, GradebookError> {
    match root.remove(name) {
        Some(Value::Array(items)) => items.into_iter().map(R::from_value).collect(),
        Some(_) => Err(GradebookError::MalformedStore(format!(
            "Collection `{}` must be an array",
            name
        ))),
        None => Err(GradebookError::MalformedStore(format!(
            "Missing collection `{}`",
            name
        ))),
    }
}

// =============================================================================
// TESTS
// =============================================================================
