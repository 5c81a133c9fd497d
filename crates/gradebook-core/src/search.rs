//! # Search Module
//!
//! Filter criteria for grade lookups.
//!
//! A `Search` is never persisted. Each field is an independent predicate and
//! an empty string (or `None` for the semester) leaves that field
//! unconstrained. A grade matches when every active predicate holds.

use crate::{Discipline, Grade, Student};

/// Criteria for `Store::find_grades`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Search {
    /// Case-insensitive substring of the student's full name.
    pub student_name: String,
    /// Case-insensitive substring of the discipline name.
    pub discipline_name: String,
    /// Exact semester of the discipline.
    pub semester: Option<u32>,
    /// Case-insensitive exact assessment type of the grade.
    pub assessment_type: String,
}

impl Search {
    /// Criteria that match every grade.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn student_name(mut self, name: impl Into<String>) -> Self {
        self.student_name = name.into();
        self
    }

    #[must_use]
    pub fn discipline_name(mut self, name: impl Into<String>) -> Self {
        self.discipline_name = name.into();
        self
    }

    #[must_use]
    pub fn semester(mut self, semester: u32) -> Self {
        self.semester = Some(semester);
        self
    }

    #[must_use]
    pub fn assessment_type(mut self, kind: impl Into<String>) -> Self {
        self.assessment_type = kind.into();
        self
    }

    /// True when no field constrains the result.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.student_name.is_empty()
            && self.discipline_name.is_empty()
            && self.semester.is_none()
            && self.assessment_type.is_empty()
    }

    /// Lower-case the text criteria once for a scan over many grades.
    #[must_use]
    pub(crate) fn compile(&self) -> GradeFilter {
        let lowered = |s: &str| (!s.is_empty()).then(|| s.to_lowercase());
        GradeFilter {
            student_name: lowered(&self.student_name),
            discipline_name: lowered(&self.discipline_name),
            semester: self.semester,
            assessment_type: lowered(&self.assessment_type),
        }
    }
}

/// A `Search` prepared for matching.
#[derive(Debug)]
pub(crate) struct GradeFilter {
    student_name: Option<String>,
    discipline_name: Option<String>,
    semester: Option<u32>,
    assessment_type: Option<String>,
}

impl GradeFilter {
    /// Check a grade joined with its student and discipline.
    ///
    /// A missing join behaves as an empty record: empty name, no semester.
    /// Predicates run in order: student name, discipline name, semester,
    /// assessment type.
    pub(crate) fn matches(
        &self,
        grade: &Grade,
        student: Option<&Student>,
        discipline: Option<&Discipline>,
    ) -> bool {
        if let Some(needle) = &self.student_name {
            let name = student.map_or("", |s| s.full_name.as_str());
            if !name.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }

        if let Some(needle) = &self.discipline_name {
            let name = discipline.map_or("", |d| d.name.as_str());
            if !name.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }

        if let Some(semester) = self.semester
            && discipline.map(|d| d.semester) != Some(semester)
        {
            return false;
        }

        if let Some(kind) = &self.assessment_type
            && grade.assessment_type.to_lowercase() != *kind
        {
            return false;
        }

        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
