//! # Record Types
//!
//! The entities kept in the data file: accounts (students and teachers),
//! disciplines, groups and grades.
//!
//! Every record is a flat key/value object on disk. Decoding goes through
//! [`Record::from_value`], which reports a missing required key as
//! `GradebookError::MissingField` before serde sees the object, and fills
//! optional keys with their documented defaults.
//!
//! Nothing here validates ranges or formats. A grade of 9 or a date of
//! "tomorrow" is stored as given.

use crate::primitives::DATE_FORMAT;
use crate::{DisciplineId, GradeId, GradebookError, GroupId, StudentId, TeacherId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

// =============================================================================
// RECORD TRAIT
// =============================================================================

/// Conversion between a record and its flat JSON object form.
pub trait Record: Serialize + DeserializeOwned {
    /// Record name used in error messages.
    const KIND: &'static str;

    /// Keys that must be present for the record to decode.
    const REQUIRED_FIELDS: &'static [&'static str];

    /// Encode the record as a JSON object.
    fn to_value(&self) -> Result<Value, GradebookError> {
        serde_json::to_value(self).map_err(|e| GradebookError::SerializationError(e.to_string()))
    }

    /// Decode a record from a JSON object.
    ///
    /// Required keys are checked first so their absence surfaces as
    /// `MissingField`; any other mismatch is a `DeserializationError`.
    fn from_value(value: Value) -> Result<Self, GradebookError> {
        let missing = match value.as_object() {
            Some(object) => Self::REQUIRED_FIELDS
                .iter()
                .copied()
                .find(|field| !object.contains_key(*field)),
            None => {
                return Err(GradebookError::DeserializationError(format!(
                    "{} record must be an object",
                    Self::KIND
                )));
            }
        };

        if let Some(field) = missing {
            return Err(GradebookError::MissingField {
                record: Self::KIND,
                field,
            });
        }

        serde_json::from_value(value).map_err(|e| {
            GradebookError::DeserializationError(format!("{} record: {}", Self::KIND, e))
        })
    }
}

/// Today's local date in `DATE_FORMAT`.
pub fn today() -> String {
    chrono::Local::now()
        .date_naive()
        .format(DATE_FORMAT)
        .to_string()
}

/// A null date in a hand-edited file means "today", like an absent one.
fn date_or_today<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(today))
}

fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// ACCOUNTS
// =============================================================================

/// Capability tag of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    /// The tag as stored in user-facing output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Teacher => "Teacher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A student account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub full_name: String,
    pub email: String,
    /// Opaque, already hashed. Stored and returned verbatim.
    pub password_hash: String,
    /// Record-book number.
    #[serde(rename = "graduateBookNumber")]
    pub gradebook_number: String,
    /// Group name. Free text, not a reference to a `Group` record.
    pub group: String,
}

impl Student {
    /// Create a new student.
    #[must_use]
    pub fn new(
        id: StudentId,
        full_name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        gradebook_number: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            gradebook_number: gradebook_number.into(),
            group: group.into(),
        }
    }
}

impl Record for Student {
    const KIND: &'static str = "student";
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "id",
        "fullName",
        "email",
        "passwordHash",
        "graduateBookNumber",
        "group",
    ];
}

/// A teacher account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub full_name: String,
    pub email: String,
    /// Opaque, already hashed. Stored and returned verbatim.
    pub password_hash: String,
    pub department: String,
    pub position: String,
}

impl Teacher {
    /// Create a new teacher.
    #[must_use]
    pub fn new(
        id: TeacherId,
        full_name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        department: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            department: department.into(),
            position: position.into(),
        }
    }
}

impl Record for Teacher {
    const KIND: &'static str = "teacher";
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "id",
        "fullName",
        "email",
        "passwordHash",
        "department",
        "position",
    ];
}

/// A system user: either a student or a teacher.
///
/// Students and teachers live in separate collections on disk; this enum is
/// the in-memory view over both when the caller does not care which.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Account {
    Student(Student),
    Teacher(Teacher),
}

impl Account {
    /// The capability tag of this account.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Student(_) => Role::Student,
            Self::Teacher(_) => Role::Teacher,
        }
    }

    /// Raw id. Student and teacher ids are independent sequences.
    #[must_use]
    pub const fn id(&self) -> u64 {
        match self {
            Self::Student(s) => s.id.value(),
            Self::Teacher(t) => t.id.value(),
        }
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        match self {
            Self::Student(s) => &s.full_name,
            Self::Teacher(t) => &t.full_name,
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Self::Student(s) => &s.email,
            Self::Teacher(t) => &t.email,
        }
    }

    #[must_use]
    pub fn password_hash(&self) -> &str {
        match self {
            Self::Student(s) => &s.password_hash,
            Self::Teacher(t) => &t.password_hash,
        }
    }
}

impl From<Student> for Account {
    fn from(student: Student) -> Self {
        Self::Student(student)
    }
}

impl From<Teacher> for Account {
    fn from(teacher: Teacher) -> Self {
        Self::Teacher(teacher)
    }
}

// =============================================================================
// DISCIPLINE
// =============================================================================

/// A course taught in a given semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discipline {
    pub id: DisciplineId,
    pub name: String,
    pub semester: u32,
    /// Default assessment type for the course (free text).
    pub assessment_type: String,
}

impl Discipline {
    #[must_use]
    pub fn new(
        id: DisciplineId,
        name: impl Into<String>,
        semester: u32,
        assessment_type: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            semester,
            assessment_type: assessment_type.into(),
        }
    }
}

impl Record for Discipline {
    const KIND: &'static str = "discipline";
    const REQUIRED_FIELDS: &'static [&'static str] = &["id", "name", "semester", "assessmentType"];
}

// =============================================================================
// GROUP
// =============================================================================

/// A study group and its member students.
///
/// Membership keeps insertion order and never holds the same id twice
/// once it has gone through [`Group::add_student`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub specialty: String,
    pub enrollment_year: i32,
    #[serde(default)]
    student_ids: Vec<StudentId>,
}

impl Group {
    /// Create an empty group.
    #[must_use]
    pub fn new(
        id: GroupId,
        name: impl Into<String>,
        specialty: impl Into<String>,
        enrollment_year: i32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            specialty: specialty.into(),
            enrollment_year,
            student_ids: Vec::new(),
        }
    }

    /// Replace the member list as given.
    #[must_use]
    pub fn with_students(mut self, student_ids: Vec<StudentId>) -> Self {
        self.student_ids = student_ids;
        self
    }

    /// Add a student. Returns `false` if the student was already a member.
    pub fn add_student(&mut self, student: StudentId) -> bool {
        if self.student_ids.contains(&student) {
            return false;
        }
        self.student_ids.push(student);
        true
    }

    /// Remove a student. Returns `false` if the student was not a member.
    pub fn remove_student(&mut self, student: StudentId) -> bool {
        match self.student_ids.iter().position(|id| *id == student) {
            Some(index) => {
                self.student_ids.remove(index);
                true
            }
            None => false,
        }
    }

    /// Member ids in insertion order.
    #[must_use]
    pub fn student_ids(&self) -> &[StudentId] {
        &self.student_ids
    }

    #[must_use]
    pub fn contains(&self, student: StudentId) -> bool {
        self.student_ids.contains(&student)
    }
}

impl Record for Group {
    const KIND: &'static str = "group";
    const REQUIRED_FIELDS: &'static [&'static str] = &["id", "name", "specialty", "enrollmentYear"];
}

// =============================================================================
// GRADE
// =============================================================================

/// A grade given to a student for a discipline.
///
/// `student_id`, `discipline_id` and `teacher_id` are not checked against
/// the store. A dangling reference is legal and simply joins to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: GradeId,
    /// Conventionally 2–5 (see `primitives::GRADE_VALUES`).
    pub value: u8,
    pub assessment_type: String,
    /// ISO 8601 date. Defaults to today when absent or null.
    #[serde(default = "today", deserialize_with = "date_or_today")]
    pub date: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub comment: String,
    pub student_id: StudentId,
    pub discipline_id: DisciplineId,
    pub teacher_id: TeacherId,
}

impl Grade {
    /// Create a grade dated today with an empty comment.
    #[must_use]
    pub fn new(
        id: GradeId,
        value: u8,
        assessment_type: impl Into<String>,
        student_id: StudentId,
        discipline_id: DisciplineId,
        teacher_id: TeacherId,
    ) -> Self {
        Self {
            id,
            value,
            assessment_type: assessment_type.into(),
            date: today(),
            comment: String::new(),
            student_id,
            discipline_id,
            teacher_id,
        }
    }

    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

impl Record for Grade {
    const KIND: &'static str = "grade";
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "id",
        "value",
        "assessmentType",
        "studentId",
        "disciplineId",
        "teacherId",
    ];
}

// =============================================================================
// TESTS
// =============================================================================
