//! # Store Module
//!
//! The authoritative in-memory copy of every record, backed by one JSON file.
//!
//! - Opening a path that does not exist yields an empty store; the file is
//!   created by the first write
//! - Every mutation rewrites the complete file before returning
//! - Reads hand out clones, never references into the collections
//!
//! The store assumes a single writer. Two processes mutating the same file
//! will overwrite each other's changes.

use crate::formats::{check_store_size, dataset_from_bytes, dataset_to_bytes};
use crate::search::Search;
use crate::{
    Account, Discipline, DisciplineId, Grade, GradeId, GradebookError, Group, GroupId, Student,
    StudentId, Teacher, TeacherId,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// =============================================================================
// DATASET
// =============================================================================

/// All five collections, in storage order.
///
/// This is exactly what the data file contains. Decoding goes through
/// [`dataset_from_bytes`] only, so required keys are always checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub disciplines: Vec<Discipline>,
    pub grades: Vec<Grade>,
    pub groups: Vec<Group>,
}

/// Number of records in each collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub students: usize,
    pub teachers: usize,
    pub disciplines: usize,
    pub grades: usize,
    pub groups: usize,
}

// =============================================================================
// STORE
// =============================================================================

/// Gradebook records bound to a data file.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    data: Dataset,
}

impl Store {
    /// Open the store at `path`.
    ///
    /// A missing file is not an error: the store starts empty and the file
    /// is written on the first mutation. A file that exists but cannot be
    /// parsed fails the open.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GradebookError> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            read_dataset(&path)?
        } else {
            Dataset::default()
        };
        Ok(Self { path, data })
    }

    /// Create a store from an existing dataset without touching the disk.
    #[must_use]
    pub fn with_dataset(path: impl AsRef<Path>, data: Dataset) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            data,
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Borrow the full in-memory state.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.data
    }

    /// Record counts per collection.
    #[must_use]
    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            students: self.data.students.len(),
            teachers: self.data.teachers.len(),
            disciplines: self.data.disciplines.len(),
            grades: self.data.grades.len(),
            groups: self.data.groups.len(),
        }
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    /// Write the full state to the store's own file.
    pub fn save(&self) -> Result<(), GradebookError> {
        self.save_to(&self.path)
    }

    /// Write the full state to `path`, creating parent directories as needed.
    ///
    /// The document goes to a temporary file next to `path` which is then
    /// renamed over it. A failed write leaves the previous file intact.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), GradebookError> {
        let path = path.as_ref();
        let bytes = dataset_to_bytes(&self.data)?;

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|e| GradebookError::persistence(parent, e))?;

        let mut file =
            NamedTempFile::new_in(parent).map_err(|e| GradebookError::persistence(parent, e))?;
        file.write_all(&bytes)
            .and_then(|()| file.as_file().sync_all())
            .map_err(|e| GradebookError::persistence(file.path(), e))?;
        file.persist(path)
            .map_err(|e| GradebookError::persistence(path, e.error))?;
        Ok(())
    }

    /// Replace the in-memory state with the contents of `path`.
    ///
    /// The store keeps its own path; later mutations still write there.
    /// On failure the current state is left untouched.
    pub fn load_from(&mut self, path: impl AsRef<Path>) -> Result<(), GradebookError> {
        self.data = read_dataset(path.as_ref())?;
        Ok(())
    }

    // =========================================================================
    // GRADES
    // =========================================================================

    /// Append a grade and persist.
    ///
    /// No duplicate-id check is made; allocate ids with [`Store::next_grade_id`].
    pub fn add_grade(&mut self, grade: Grade) -> Result<(), GradebookError> {
        self.data.grades.push(grade);
        self.save()
    }

    /// Add a grade on behalf of `teacher`, stamping the teacher's id on it.
    pub fn submit_grade(&mut self, teacher: &Teacher, mut grade: Grade) -> Result<(), GradebookError> {
        grade.teacher_id = teacher.id;
        self.add_grade(grade)
    }

    /// Remove the grade with `id`.
    ///
    /// Returns `true` and persists if a grade was removed. Returns `false`
    /// without writing if no grade has that id.
    pub fn remove_grade(&mut self, id: GradeId) -> Result<bool, GradebookError> {
        let before = self.data.grades.len();
        self.data.grades.retain(|g| g.id != id);
        if self.data.grades.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Update a grade's value and comment in place and persist.
    ///
    /// Returns `false` without writing if no grade has that id.
    pub fn edit_grade(
        &mut self,
        id: GradeId,
        value: u8,
        comment: impl Into<String>,
    ) -> Result<bool, GradebookError> {
        let Some(grade) = self.grade_mut(id) else {
            return Ok(false);
        };
        grade.value = value;
        grade.comment = comment.into();
        self.save()?;
        Ok(true)
    }

    /// Find grades matching `criteria`, in storage order.
    ///
    /// Students and disciplines are indexed by id once, then every grade is
    /// joined against them. A dangling reference joins to an empty record
    /// and only fails the predicates that look at it.
    pub fn find_grades(&self, criteria: &Search) -> Vec<Grade> {
        let students: BTreeMap<StudentId, &Student> =
            self.data.students.iter().map(|s| (s.id, s)).collect();
        let disciplines: BTreeMap<DisciplineId, &Discipline> =
            self.data.disciplines.iter().map(|d| (d.id, d)).collect();
        let filter = criteria.compile();

        self.data
            .grades
            .iter()
            .filter(|grade| {
                let student = students.get(&grade.student_id).copied();
                let discipline = disciplines.get(&grade.discipline_id).copied();
                filter.matches(grade, student, discipline)
            })
            .cloned()
            .collect()
    }

    /// Lookup a grade by id.
    pub fn grade_by_id(&self, id: GradeId) -> Option<Grade> {
        self.data.grades.iter().find(|g| g.id == id).cloned()
    }

    /// Borrow a grade for in-place editing.
    ///
    /// Changes reach the file only after [`Store::save`].
    pub fn grade_mut(&mut self, id: GradeId) -> Option<&mut Grade> {
        self.data.grades.iter_mut().find(|g| g.id == id)
    }

    /// One past the highest grade id, or 1 when there are no grades.
    #[must_use]
    pub fn next_grade_id(&self) -> GradeId {
        self.data
            .grades
            .iter()
            .map(|g| g.id)
            .max()
            .map_or(GradeId(1), GradeId::next)
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    pub fn students(&self) -> Vec<Student> {
        self.data.students.clone()
    }

    pub fn teachers(&self) -> Vec<Teacher> {
        self.data.teachers.clone()
    }

    pub fn disciplines(&self) -> Vec<Discipline> {
        self.data.disciplines.clone()
    }

    pub fn groups(&self) -> Vec<Group> {
        self.data.groups.clone()
    }

    /// Every account: students first, then teachers.
    pub fn accounts(&self) -> Vec<Account> {
        let students = self.data.students.iter().cloned().map(Account::from);
        let teachers = self.data.teachers.iter().cloned().map(Account::from);
        students.chain(teachers).collect()
    }

    pub fn student_by_id(&self, id: StudentId) -> Option<Student> {
        self.data.students.iter().find(|s| s.id == id).cloned()
    }

    pub fn teacher_by_id(&self, id: TeacherId) -> Option<Teacher> {
        self.data.teachers.iter().find(|t| t.id == id).cloned()
    }

    pub fn discipline_by_id(&self, id: DisciplineId) -> Option<Discipline> {
        self.data.disciplines.iter().find(|d| d.id == id).cloned()
    }

    pub fn group_by_id(&self, id: GroupId) -> Option<Group> {
        self.data.groups.iter().find(|g| g.id == id).cloned()
    }

    /// Borrow a group for in-place editing.
    ///
    /// Changes reach the file only after [`Store::save`].
    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.data.groups.iter_mut().find(|g| g.id == id)
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Append a student and persist.
    pub fn add_student(&mut self, student: Student) -> Result<(), GradebookError> {
        self.data.students.push(student);
        self.save()
    }

    /// Append a teacher and persist.
    pub fn add_teacher(&mut self, teacher: Teacher) -> Result<(), GradebookError> {
        self.data.teachers.push(teacher);
        self.save()
    }

    /// Append a discipline and persist.
    pub fn add_discipline(&mut self, discipline: Discipline) -> Result<(), GradebookError> {
        self.data.disciplines.push(discipline);
        self.save()
    }

    /// Append a group and persist.
    pub fn add_group(&mut self, group: Group) -> Result<(), GradebookError> {
        self.data.groups.push(group);
        self.save()
    }
}

/// Read and parse a whole data file.
///
/// The size limit is checked on the file's metadata before anything is read.
fn read_dataset(path: &Path) -> Result<Dataset, GradebookError> {
    let metadata = std::fs::metadata(path).map_err(|e| GradebookError::persistence(path, e))?;
    check_store_size(metadata.len())?;
    let bytes = std::fs::read(path).map_err(|e| GradebookError::persistence(path, e))?;
    dataset_from_bytes(&bytes)
}

// =============================================================================
// TESTS
// =============================================================================
