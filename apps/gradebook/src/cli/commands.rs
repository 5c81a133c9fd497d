//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Every command opens the store, does its work and returns. Mutating
//! commands rely on the store writing the data file before it returns.

use super::{DisciplineArgs, FindArgs, GradeArgs, GroupArgs, ListKind, StudentArgs, TeacherArgs};
use crate::config::{AppConfig, OutputFormat};
use crate::error::AppError;
use chrono::NaiveDate;
use gradebook_core::{
    Dataset, Discipline, DisciplineId, Grade, GradeId, Group, GroupId, Search, Store, Student,
    StudentId, Teacher, TeacherId,
    primitives::{ASSESSMENT_TYPES, DATE_FORMAT, GRADE_VALUES},
    student_rating,
};
use serde::Serialize;
use std::collections::BTreeMap;

// =============================================================================
// INPUT CHECKS
// =============================================================================

/// Reject grade values outside the conventional range.
fn validate_grade_value(value: u8) -> Result<(), AppError> {
    if !GRADE_VALUES.contains(&value) {
        return Err(AppError::InvalidArgument(format!(
            "Grade value {} is outside {}..={}",
            value,
            GRADE_VALUES.start(),
            GRADE_VALUES.end()
        )));
    }
    Ok(())
}

/// Reject dates that are not `YYYY-MM-DD`.
fn validate_date(date: &str) -> Result<(), AppError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map(|_| ())
        .map_err(|e| AppError::InvalidArgument(format!("Invalid date '{}': {}", date, e)))
}

/// Assessment types are free text; an unusual one is only worth a warning.
fn check_assessment_type(kind: &str) {
    let lowered = kind.to_lowercase();
    if !ASSESSMENT_TYPES.contains(&lowered.as_str()) {
        tracing::warn!(
            "Assessment type '{}' is not one of: {}",
            kind,
            ASSESSMENT_TYPES.join(", ")
        );
    }
}

fn duplicate(record: &str, id: u64) -> AppError {
    AppError::InvalidArgument(format!("{} {} already exists", record, id))
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Create an empty data file.
pub fn cmd_init(config: &AppConfig, force: bool) -> Result<(), AppError> {
    let path = &config.data_file;
    if path.exists() && !force {
        return Err(AppError::InvalidArgument(
            "Data file already exists. Use --force to overwrite.".to_string(),
        ));
    }

    Store::with_dataset(path, Dataset::default()).save()?;
    tracing::info!("Initialized empty data file at {:?}", path);
    println!("Initialized new data file at {:?}", path);

    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show record counts.
pub fn cmd_status(config: &AppConfig) -> Result<(), AppError> {
    let store = open_store(config)?;
    let counts = store.counts();

    if config.output == OutputFormat::Json {
        print_json(&serde_json::json!({
            "data_file": config.data_file.to_string_lossy(),
            "counts": counts,
            "next_grade_id": store.next_grade_id(),
        }));
        return Ok(());
    }

    println!("Gradebook Status");
    println!("================");
    println!("Data file: {:?}", config.data_file);
    println!();
    println!("Students:    {}", counts.students);
    println!("Teachers:    {}", counts.teachers);
    println!("Disciplines: {}", counts.disciplines);
    println!("Groups:      {}", counts.groups);
    println!("Grades:      {}", counts.grades);
    println!("Next grade:  {}", store.next_grade_id());

    Ok(())
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// List records of one kind.
pub fn cmd_list(config: &AppConfig, kind: ListKind) -> Result<(), AppError> {
    let store = open_store(config)?;
    let json = config.output == OutputFormat::Json;

    match kind {
        ListKind::Students => {
            let students = store.students();
            if json {
                print_json(&students);
            } else {
                for s in &students {
                    println!(
                        "{:>4}  {}  <{}>  book {}  group {}",
                        s.id, s.full_name, s.email, s.gradebook_number, s.group
                    );
                }
            }
        }
        ListKind::Teachers => {
            let teachers = store.teachers();
            if json {
                print_json(&teachers);
            } else {
                for t in &teachers {
                    println!(
                        "{:>4}  {}  <{}>  {}, {}",
                        t.id, t.full_name, t.email, t.position, t.department
                    );
                }
            }
        }
        ListKind::Accounts => {
            let accounts = store.accounts();
            if json {
                let rows: Vec<_> = accounts
                    .iter()
                    .map(|a| {
                        serde_json::json!({
                            "role": a.role().as_str(),
                            "id": a.id(),
                            "fullName": a.full_name(),
                            "email": a.email(),
                        })
                    })
                    .collect();
                print_json(&rows);
            } else {
                for a in &accounts {
                    println!("{:<8} {:>4}  {}  <{}>", a.role(), a.id(), a.full_name(), a.email());
                }
            }
        }
        ListKind::Disciplines => {
            let disciplines = store.disciplines();
            if json {
                print_json(&disciplines);
            } else {
                for d in &disciplines {
                    println!(
                        "{:>4}  {}  semester {}  ({})",
                        d.id, d.name, d.semester, d.assessment_type
                    );
                }
            }
        }
        ListKind::Groups => {
            let groups = store.groups();
            if json {
                print_json(&groups);
            } else {
                for g in &groups {
                    let members: Vec<String> =
                        g.student_ids().iter().map(|id| id.to_string()).collect();
                    println!(
                        "{:>4}  {}  {} ({})  students [{}]",
                        g.id,
                        g.name,
                        g.specialty,
                        g.enrollment_year,
                        members.join(", ")
                    );
                }
            }
        }
    }

    Ok(())
}

// =============================================================================
// FIND COMMAND
// =============================================================================

/// Build search criteria from command-line filters.
pub fn search_from_args(args: &FindArgs) -> Search {
    let mut search = Search::new();
    if let Some(name) = &args.student {
        search = search.student_name(name.as_str());
    }
    if let Some(name) = &args.discipline {
        search = search.discipline_name(name.as_str());
    }
    if let Some(semester) = args.semester {
        search = search.semester(semester);
    }
    if let Some(kind) = &args.assessment_type {
        search = search.assessment_type(kind.as_str());
    }
    search
}

/// One text line per grade, with student and discipline names resolved.
///
/// Names are indexed by id once; a later duplicate id wins, as in the search
/// join. Unknown ids are shown as `#id`.
pub fn describe_grades(store: &Store, grades: &[Grade]) -> Vec<String> {
    let students: BTreeMap<StudentId, String> = store
        .students()
        .into_iter()
        .map(|s| (s.id, s.full_name))
        .collect();
    let disciplines: BTreeMap<DisciplineId, String> = store
        .disciplines()
        .into_iter()
        .map(|d| (d.id, d.name))
        .collect();

    grades
        .iter()
        .map(|g| {
            let student = students
                .get(&g.student_id)
                .cloned()
                .unwrap_or_else(|| format!("student #{}", g.student_id));
            let discipline = disciplines
                .get(&g.discipline_id)
                .cloned()
                .unwrap_or_else(|| format!("discipline #{}", g.discipline_id));
            let comment = if g.comment.is_empty() {
                String::new()
            } else {
                format!("  \"{}\"", g.comment)
            };
            format!(
                "{:>4}  {}  {}  {:<10}  {}  /  {}{}",
                g.id, g.date, g.value, g.assessment_type, student, discipline, comment
            )
        })
        .collect()
}

/// Search grades.
pub fn cmd_find(config: &AppConfig, args: &FindArgs) -> Result<(), AppError> {
    let store = open_store(config)?;
    let search = search_from_args(args);
    let grades = store.find_grades(&search);

    tracing::debug!("Search {:?} matched {} grades", search, grades.len());

    if config.output == OutputFormat::Json {
        print_json(&grades);
        return Ok(());
    }

    if grades.is_empty() {
        println!("No grades found");
        return Ok(());
    }

    for line in describe_grades(&store, &grades) {
        println!("{}", line);
    }
    println!("{} grade(s)", grades.len());

    Ok(())
}

// =============================================================================
// REGISTRATION COMMANDS
// =============================================================================

/// Register a student.
pub fn cmd_add_student(config: &AppConfig, args: &StudentArgs) -> Result<(), AppError> {
    let mut store = open_store(config)?;
    let id = StudentId(args.id);
    if store.student_by_id(id).is_some() {
        return Err(duplicate("Student", args.id));
    }

    store.add_student(Student::new(
        id,
        args.name.as_str(),
        args.email.as_str(),
        args.password_hash.as_str(),
        args.gradebook_number.as_str(),
        args.group.as_str(),
    ))?;

    tracing::info!("Added student {}", id);
    println!("Added student {}: {}", id, args.name);
    Ok(())
}

/// Register a teacher.
pub fn cmd_add_teacher(config: &AppConfig, args: &TeacherArgs) -> Result<(), AppError> {
    let mut store = open_store(config)?;
    let id = TeacherId(args.id);
    if store.teacher_by_id(id).is_some() {
        return Err(duplicate("Teacher", args.id));
    }

    store.add_teacher(Teacher::new(
        id,
        args.name.as_str(),
        args.email.as_str(),
        args.password_hash.as_str(),
        args.department.as_str(),
        args.position.as_str(),
    ))?;

    tracing::info!("Added teacher {}", id);
    println!("Added teacher {}: {}", id, args.name);
    Ok(())
}

/// Register a discipline.
pub fn cmd_add_discipline(config: &AppConfig, args: &DisciplineArgs) -> Result<(), AppError> {
    let mut store = open_store(config)?;
    let id = DisciplineId(args.id);
    if store.discipline_by_id(id).is_some() {
        return Err(duplicate("Discipline", args.id));
    }
    check_assessment_type(&args.assessment_type);

    store.add_discipline(Discipline::new(
        id,
        args.name.as_str(),
        args.semester,
        args.assessment_type.as_str(),
    ))?;

    tracing::info!("Added discipline {}", id);
    println!("Added discipline {}: {}", id, args.name);
    Ok(())
}

/// Register a study group.
pub fn cmd_add_group(config: &AppConfig, args: &GroupArgs) -> Result<(), AppError> {
    let mut store = open_store(config)?;
    let id = GroupId(args.id);
    if store.group_by_id(id).is_some() {
        return Err(duplicate("Group", args.id));
    }

    store.add_group(Group::new(
        id,
        args.name.as_str(),
        args.specialty.as_str(),
        args.year,
    ))?;

    tracing::info!("Added group {}", id);
    println!("Added group {}: {}", id, args.name);
    Ok(())
}

/// Add a student to a group.
pub fn cmd_enroll(config: &AppConfig, group_id: u64, student_id: u64) -> Result<(), AppError> {
    let mut store = open_store(config)?;
    let student = StudentId(student_id);
    if store.student_by_id(student).is_none() {
        tracing::warn!("Student {} is not registered", student);
    }

    let group = store
        .group_mut(GroupId(group_id))
        .ok_or_else(|| AppError::not_found("Group", group_id))?;

    if !group.add_student(student) {
        println!("Student {} is already in group {}", student, group_id);
        return Ok(());
    }
    store.save()?;

    tracing::info!("Enrolled student {} in group {}", student, group_id);
    println!("Enrolled student {} in group {}", student, group_id);
    Ok(())
}

// =============================================================================
// GRADE COMMANDS
// =============================================================================

/// Record a grade under the next free id.
pub fn cmd_add_grade(config: &AppConfig, args: &GradeArgs) -> Result<(), AppError> {
    validate_grade_value(args.value)?;
    if let Some(date) = &args.date {
        validate_date(date)?;
    }
    check_assessment_type(&args.assessment_type);

    let mut store = open_store(config)?;
    let student = StudentId(args.student);
    let discipline = DisciplineId(args.discipline);
    let teacher = TeacherId(args.teacher);

    if store.student_by_id(student).is_none() {
        tracing::warn!("Grade refers to unknown student {}", student);
    }
    if store.discipline_by_id(discipline).is_none() {
        tracing::warn!("Grade refers to unknown discipline {}", discipline);
    }

    let id = store.next_grade_id();
    let mut grade = Grade::new(
        id,
        args.value,
        args.assessment_type.as_str(),
        student,
        discipline,
        teacher,
    )
    .with_comment(args.comment.as_str());
    if let Some(date) = &args.date {
        grade = grade.with_date(date.as_str());
    }

    match store.teacher_by_id(teacher) {
        Some(t) => store.submit_grade(&t, grade)?,
        None => {
            tracing::warn!("Grade refers to unknown teacher {}", teacher);
            store.add_grade(grade)?;
        }
    }

    tracing::info!("Added grade {}", id);
    if config.output == OutputFormat::Json {
        print_json(&serde_json::json!({ "id": id }));
    } else {
        println!("Added grade {}", id);
    }
    Ok(())
}

/// Delete a grade.
pub fn cmd_remove_grade(config: &AppConfig, id: u64) -> Result<(), AppError> {
    let mut store = open_store(config)?;
    if !store.remove_grade(GradeId(id))? {
        return Err(AppError::not_found("Grade", id));
    }

    tracing::info!("Removed grade {}", id);
    println!("Removed grade {}", id);
    Ok(())
}

/// Change a grade's value and comment.
pub fn cmd_edit_grade(
    config: &AppConfig,
    id: u64,
    value: u8,
    comment: &str,
) -> Result<(), AppError> {
    validate_grade_value(value)?;

    let mut store = open_store(config)?;
    if !store.edit_grade(GradeId(id), value, comment)? {
        return Err(AppError::not_found("Grade", id));
    }

    tracing::info!("Edited grade {}", id);
    println!("Updated grade {}", id);
    Ok(())
}

// =============================================================================
// RATING COMMAND
// =============================================================================

/// Show a student's mean grade.
pub fn cmd_rating(config: &AppConfig, student_id: u64) -> Result<(), AppError> {
    let store = open_store(config)?;
    let student = store
        .student_by_id(StudentId(student_id))
        .ok_or_else(|| AppError::not_found("Student", student_id))?;

    let rating = student_rating(&store, &student);

    if config.output == OutputFormat::Json {
        print_json(&serde_json::json!({
            "student_id": student.id,
            "full_name": student.full_name,
            "rating": rating.to_string(),
            "rating_hundredths": rating,
        }));
    } else {
        println!("{}: {}", student.full_name, rating);
    }
    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Open the configured store.
pub fn open_store(config: &AppConfig) -> Result<Store, AppError> {
    tracing::debug!("Opening data file {:?}", config.data_file);
    Ok(Store::open(&config.data_file)?)
}

/// Print a value as pretty JSON on stdout.
fn print_json(value: &impl Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}
