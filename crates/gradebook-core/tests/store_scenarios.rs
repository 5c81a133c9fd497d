//! # Store Scenario Tests
//!
//! End-to-end behaviour of a store opened from a seeded data file:
//! loading, searching, grade mutations and persistence.

use gradebook_core::{
    DisciplineId, Grade, GradeId, GradebookError, GroupId, Search, Store, StudentId, TeacherId,
    student_rating,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SEED: &str = r#"{
  "students": [
    {"id": 1, "fullName": "Арзамасов Сергей Дмитриевич", "email": "a@a.ru",
     "passwordHash": "h1", "graduateBookNumber": "23-001", "group": "САУ-23-1б"},
    {"id": 2, "fullName": "Иванова Мария Петровна", "email": "i@i.ru",
     "passwordHash": "h2", "graduateBookNumber": "23-002", "group": "САУ-23-1б"}
  ],
  "teachers": [
    {"id": 1, "fullName": "Русских Елена Романовна", "email": "r@r.ru",
     "passwordHash": "th1", "department": "Каф. ПИ", "position": "Доцент"}
  ],
  "disciplines": [
    {"id": 1, "name": "Программная инженерия", "semester": 4, "assessmentType": "экзамен"},
    {"id": 2, "name": "Базы данных", "semester": 3, "assessmentType": "зачёт"}
  ],
  "groups": [
    {"id": 1, "name": "САУ-23-1б", "specialty": "Автоматизация",
     "enrollmentYear": 2023, "studentIds": [1, 2]}
  ],
  "grades": [
    {"id": 1, "value": 5, "assessmentType": "экзамен", "date": "2024-06-15",
     "comment": "Отлично", "studentId": 1, "disciplineId": 1, "teacherId": 1},
    {"id": 2, "value": 4, "assessmentType": "зачёт", "date": "2024-06-18",
     "comment": "", "studentId": 2, "disciplineId": 2, "teacherId": 1},
    {"id": 3, "value": 3, "assessmentType": "экзамен", "date": "2024-06-15",
     "comment": "Удовл.", "studentId": 2, "disciplineId": 1, "teacherId": 1}
  ]
}"#;

fn seeded() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("test_data.json");
    std::fs::write(&path, SEED).expect("write seed");
    (dir, path)
}

fn open(path: &Path) -> Store {
    Store::open(path).expect("open store")
}

fn ids(grades: &[Grade]) -> Vec<u64> {
    grades.iter().map(|g| g.id.value()).collect()
}

// =============================================================================
// INITIALIZATION
// =============================================================================

mod init {
    use super::*;

    #[test]
    fn load_on_open() {
        let (_dir, path) = seeded();
        let store = open(&path);

        assert_eq!(store.students().len(), 2);
        assert_eq!(store.teachers().len(), 1);
        assert_eq!(store.disciplines().len(), 2);
        assert_eq!(store.groups().len(), 1);
        assert_eq!(store.counts().grades, 3);
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = open(&dir.path().join("new_data.json"));

        assert!(store.students().is_empty());
        assert!(store.find_grades(&Search::new()).is_empty());
    }

    #[test]
    fn malformed_file_fails_open() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"students\": [").expect("write");

        let result = Store::open(&path);
        assert!(matches!(result, Err(GradebookError::MalformedStore(_))));
    }

    #[test]
    fn hand_edited_null_date_and_comment_load() {
        let (_dir, path) = seeded();
        let edited = SEED.replace(
            r#""date": "2024-06-18",
     "comment": "","#,
            r#""date": null,
     "comment": null,"#,
        );
        assert_ne!(edited, SEED);
        std::fs::write(&path, edited).expect("write");

        let store = open(&path);
        let grade = store.grade_by_id(GradeId(2)).expect("grade 2");
        assert_eq!(grade.date, gradebook_core::records::today());
        assert_eq!(grade.comment, "");
    }

    #[test]
    fn unreadable_path_is_persistence_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A directory exists but cannot be read as a file.
        let result = Store::open(dir.path());
        assert!(matches!(result, Err(GradebookError::Persistence { .. })));
    }
}

// =============================================================================
// GRADE MUTATIONS
// =============================================================================

mod mutations {
    use super::*;

    fn new_grade(store: &Store, kind: &str) -> Grade {
        Grade::new(
            store.next_grade_id(),
            4,
            kind,
            StudentId(1),
            DisciplineId(2),
            TeacherId(1),
        )
    }

    #[test]
    fn add_grade_appends() {
        let (_dir, path) = seeded();
        let mut store = open(&path);
        let before = store.find_grades(&Search::new()).len();

        let grade = new_grade(&store, "КР");
        store.add_grade(grade).expect("add");

        assert_eq!(store.find_grades(&Search::new()).len(), before + 1);
    }

    #[test]
    fn added_grade_survives_reload() {
        let (_dir, path) = seeded();
        let mut store = open(&path);

        let grade = new_grade(&store, "практика").with_comment("Защита");
        assert_eq!(grade.id, GradeId(4));
        store.add_grade(grade.clone()).expect("add");

        let reloaded = open(&path);
        assert_eq!(reloaded.grade_by_id(GradeId(4)), Some(grade));
    }

    #[test]
    fn remove_present_grade() {
        let (_dir, path) = seeded();
        let mut store = open(&path);

        assert!(store.remove_grade(GradeId(1)).expect("remove"));
        assert_eq!(store.grade_by_id(GradeId(1)), None);
        assert_eq!(ids(&store.find_grades(&Search::new())), vec![2, 3]);
        assert_eq!(open(&path).counts().grades, 2);
    }

    #[test]
    fn remove_absent_grade() {
        let (_dir, path) = seeded();
        let mut store = open(&path);

        assert!(!store.remove_grade(GradeId(9999)).expect("remove"));
        assert_eq!(store.counts().grades, 3);
    }

    #[test]
    fn next_grade_id_after_seed() {
        let (_dir, path) = seeded();
        assert_eq!(open(&path).next_grade_id(), GradeId(4));
    }

    #[test]
    fn edit_grade_persists() {
        let (_dir, path) = seeded();
        let mut store = open(&path);

        assert!(store.edit_grade(GradeId(3), 4, "Пересдача").expect("edit"));

        let grade = open(&path).grade_by_id(GradeId(3)).expect("grade 3");
        assert_eq!(grade.value, 4);
        assert_eq!(grade.comment, "Пересдача");
        assert_eq!(grade.date, "2024-06-15");
    }

    #[test]
    fn edit_absent_grade() {
        let (_dir, path) = seeded();
        let mut store = open(&path);
        assert!(!store.edit_grade(GradeId(42), 5, "").expect("edit"));
    }

    #[test]
    fn submit_grade_stamps_teacher() {
        let (_dir, path) = seeded();
        let mut store = open(&path);
        let teacher = store.teacher_by_id(TeacherId(1)).expect("teacher");

        let grade = Grade::new(
            store.next_grade_id(),
            5,
            "экзамен",
            StudentId(1),
            DisciplineId(1),
            TeacherId(99),
        );
        store.submit_grade(&teacher, grade).expect("submit");

        let stored = store.grade_by_id(GradeId(4)).expect("grade 4");
        assert_eq!(stored.teacher_id, TeacherId(1));
    }

    #[test]
    fn group_enrollment_through_group_mut() {
        let (_dir, path) = seeded();
        let mut store = open(&path);

        let group = store.group_mut(GroupId(1)).expect("group");
        assert!(!group.add_student(StudentId(2)));
        assert!(group.add_student(StudentId(3)));
        store.save().expect("save");

        let group = open(&path).group_by_id(GroupId(1)).expect("group");
        assert_eq!(
            group.student_ids(),
            &[StudentId(1), StudentId(2), StudentId(3)]
        );
    }
}

// =============================================================================
// FIND GRADES
// =============================================================================

mod find {
    use super::*;

    #[test]
    fn find_all_in_storage_order() {
        let (_dir, path) = seeded();
        assert_eq!(ids(&open(&path).find_grades(&Search::new())), vec![1, 2, 3]);
    }

    #[test]
    fn by_student_name() {
        let (_dir, path) = seeded();
        let grades = open(&path).find_grades(&Search::new().student_name("Арзамасов"));
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].student_id, StudentId(1));
    }

    #[test]
    fn by_student_name_case_insensitive() {
        let (_dir, path) = seeded();
        let grades = open(&path).find_grades(&Search::new().student_name("арзамасов"));
        assert_eq!(grades.len(), 1);
    }

    #[test]
    fn by_discipline() {
        let (_dir, path) = seeded();
        let grades =
            open(&path).find_grades(&Search::new().discipline_name("Программная инженерия"));
        assert_eq!(ids(&grades), vec![1, 3]);
    }

    #[test]
    fn by_semester() {
        let (_dir, path) = seeded();
        let grades = open(&path).find_grades(&Search::new().semester(3));
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].discipline_id, DisciplineId(2));
    }

    #[test]
    fn by_assessment_type_case_insensitive() {
        let (_dir, path) = seeded();
        let store = open(&path);
        assert_eq!(store.find_grades(&Search::new().assessment_type("экзамен")).len(), 2);
        assert_eq!(store.find_grades(&Search::new().assessment_type("ЭКЗАМЕН")).len(), 2);
    }

    #[test]
    fn latin_assessment_type_case_insensitive() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = open(&dir.path().join("data.json"));
        for kind in ["exam", "Exam", "coursework"] {
            let grade = Grade::new(
                store.next_grade_id(),
                5,
                kind,
                StudentId(1),
                DisciplineId(1),
                TeacherId(1),
            );
            store.add_grade(grade).expect("add");
        }

        let grades = store.find_grades(&Search::new().assessment_type("EXAM"));
        assert_eq!(ids(&grades), vec![1, 2]);
    }

    #[test]
    fn combined_filters() {
        let (_dir, path) = seeded();
        let grades = open(&path).find_grades(
            &Search::new()
                .student_name("Иванова")
                .assessment_type("зачёт"),
        );
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].value, 4);
    }

    #[test]
    fn no_match() {
        let (_dir, path) = seeded();
        let grades = open(&path).find_grades(&Search::new().student_name("Несуществующий"));
        assert!(grades.is_empty());
    }

    #[test]
    fn dangling_references_are_tolerated() {
        let (_dir, path) = seeded();
        let mut store = open(&path);
        let orphan = Grade::new(
            store.next_grade_id(),
            2,
            "экзамен",
            StudentId(404),
            DisciplineId(404),
            TeacherId(404),
        );
        store.add_grade(orphan).expect("add");

        assert_eq!(store.find_grades(&Search::new()).len(), 4);
        assert_eq!(store.find_grades(&Search::new().assessment_type("экзамен")).len(), 3);
        assert_eq!(store.find_grades(&Search::new().semester(4)).len(), 2);
        assert_eq!(store.find_grades(&Search::new().student_name("а")).len(), 3);
    }
}

// =============================================================================
// PERSISTENCE & LOOKUP
// =============================================================================

mod persistence {
    use super::*;

    #[test]
    fn save_load_roundtrip() {
        let (dir, path) = seeded();
        let store = open(&path);
        let copy = dir.path().join("output.json");

        store.save_to(&copy).expect("save");
        let restored = open(&copy);

        assert_eq!(restored.dataset(), store.dataset());
        assert_eq!(restored.find_grades(&Search::new()).len(), 3);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("sub").join("data.json");

        open(&nested).save().expect("save");
        assert!(nested.exists());
    }

    #[test]
    fn load_from_replaces_state() {
        let (dir, path) = seeded();
        let mut store = open(&path);
        let other = dir.path().join("other.json");
        std::fs::write(
            &other,
            r#"{"students": [], "teachers": [], "disciplines": [], "grades": [], "groups": []}"#,
        )
        .expect("write");

        store.load_from(&other).expect("load");

        assert!(store.find_grades(&Search::new()).is_empty());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn failed_load_keeps_state() {
        let (dir, path) = seeded();
        let mut store = open(&path);
        let other = dir.path().join("bad.json");
        std::fs::write(&other, "[]").expect("write");

        assert!(store.load_from(&other).is_err());
        assert_eq!(store.counts().grades, 3);
    }

    #[test]
    fn lookups_by_id() {
        let (_dir, path) = seeded();
        let store = open(&path);

        let student = store.student_by_id(StudentId(1)).expect("student");
        assert_eq!(student.full_name, "Арзамасов Сергей Дмитриевич");
        assert_eq!(
            store.teacher_by_id(TeacherId(1)).map(|t| t.full_name),
            Some("Русских Елена Романовна".to_string())
        );
        assert_eq!(
            store.discipline_by_id(DisciplineId(1)).map(|d| d.name),
            Some("Программная инженерия".to_string())
        );
        assert_eq!(store.grade_by_id(GradeId(2)).map(|g| g.value), Some(4));
        assert_eq!(store.teachers()[0].position, "Доцент");
        assert_eq!(store.groups()[0].name, "САУ-23-1б");

        assert_eq!(store.student_by_id(StudentId(9999)), None);
        assert_eq!(store.teacher_by_id(TeacherId(9999)), None);
        assert_eq!(store.discipline_by_id(DisciplineId(9999)), None);
        assert_eq!(store.grade_by_id(GradeId(9999)), None);
        assert_eq!(store.group_by_id(GroupId(9999)), None);
    }

    #[test]
    fn rating_from_seed() {
        let (_dir, path) = seeded();
        let store = open(&path);
        let student = store.student_by_id(StudentId(2)).expect("student");

        assert_eq!(student_rating(&store, &student).to_string(), "3.50");
    }
}
