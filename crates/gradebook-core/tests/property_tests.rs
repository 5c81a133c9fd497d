//! # Property-Based Tests
//!
//! Invariants of the store checked with proptest:
//! round-trip through the data file, id allocation, removal, and search.

use gradebook_core::{
    Dataset, Discipline, DisciplineId, Grade, GradeId, Group, GroupId, Search, Store, Student,
    StudentId, Teacher, TeacherId,
};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeSet;

// =============================================================================
// STRATEGIES
// =============================================================================

/// Short text mixing Latin, Cyrillic and punctuation.
fn text() -> impl Strategy<Value = String> {
    "[a-zA-Zа-яА-ЯёЁ0-9 .,-]{0,16}"
}

fn student() -> impl Strategy<Value = Student> {
    (0u64..50, text(), text(), text(), text(), text()).prop_map(
        |(id, name, email, hash, book, group)| {
            Student::new(StudentId(id), name, email, hash, book, group)
        },
    )
}

fn teacher() -> impl Strategy<Value = Teacher> {
    (0u64..50, text(), text(), text(), text(), text()).prop_map(
        |(id, name, email, hash, department, position)| {
            Teacher::new(TeacherId(id), name, email, hash, department, position)
        },
    )
}

fn discipline() -> impl Strategy<Value = Discipline> {
    (0u64..20, text(), 1u32..12, text())
        .prop_map(|(id, name, semester, kind)| Discipline::new(DisciplineId(id), name, semester, kind))
}

fn grade() -> impl Strategy<Value = Grade> {
    (
        0u64..1000,
        2u8..=5,
        text(),
        "20[0-9]{2}-(0[1-9]|1[0-2])-(0[1-9]|1[0-9]|2[0-8])",
        text(),
        (0u64..60, 0u64..25, 0u64..60),
    )
        .prop_map(|(id, value, kind, date, comment, (s, d, t))| {
            Grade::new(
                GradeId(id),
                value,
                kind,
                StudentId(s),
                DisciplineId(d),
                TeacherId(t),
            )
            .with_date(date)
            .with_comment(comment)
        })
}

fn group() -> impl Strategy<Value = Group> {
    (0u64..10, text(), text(), 1990i32..2030, vec(0u64..50, 0..8)).prop_map(
        |(id, name, specialty, year, members)| {
            Group::new(GroupId(id), name, specialty, year)
                .with_students(members.into_iter().map(StudentId).collect())
        },
    )
}

fn dataset() -> impl Strategy<Value = Dataset> {
    (
        vec(student(), 0..6),
        vec(teacher(), 0..4),
        vec(discipline(), 0..6),
        vec(grade(), 0..12),
        vec(group(), 0..3),
    )
        .prop_map(|(students, teachers, disciplines, grades, groups)| Dataset {
            students,
            teachers,
            disciplines,
            grades,
            groups,
        })
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Saving and reopening reproduces every collection exactly.
    #[test]
    fn save_then_open_roundtrips(data in dataset()) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.json");

        let store = Store::with_dataset(&path, data.clone());
        store.save().expect("save");
        let reopened = Store::open(&path).expect("open");

        prop_assert_eq!(reopened.dataset(), &data);
    }

    /// The allocated id is one past the maximum and never collides.
    #[test]
    fn next_grade_id_never_collides(data in dataset()) {
        let store = Store::with_dataset("unused.json", data.clone());
        let next = store.next_grade_id();

        match data.grades.iter().map(|g| g.id).max() {
            Some(max) => prop_assert_eq!(next, GradeId(max.value() + 1)),
            None => prop_assert_eq!(next, GradeId(1)),
        }
        prop_assert!(data.grades.iter().all(|g| g.id != next));
    }

    /// An unconstrained search returns every grade in storage order.
    #[test]
    fn empty_search_returns_everything(data in dataset()) {
        let store = Store::with_dataset("unused.json", data.clone());
        prop_assert_eq!(store.find_grades(&Search::new()), data.grades);
    }

    /// A student-name search returns exactly the grades whose joined
    /// student name contains the needle, ignoring case.
    #[test]
    fn student_name_filter_is_exact(data in dataset(), pick in any::<prop::sample::Index>(), upper in any::<bool>()) {
        prop_assume!(!data.students.is_empty());
        let source = &data.students[pick.index(data.students.len())].full_name;
        let needle: String = source.chars().take(3).collect();
        let needle = if upper { needle.to_uppercase() } else { needle.to_lowercase() };

        let store = Store::with_dataset("unused.json", data.clone());
        let found = store.find_grades(&Search::new().student_name(needle.clone()));

        // Last record wins for duplicate ids, as in the join index.
        let name_of = |id: StudentId| {
            data.students.iter().rev().find(|s| s.id == id).map_or(String::new(), |s| s.full_name.to_lowercase())
        };
        let expected: Vec<Grade> = data
            .grades
            .iter()
            .filter(|g| needle.is_empty() || name_of(g.student_id).contains(&needle.to_lowercase()))
            .cloned()
            .collect();
        prop_assert_eq!(found, expected);
    }

    /// Removing a present id erases every grade with it; an absent id changes nothing.
    #[test]
    fn remove_grade_semantics(data in dataset(), target in 0u64..1000) {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = Store::with_dataset(dir.path().join("data.json"), data.clone());
        let id = GradeId(target);
        let present = data.grades.iter().any(|g| g.id == id);

        let removed = store.remove_grade(id).expect("remove");

        prop_assert_eq!(removed, present);
        let expected: Vec<Grade> = data.grades.iter().filter(|g| g.id != id).cloned().collect();
        prop_assert_eq!(store.dataset().grades.clone(), expected);
        prop_assert!(!store.remove_grade(id).expect("second remove"));
    }

    /// Adding the same student repeatedly keeps a single membership.
    #[test]
    fn group_add_student_idempotent(members in vec(0u64..20, 0..30)) {
        let mut group = Group::new(GroupId(1), "G", "S", 2023);
        for &m in &members {
            group.add_student(StudentId(m));
            group.add_student(StudentId(m));
        }

        let unique: BTreeSet<u64> = members.iter().copied().collect();
        prop_assert_eq!(group.student_ids().len(), unique.len());
    }
}
