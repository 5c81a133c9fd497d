//! # Report Module
//!
//! Read-only helpers derived from `Store::find_grades`.
//!
//! A student's grades are found by name, the same way a caller would search
//! for them, so a name that is a substring of another student's name also
//! picks up that student's grades.

use crate::primitives::RATING_SCALE;
use crate::{Grade, Search, Store, Student};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Mean grade value in hundredths (`433` is 4.33).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct Rating(pub u64);

impl Rating {
    /// Mean of `values` rounded to two decimals; zero when empty.
    ///
    /// An exact tie goes to the even hundredth: 4.125 gives 4.12 and
    /// 4.375 gives 4.38.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = u8>) -> Self {
        let (sum, count) = values
            .into_iter()
            .fold((0u64, 0u64), |(sum, count), v| (sum + u64::from(v), count + 1));
        if count == 0 {
            return Self(0);
        }
        let scaled = sum * RATING_SCALE;
        let (quotient, remainder) = (scaled / count, scaled % count);
        let round_up = match (2 * remainder).cmp(&count) {
            Ordering::Greater => true,
            Ordering::Equal => quotient % 2 == 1,
            Ordering::Less => false,
        };
        Self(quotient + u64::from(round_up))
    }

    /// Hundredths value.
    #[must_use]
    pub const fn hundredths(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0 / RATING_SCALE,
            self.0 % RATING_SCALE
        )
    }
}

/// Grades of `student`, looked up by full name.
pub fn student_grades(store: &Store, student: &Student) -> Vec<Grade> {
    store.find_grades(&Search::new().student_name(student.full_name.as_str()))
}

/// Mean grade of `student`.
pub fn student_rating(store: &Store, student: &Student) -> Rating {
    Rating::from_values(student_grades(store, student).iter().map(|g| g.value))
}

// =============================================================================
// TESTS
// =============================================================================
