//! Grade calculation - pure derivation of total, average, and letter grade.
//!
//! Nothing here touches storage. Validation is all-or-nothing: if any of the five
//! marks is out of range the whole set is rejected without saying which one.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest accepted mark.
pub const MIN_MARK: i32 = 0;
/// Highest accepted mark.
pub const MAX_MARK: i32 = 100;
/// Number of subjects per student.
pub const SUBJECT_COUNT: usize = 5;
/// Stand-in for a mark that could not be parsed; always fails validation.
pub const UNPARSEABLE_MARK: i32 = -1;

/// Parses one raw mark as typed by a user, falling back to [`UNPARSEABLE_MARK`].
#[must_use]
pub fn parse_mark(value: Option<&str>) -> i32 {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(UNPARSEABLE_MARK)
}

/// Raw, unvalidated marks for the five subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marks(pub [i32; SUBJECT_COUNT]);

impl Marks {
    /// Builds a mark set in subject order.
    #[must_use]
    pub const fn new(mark1: i32, mark2: i32, mark3: i32, mark4: i32, mark5: i32) -> Self {
        Self([mark1, mark2, mark3, mark4, mark5])
    }

    /// Checks every mark against `[MIN_MARK, MAX_MARK]`.
    pub fn validate(&self) -> Result<()> {
        if self.0.iter().all(|m| (MIN_MARK..=MAX_MARK).contains(m)) {
            Ok(())
        } else {
            Err(Error::InvalidMarks)
        }
    }

    /// Sum of all five marks. Only meaningful after [`Marks::validate`].
    #[must_use]
    pub fn total(&self) -> i32 {
        self.0.iter().sum()
    }
}

/// Letter grade, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    /// average >= 90
    A,
    /// 75..=89
    B,
    /// 60..=74
    C,
    /// 40..=59
    D,
    /// below 40
    F,
}

impl Grade {
    /// Maps a truncated average onto its letter. Thresholds are checked top-down.
    #[must_use]
    pub const fn from_average(average: i32) -> Self {
        if average >= 90 {
            Self::A
        } else if average >= 75 {
            Self::B
        } else if average >= 60 {
            Self::C
        } else if average >= 40 {
            Self::D
        } else {
            Self::F
        }
    }

    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The values derived from a valid mark set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeSummary {
    /// Sum of the marks (0..=500)
    pub total: i32,
    /// `total / 5`, truncated toward zero
    pub average: i32,
    /// Letter derived from `average`
    pub grade: Grade,
}

/// Validates `marks` and derives total, average, and grade.
///
/// # Errors
/// Returns [`Error::InvalidMarks`] if any mark lies outside `[0, 100]`.
pub fn calculate_grade(marks: &Marks) -> Result<GradeSummary> {
    marks.validate()?;

    let total = marks.total();
    // Integer division truncates; the average is never rounded.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let average = total / SUBJECT_COUNT as i32;

    Ok(GradeSummary {
        total,
        average,
        grade: Grade::from_average(average),
    })
}
