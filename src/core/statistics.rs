//! Aggregate statistics over stored students.
//!
//! Pure functions over a slice of records; the service feeds them from a fail-soft read.

use crate::entities::student;
use serde::Serialize;
use std::collections::BTreeMap;

/// Grade reported as the top grade when there are no students.
pub const EMPTY_TOP_GRADE: &str = "F";

/// Read-only aggregate view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Number of students
    pub total_students: usize,
    /// Mean of the per-student averages, rounded half-up
    pub average_grade: i64,
    /// Lexically greatest grade letter present
    pub top_grade: String,
    /// Count of students per grade letter, only letters that occur
    pub grade_distribution: BTreeMap<String, u64>,
}

/// Builds statistics for `students`.
///
/// `top_grade` compares letters as strings, so `"F"` outranks `"A"` when both occur.
#[must_use]
pub fn summarize(students: &[student::Model]) -> Statistics {
    let mut grade_distribution = BTreeMap::new();
    for s in students {
        *grade_distribution.entry(s.grade.clone()).or_insert(0) += 1;
    }

    let top_grade = students
        .iter()
        .map(|s| s.grade.as_str())
        .max()
        .unwrap_or(EMPTY_TOP_GRADE)
        .to_string();

    Statistics {
        total_students: students.len(),
        average_grade: mean_of_averages(students),
        top_grade,
        grade_distribution,
    }
}

/// Rounded mean of the `average` column, `0` when empty.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn mean_of_averages(students: &[student::Model]) -> i64 {
    if students.is_empty() {
        return 0;
    }
    let sum: i64 = students.iter().map(|s| i64::from(s.average)).sum();
    // Averages are non-negative, so half-away-from-zero is half-up.
    (sum as f64 / students.len() as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(student_id: &str, average: i32, grade: &str) -> student::Model {
        student::Model {
            id: 0,
            student_id: student_id.to_string(),
            name: "Test".to_string(),
            mark1: average,
            mark2: average,
            mark3: average,
            mark4: average,
            mark5: average,
            total: average * 5,
            average,
            grade: grade.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_statistics() {
        let stats = summarize(&[]);
        assert_eq!(stats.total_students, 0);
        assert_eq!(stats.average_grade, 0);
        assert_eq!(stats.top_grade, "F");
        assert!(stats.grade_distribution.is_empty());
    }

    #[test]
    fn test_distribution_and_mean() {
        let students = [
            record("A001", 90, "A"),
            record("B001", 91, "A"),
            record("C001", 60, "C"),
        ];
        let stats = summarize(&students);

        assert_eq!(stats.total_students, 3);
        // 241 / 3 = 80.33
        assert_eq!(stats.average_grade, 80);
        assert_eq!(stats.grade_distribution.get("A"), Some(&2));
        assert_eq!(stats.grade_distribution.get("C"), Some(&1));
        assert_eq!(stats.grade_distribution.get("B"), None);
    }

    #[test]
    fn test_mean_rounds_half_up() {
        let students = [record("A001", 80, "B"), record("B001", 81, "B")];
        assert_eq!(summarize(&students).average_grade, 81);
    }

    #[test]
    fn test_top_grade_is_lexical_maximum() {
        let students = [record("A001", 95, "A"), record("B001", 78, "B")];
        assert_eq!(summarize(&students).top_grade, "B");

        let with_fail = [record("A001", 95, "A"), record("F001", 10, "F")];
        assert_eq!(summarize(&with_fail).top_grade, "F");
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let stats = summarize(&[record("A001", 95, "A")]);
        let json = serde_json::to_value(&stats).unwrap_or_default();
        assert_eq!(json["totalStudents"], 1);
        assert_eq!(json["averageGrade"], 95);
        assert_eq!(json["topGrade"], "A");
        assert_eq!(json["gradeDistribution"]["A"], 1);
    }
}
