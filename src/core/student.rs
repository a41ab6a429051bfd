//! Student store - persistence operations over the `students` table.
//!
//! Every call round-trips to the database; there is no caching layer. Lookups
//! that find nothing return `None` or [`DeleteOutcome::NotFound`] rather than an error.

use crate::{
    core::{
        grade::{Grade, GradeSummary, Marks},
        id_generator::IdGenerator,
    },
    entities::{Student, student},
    errors::{Error, Result},
};
use chrono::{SubsecRound, Utc};
use sea_orm::{PaginatorTrait, QueryOrder, Set, SqlErr, prelude::*};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// A fully derived student ready to be stored: ID, name, marks, and grade fields together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradedStudent {
    /// Assigned student ID
    pub student_id: String,
    /// Student name as entered
    pub name: String,
    /// The validated marks
    pub marks: Marks,
    /// Sum of the marks
    pub total: i32,
    /// Truncated average
    pub average: i32,
    /// Letter grade
    pub grade: Grade,
}

impl GradedStudent {
    /// Combines validated marks with their summary under the given ID.
    #[must_use]
    pub const fn new(student_id: String, name: String, marks: Marks, summary: GradeSummary) -> Self {
        Self {
            student_id,
            name,
            marks,
            total: summary.total,
            average: summary.average,
            grade: summary.grade,
        }
    }
}

/// Result of deleting by student ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record existed and was removed
    Deleted,
    /// No record carried that ID
    NotFound,
}

/// Inserts a graded student, stamping `created_at` with the current time.
///
/// Fails with [`Error::DuplicateStudentId`] if the ID is already stored, whether that is
/// seen by the pre-check or by the UNIQUE index when two writers race.
#[instrument(skip(db, graded), fields(student_id = %graded.student_id))]
pub async fn insert_student(
    db: &DatabaseConnection,
    graded: &GradedStudent,
) -> Result<student::Model> {
    if get_student_by_id(db, &graded.student_id).await?.is_some() {
        warn!("Refusing to insert duplicate student ID");
        return Err(Error::DuplicateStudentId {
            student_id: graded.student_id.clone(),
        });
    }

    let [mark1, mark2, mark3, mark4, mark5] = graded.marks.0;
    let record = student::ActiveModel {
        student_id: Set(graded.student_id.clone()),
        name: Set(graded.name.clone()),
        mark1: Set(mark1),
        mark2: Set(mark2),
        mark3: Set(mark3),
        mark4: Set(mark4),
        mark5: Set(mark5),
        total: Set(graded.total),
        average: Set(graded.average),
        grade: Set(graded.grade.as_str().to_string()),
        // Microsecond precision survives the storage round trip unchanged.
        created_at: Set(Utc::now().trunc_subsecs(6)),
        ..Default::default()
    };

    let inserted = record.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::DuplicateStudentId {
            student_id: graded.student_id.clone(),
        },
        _ => Error::from(e),
    })?;

    info!("Student record inserted");
    Ok(inserted)
}

/// Retrieves every stored student, most recently created first.
pub async fn list_students(db: &DatabaseConnection) -> Result<Vec<student::Model>> {
    Student::find()
        .order_by_desc(student::Column::CreatedAt)
        .order_by_desc(student::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a student by public student ID.
pub async fn get_student_by_id(
    db: &DatabaseConnection,
    student_id: &str,
) -> Result<Option<student::Model>> {
    Student::find()
        .filter(student::Column::StudentId.eq(student_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Counts stored students.
pub async fn count_students(db: &DatabaseConnection) -> Result<u64> {
    Student::find().count(db).await.map_err(Into::into)
}

/// Deletes the student with the given ID. A missing ID is reported, not treated as an error.
#[instrument(skip(db))]
pub async fn delete_student(db: &DatabaseConnection, student_id: &str) -> Result<DeleteOutcome> {
    let result = Student::delete_many()
        .filter(student::Column::StudentId.eq(student_id))
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        info!("Student deleted");
        Ok(DeleteOutcome::Deleted)
    } else {
        debug!("No student to delete");
        Ok(DeleteOutcome::NotFound)
    }
}

/// Removes every student and resets the ID sequences. Returns the number of rows removed.
///
/// The sequences are only reset once the delete has succeeded.
#[instrument(skip(db, ids))]
pub async fn clear_students(db: &DatabaseConnection, ids: &IdGenerator) -> Result<u64> {
    let result = Student::delete_many().exec(db).await?;
    ids.reset();
    info!("Cleared {} student records", result.rows_affected);
    Ok(result.rows_affected)
}
