//! Grade service - orchestrates validation, grading, ID assignment, and storage.
//!
//! Validation failures stop the pipeline before an ID is consumed or anything is
//! written. Storage failures do not: the caller still gets the computed grade, with
//! a [`PersistenceStatus`] saying whether the record was actually saved.

use crate::{
    core::{
        grade::{Marks, calculate_grade},
        id_generator::IdGenerator,
        statistics::{self, Statistics},
        student::{self, DeleteOutcome, GradedStudent},
    },
    entities::student as student_entity,
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// What happened when the graded record was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceStatus {
    /// The record is stored
    Saved,
    /// Another record already holds the student ID
    AlreadyExists,
    /// The store reported an error
    Failed {
        /// Store error text
        reason: String,
    },
}

/// A graded student plus the outcome of storing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeOutcome {
    /// The computed record, returned even when storing it failed
    pub student: GradedStudent,
    /// Whether the record reached the store
    pub status: PersistenceStatus,
}

impl GradeOutcome {
    /// `true` when the record was stored.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.status == PersistenceStatus::Saved
    }

    /// Human-readable persistence message for display.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.status {
            PersistenceStatus::Saved => format!(
                "Student record inserted successfully with ID: {}",
                self.student.student_id
            ),
            PersistenceStatus::AlreadyExists => format!(
                "Error inserting student record: ID {} already exists",
                self.student.student_id
            ),
            PersistenceStatus::Failed { reason } => {
                format!("Error inserting student record: {reason}")
            }
        }
    }
}

/// Summary of a best-effort bulk delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDeleteSummary {
    /// Number of records removed
    pub deleted: usize,
    /// IDs that matched no record
    pub not_found: Vec<String>,
    /// IDs whose delete failed in the store
    pub failed: Vec<String>,
}

/// Entry point shared by the HTTP and console front ends.
#[derive(Debug, Clone)]
pub struct GradeService {
    db: Arc<DatabaseConnection>,
    ids: Arc<IdGenerator>,
}

impl GradeService {
    /// Creates a service with a fresh ID generator.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_id_generator(db, Arc::new(IdGenerator::new()))
    }

    /// Creates a service around an existing generator.
    #[must_use]
    pub fn with_id_generator(db: DatabaseConnection, ids: Arc<IdGenerator>) -> Self {
        Self {
            db: Arc::new(db),
            ids,
        }
    }

    /// The ID generator used for new students.
    #[must_use]
    pub fn id_generator(&self) -> &IdGenerator {
        &self.ids
    }

    /// Validates, grades, assigns an ID, and stores a new student.
    ///
    /// # Errors
    /// Only [`Error::InvalidMarks`]. Storage problems are reported in the outcome.
    #[instrument(skip(self))]
    pub async fn process_new_student(&self, name: &str, marks: Marks) -> Result<GradeOutcome> {
        let summary = calculate_grade(&marks).inspect_err(|e| warn!("Rejected marks: {}", e))?;
        let student_id = self.ids.generate(name);
        let graded = GradedStudent::new(student_id, name.to_string(), marks, summary);
        Ok(self.persist(graded).await)
    }

    /// Replaces the record stored under `student_id`, keeping the ID.
    ///
    /// Marks are validated before anything is deleted, so an invalid update leaves the
    /// existing record in place; this reverses the delete-then-recreate order in which a
    /// rejected update would lose the record. A missing record is simply created (upsert).
    /// No ID sequence number is consumed.
    ///
    /// # Errors
    /// Only [`Error::InvalidMarks`]. Storage problems are reported in the outcome.
    #[instrument(skip(self))]
    pub async fn update_student(
        &self,
        student_id: &str,
        name: &str,
        marks: Marks,
    ) -> Result<GradeOutcome> {
        let summary = calculate_grade(&marks).inspect_err(|e| warn!("Rejected marks: {}", e))?;

        match student::delete_student(&self.db, student_id).await {
            Ok(DeleteOutcome::Deleted) => info!("Replacing existing record"),
            Ok(DeleteOutcome::NotFound) => info!("No existing record, update acts as insert"),
            Err(e) => error!("Failed to delete record before update: {}", e),
        }

        let graded = GradedStudent::new(student_id.to_string(), name.to_string(), marks, summary);
        Ok(self.persist(graded).await)
    }

    async fn persist(&self, graded: GradedStudent) -> GradeOutcome {
        let status = match student::insert_student(&self.db, &graded).await {
            Ok(_) => PersistenceStatus::Saved,
            Err(Error::DuplicateStudentId { .. }) => PersistenceStatus::AlreadyExists,
            Err(e) => {
                error!("Failed to store graded student: {}", e);
                PersistenceStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };
        GradeOutcome {
            student: graded,
            status,
        }
    }

    /// Looks up one student.
    pub async fn get_student(&self, student_id: &str) -> Result<Option<student_entity::Model>> {
        student::get_student_by_id(&self.db, student_id).await
    }

    /// Deletes one student.
    pub async fn delete_student(&self, student_id: &str) -> Result<DeleteOutcome> {
        student::delete_student(&self.db, student_id).await
    }

    /// Deletes everything and resets the ID sequences.
    pub async fn clear_students(&self) -> Result<u64> {
        student::clear_students(&self.db, &self.ids).await
    }

    /// Deletes each ID independently. Blank IDs are skipped; failures never abort the batch.
    #[instrument(skip(self, student_ids))]
    pub async fn bulk_delete<'a, I>(&self, student_ids: I) -> BulkDeleteSummary
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut summary = BulkDeleteSummary::default();
        for student_id in student_ids.into_iter().map(str::trim).filter(|id| !id.is_empty()) {
            match student::delete_student(&self.db, student_id).await {
                Ok(DeleteOutcome::Deleted) => summary.deleted += 1,
                Ok(DeleteOutcome::NotFound) => summary.not_found.push(student_id.to_string()),
                Err(e) => {
                    error!("Bulk delete of {} failed: {}", student_id, e);
                    summary.failed.push(student_id.to_string());
                }
            }
        }
        info!(
            "Bulk delete finished: {} deleted, {} not found, {} failed",
            summary.deleted,
            summary.not_found.len(),
            summary.failed.len()
        );
        summary
    }

    /// Every student, newest first. A store failure is logged and yields an empty list.
    pub async fn all_students(&self) -> Vec<student_entity::Model> {
        student::list_students(&self.db).await.unwrap_or_else(|e| {
            error!("Error retrieving students: {}", e);
            Vec::new()
        })
    }

    /// Number of stored students. A store failure is logged and yields zero.
    pub async fn student_count(&self) -> u64 {
        student::count_students(&self.db).await.unwrap_or_else(|e| {
            error!("Error counting students: {}", e);
            0
        })
    }

    /// Aggregate view over all students, built from the fail-soft list.
    pub async fn statistics(&self) -> Statistics {
        statistics::summarize(&self.all_students().await)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::grade::Grade;
    use crate::core::id_generator::FALLBACK_STUDENT_ID;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_process_new_student_stores_record() -> Result<()> {
        init_test_tracing();
        let service = setup_test_service().await?;

        let outcome = service
            .process_new_student("Jane Doe", Marks::new(95, 87, 93, 88, 91))
            .await?;

        assert!(outcome.is_saved());
        assert_eq!(outcome.student.student_id, "JD001");
        assert_eq!(outcome.student.total, 454);
        assert_eq!(outcome.student.average, 90);
        assert_eq!(outcome.student.grade, Grade::A);
        assert_eq!(
            outcome.message(),
            "Student record inserted successfully with ID: JD001"
        );

        let stored = service.get_student("JD001").await?.unwrap();
        assert_eq!(stored.name, "Jane Doe");
        assert_eq!(stored.total, 454);
        assert_eq!(stored.grade, "A");

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_marks_touch_nothing() -> Result<()> {
        let service = setup_test_service().await?;

        let result = service
            .process_new_student("Student 3", Marks::new(-5, 85, 90, 88, 92))
            .await;
        assert!(matches!(result, Err(Error::InvalidMarks)));

        assert_eq!(service.student_count().await, 0);
        // No sequence number was consumed for the rejected student
        assert_eq!(service.id_generator().generate("Student 3"), "S3001");

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_marks_never_reach_the_database() {
        // The mock has no queued results, so any query would fail the call differently.
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let service = GradeService::new(db);

        let result = service
            .process_new_student("Anyone", Marks::new(50, 50, 101, 50, 50))
            .await;
        assert!(matches!(result, Err(Error::InvalidMarks)));
    }

    #[tokio::test]
    async fn test_shared_initials_get_sequential_ids() -> Result<()> {
        let service = setup_test_service().await?;

        let first = service
            .process_new_student("Jane Doe", Marks([70; 5]))
            .await?;
        let second = service
            .process_new_student("Jane Davis", Marks([70; 5]))
            .await?;

        assert_eq!(first.student.student_id, "JD001");
        assert_eq!(second.student.student_id, "JD002");
        assert!(second.is_saved());
        assert_eq!(service.student_count().await, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_repeated_blank_names_collide_on_fallback_id() -> Result<()> {
        // The fallback ID is not sequenced, so the second blank-name student
        // computes a grade but is not stored.
        let service = setup_test_service().await?;

        let first = service.process_new_student("", Marks([80; 5])).await?;
        let second = service.process_new_student("  ", Marks([30; 5])).await?;

        assert_eq!(first.student.student_id, FALLBACK_STUDENT_ID);
        assert!(first.is_saved());

        assert_eq!(second.student.student_id, FALLBACK_STUDENT_ID);
        assert_eq!(second.status, PersistenceStatus::AlreadyExists);
        assert_eq!(second.student.grade, Grade::F);
        assert_eq!(service.student_count().await, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_store_failure_still_returns_grade() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_errors([sea_orm::DbErr::Custom("disk unavailable".to_string())])
            .into_connection();
        let service = GradeService::new(db);

        let outcome = service
            .process_new_student("Jane Doe", Marks::new(60, 45, 55, 65, 59))
            .await
            .unwrap();

        assert_eq!(outcome.student.total, 284);
        assert_eq!(outcome.student.average, 56);
        assert_eq!(outcome.student.grade, Grade::D);
        assert!(matches!(outcome.status, PersistenceStatus::Failed { .. }));
        assert!(outcome.message().contains("disk unavailable"));
    }

    #[tokio::test]
    async fn test_reads_fail_soft() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_errors([
                sea_orm::DbErr::Custom("gone".to_string()),
                sea_orm::DbErr::Custom("gone".to_string()),
            ])
            .into_connection();
        let service = GradeService::new(db);

        assert!(service.all_students().await.is_empty());
        assert_eq!(service.student_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_replaces_fields() -> Result<()> {
        let service = setup_test_service().await?;
        service
            .process_new_student("Jane Doe", Marks([50; 5]))
            .await?;

        let outcome = service
            .update_student("JD001", "Jane Q Doe", Marks([95; 5]))
            .await?;

        assert!(outcome.is_saved());
        assert_eq!(outcome.student.student_id, "JD001");
        assert_eq!(outcome.student.grade, Grade::A);

        let stored = service.get_student("JD001").await?.unwrap();
        assert_eq!(stored.name, "Jane Q Doe");
        assert_eq!(stored.average, 95);
        assert_eq!(service.student_count().await, 1);

        // The update did not advance the JD sequence
        assert_eq!(service.id_generator().generate("John Doe"), "JD002");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_of_missing_id_acts_as_insert() -> Result<()> {
        let service = setup_test_service().await?;

        let outcome = service
            .update_student("ZZ042", "Zoe Zed", Marks([65; 5]))
            .await?;

        assert!(outcome.is_saved());
        assert_eq!(service.get_student("ZZ042").await?.unwrap().grade, "C");

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_update_keeps_existing_record() -> Result<()> {
        let service = setup_test_service().await?;
        service
            .process_new_student("Jane Doe", Marks([50; 5]))
            .await?;

        let result = service
            .update_student("JD001", "Jane Doe", Marks::new(50, 50, 50, 50, -1))
            .await;
        assert!(matches!(result, Err(Error::InvalidMarks)));

        let stored = service.get_student("JD001").await?.unwrap();
        assert_eq!(stored.average, 50);

        Ok(())
    }

    #[tokio::test]
    async fn test_bulk_delete_counts_only_real_deletes() -> Result<()> {
        let service = setup_test_service().await?;
        service.process_new_student("Ann Lee", Marks([70; 5])).await?;
        service.process_new_student("Ben Ray", Marks([70; 5])).await?;
        service.process_new_student("Cy Oz", Marks([70; 5])).await?;

        let summary = service
            .bulk_delete(["AL001", " BR001 ", "", "XX001"])
            .await;

        assert_eq!(summary.deleted, 2);
        assert_eq!(summary.not_found, vec!["XX001".to_string()]);
        assert!(summary.failed.is_empty());
        assert_eq!(service.student_count().await, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_restarts_sequences() -> Result<()> {
        let service = setup_test_service().await?;
        service.process_new_student("Jane Doe", Marks([70; 5])).await?;
        service.process_new_student("Jane Doe", Marks([70; 5])).await?;

        assert_eq!(service.clear_students().await?, 2);

        let outcome = service.process_new_student("Jane Doe", Marks([70; 5])).await?;
        assert_eq!(outcome.student.student_id, "JD001");
        assert!(outcome.is_saved());

        Ok(())
    }

    #[tokio::test]
    async fn test_sequences_not_reused_after_single_delete() -> Result<()> {
        let service = setup_test_service().await?;
        service.process_new_student("Jane Doe", Marks([70; 5])).await?;
        service.delete_student("JD001").await?;

        let outcome = service.process_new_student("Jane Doe", Marks([70; 5])).await?;
        assert_eq!(outcome.student.student_id, "JD002");

        Ok(())
    }

    #[tokio::test]
    async fn test_cloned_service_shares_store_and_sequences() -> Result<()> {
        let service = setup_test_service().await?;
        let clone = service.clone();

        clone.process_new_student("Jane Doe", Marks([70; 5])).await?;
        assert_eq!(service.student_count().await, 1);

        let outcome = service.process_new_student("Jane Davis", Marks([70; 5])).await?;
        assert_eq!(outcome.student.student_id, "JD002");
        assert_eq!(clone.student_count().await, 2);

        Ok(())
    }
}
