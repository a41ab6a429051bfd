//! Shared test utilities.
//!
//! Helpers for setting up in-memory databases and building records with
//! sensible defaults.

use crate::{
    core::{
        grade::{Marks, calculate_grade},
        service::GradeService,
        student::GradedStudent,
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all storage tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a [`GradeService`] over a fresh in-memory database.
pub async fn setup_test_service() -> Result<GradeService> {
    Ok(GradeService::new(setup_test_db().await?))
}

/// Builds a graded student under a fixed ID, deriving the grade fields from `marks`.
///
/// # Panics
/// Panics if `marks` are out of range; tests should only pass valid marks here.
#[allow(clippy::expect_used)]
pub fn graded_student(student_id: &str, name: &str, marks: Marks) -> GradedStudent {
    let summary = calculate_grade(&marks).expect("test marks must be valid");
    GradedStudent::new(student_id.to_string(), name.to_string(), marks, summary)
}
