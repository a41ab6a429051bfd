//! Unified error type for the grade system.
//!
//! Validation failures, store failures, and configuration problems all flow
//! through [`Error`] so callers can branch on the kind instead of parsing text.

use thiserror::Error;

/// All errors produced by the library and binary.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more marks lie outside `[0, 100]`. The offending mark is not reported.
    #[error("Invalid marks: marks must be between 0 and 100")]
    InvalidMarks,

    /// A record with this student ID is already stored.
    #[error("Student ID already exists: {student_id}")]
    DuplicateStudentId {
        /// The conflicting ID
        student_id: String,
    },

    /// No record with this student ID is stored.
    #[error("Student with ID {student_id} not found")]
    StudentNotFound {
        /// The ID that was looked up
        student_id: String,
    },

    /// Configuration could not be read or is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// The storage engine reported a failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (console streams, listener socket).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
