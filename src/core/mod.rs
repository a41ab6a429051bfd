//! Core business logic - framework-agnostic grading, ID assignment, and storage.
//!
//! The HTTP and console front ends only talk to [`service::GradeService`] and
//! the types it returns.

/// Mark validation and grade derivation
pub mod grade;
/// Student ID generation
pub mod id_generator;
/// Orchestration of the grading pipeline
pub mod service;
/// Aggregate statistics
pub mod statistics;
/// Persistence operations on student records
pub mod student;
