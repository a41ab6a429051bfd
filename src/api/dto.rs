//! Request and response shapes for the HTTP API.
//!
//! Records go out with camelCase keys. JSON string escaping is left to `serde_json`.

#![allow(missing_docs)]

use crate::{
    core::{
        grade::{Marks, parse_mark},
        service::{BulkDeleteSummary, GradeOutcome},
        student::GradedStudent,
    },
    entities::student,
};
use serde::{Deserialize, Serialize};

/// Form body for create and update.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StudentForm {
    /// Required for update, ignored for create
    #[serde(rename = "studentId")]
    pub student_id: Option<String>,
    /// Student name; missing means empty
    pub name: Option<String>,
    /// Raw marks as entered
    pub m1: Option<String>,
    pub m2: Option<String>,
    pub m3: Option<String>,
    pub m4: Option<String>,
    pub m5: Option<String>,
}

impl StudentForm {
    /// The submitted marks; missing or unparseable values become `-1`.
    #[must_use]
    pub fn marks(&self) -> Marks {
        Marks::new(
            parse_mark(self.m1.as_deref()),
            parse_mark(self.m2.as_deref()),
            parse_mark(self.m3.as_deref()),
            parse_mark(self.m4.as_deref()),
            parse_mark(self.m5.as_deref()),
        )
    }

    /// Name, or empty when absent.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Form body naming one student.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StudentIdForm {
    #[serde(rename = "studentId")]
    pub student_id: Option<String>,
}

/// Form body naming several students, comma separated.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StudentIdsForm {
    #[serde(rename = "studentIds")]
    pub student_ids: Option<String>,
}

/// One student as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub student_id: String,
    pub name: String,
    pub mark1: i32,
    pub mark2: i32,
    pub mark3: i32,
    pub mark4: i32,
    pub mark5: i32,
    pub total: i32,
    pub average: i32,
    pub grade: String,
}

impl From<&student::Model> for StudentResponse {
    fn from(model: &student::Model) -> Self {
        Self {
            student_id: model.student_id.clone(),
            name: model.name.clone(),
            mark1: model.mark1,
            mark2: model.mark2,
            mark3: model.mark3,
            mark4: model.mark4,
            mark5: model.mark5,
            total: model.total,
            average: model.average,
            grade: model.grade.clone(),
        }
    }
}

impl From<&GradedStudent> for StudentResponse {
    fn from(graded: &GradedStudent) -> Self {
        let [mark1, mark2, mark3, mark4, mark5] = graded.marks.0;
        Self {
            student_id: graded.student_id.clone(),
            name: graded.name.clone(),
            mark1,
            mark2,
            mark3,
            mark4,
            mark5,
            total: graded.total,
            average: graded.average,
            grade: graded.grade.as_str().to_string(),
        }
    }
}

/// A graded student plus the persistence outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeResponse {
    #[serde(flatten)]
    pub student: StudentResponse,
    /// Whether the record was stored
    pub saved: bool,
    /// Persistence message
    pub message: String,
}

impl From<&GradeOutcome> for GradeResponse {
    fn from(outcome: &GradeOutcome) -> Self {
        Self {
            student: StudentResponse::from(&outcome.student),
            saved: outcome.is_saved(),
            message: outcome.message(),
        }
    }
}

/// `{"message": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of a bulk delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    pub message: String,
    pub deleted: usize,
    pub not_found: Vec<String>,
    pub failed: Vec<String>,
}

impl From<BulkDeleteSummary> for BulkDeleteResponse {
    fn from(summary: BulkDeleteSummary) -> Self {
        Self {
            message: format!("Successfully deleted {} students", summary.deleted),
            deleted: summary.deleted,
            not_found: summary.not_found,
            failed: summary.failed,
        }
    }
}
