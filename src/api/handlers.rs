//! HTTP handlers. Each maps one endpoint onto a [`GradeService`](crate::core::service::GradeService) call.

use crate::{
    api::{
        AppState,
        dto::{
            BulkDeleteResponse, GradeResponse, MessageResponse, StudentForm, StudentIdForm,
            StudentIdsForm, StudentResponse,
        },
        error::ApiError,
    },
    core::{statistics::Statistics, student::DeleteOutcome},
    errors::Error,
};
use axum::{
    Form, Json,
    extract::{Path, State, rejection::FormRejection},
    http::StatusCode,
};
use tracing::{debug, instrument};

type ApiResult<T> = std::result::Result<T, ApiError>;
type FormBody<T> = std::result::Result<Form<T>, FormRejection>;

/// Body that is not a readable form counts as an empty one, so missing fields are
/// reported the same way as for an empty form.
fn form_or_default<T: Default>(form: FormBody<T>) -> T {
    match form {
        Ok(Form(value)) => value,
        Err(rejection) => {
            debug!("Treating unreadable form body as empty: {}", rejection);
            T::default()
        }
    }
}

/// Trimmed, non-empty form value or a 400 with `message`.
fn required(value: Option<&str>, message: &str) -> ApiResult<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| ApiError::BadRequest(message.to_string()))
}

/// `GET /api/students`
pub async fn list_students(State(state): State<AppState>) -> Json<Vec<StudentResponse>> {
    let students = state.service.all_students().await;
    debug!("Listing {} students", students.len());
    Json(students.iter().map(StudentResponse::from).collect())
}

/// `GET /api/students/:student_id`
pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> ApiResult<Json<StudentResponse>> {
    let student = state
        .service
        .get_student(&student_id)
        .await?
        .ok_or(Error::StudentNotFound { student_id })?;
    Ok(Json(StudentResponse::from(&student)))
}

/// `POST /api/students`
#[instrument(skip_all)]
pub async fn create_student(
    State(state): State<AppState>,
    form: FormBody<StudentForm>,
) -> ApiResult<(StatusCode, Json<GradeResponse>)> {
    let form = form_or_default(form);
    let outcome = state
        .service
        .process_new_student(form.name(), form.marks())
        .await?;
    Ok((StatusCode::CREATED, Json(GradeResponse::from(&outcome))))
}

/// `POST /api/students/delete`
#[instrument(skip_all)]
pub async fn delete_student(
    State(state): State<AppState>,
    form: FormBody<StudentIdForm>,
) -> ApiResult<Json<MessageResponse>> {
    let form = form_or_default(form);
    let student_id = required(form.student_id.as_deref(), "Student ID is required")?;
    match state.service.delete_student(&student_id).await? {
        DeleteOutcome::Deleted => Ok(Json(MessageResponse::new(format!(
            "Student with ID {student_id} deleted successfully"
        )))),
        DeleteOutcome::NotFound => Err(Error::StudentNotFound { student_id }.into()),
    }
}

/// `POST /api/students/clear`
#[instrument(skip_all)]
pub async fn clear_students(State(state): State<AppState>) -> ApiResult<Json<MessageResponse>> {
    let removed = state.service.clear_students().await?;
    Ok(Json(MessageResponse::new(format!(
        "{removed} student records deleted successfully"
    ))))
}

/// `POST /api/students/bulk-delete`
#[instrument(skip_all)]
pub async fn bulk_delete_students(
    State(state): State<AppState>,
    form: FormBody<StudentIdsForm>,
) -> ApiResult<Json<BulkDeleteResponse>> {
    let form = form_or_default(form);
    let student_ids = required(form.student_ids.as_deref(), "Student IDs are required")?;
    let summary = state.service.bulk_delete(student_ids.split(',')).await;
    Ok(Json(BulkDeleteResponse::from(summary)))
}

/// `POST /api/students/update`
#[instrument(skip_all)]
pub async fn update_student(
    State(state): State<AppState>,
    form: FormBody<StudentForm>,
) -> ApiResult<Json<GradeResponse>> {
    let form = form_or_default(form);
    let student_id = required(form.student_id.as_deref(), "Student ID is required")?;
    let outcome = state
        .service
        .update_student(&student_id, form.name(), form.marks())
        .await?;
    Ok(Json(GradeResponse::from(&outcome)))
}

/// `GET /api/statistics`
pub async fn statistics(State(state): State<AppState>) -> Json<Statistics> {
    Json(state.service.statistics().await)
}
