//! HTTP API - axum router exposing the grade service.
//!
//! JSON endpoints live under `/api`; everything else falls through to the static
//! web assets directory. CORS allows any origin for `GET`, `POST`, and `OPTIONS`.

/// Request/response types
pub mod dto;
/// Error to response mapping
pub mod error;
/// Endpoint handlers
pub mod handlers;

use crate::{config::settings::ServerConfig, core::service::GradeService, errors::Result};
use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing::info;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The grading pipeline and store
    pub service: GradeService,
}

impl AppState {
    /// Creates handler state around `service`.
    #[must_use]
    pub const fn new(service: GradeService) -> Self {
        Self { service }
    }
}

/// Builds the full router: API routes, static fallback, and CORS.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/api/students",
            get(handlers::list_students).post(handlers::create_student),
        )
        .route("/api/students/delete", post(handlers::delete_student))
        .route("/api/students/clear", post(handlers::clear_students))
        .route("/api/students/bulk-delete", post(handlers::bulk_delete_students))
        .route("/api/students/update", post(handlers::update_student))
        .route("/api/students/:student_id", get(handlers::get_student))
        .route("/api/statistics", get(handlers::statistics))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .with_state(state)
}

/// Binds `config.bind_address()` and serves until the process stops.
pub async fn serve(service: GradeService, config: &ServerConfig) -> Result<()> {
    let router = create_router(AppState::new(service), &config.static_dir);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(
        "Student grade system listening on http://{}",
        listener.local_addr()?
    );
    axum::serve(listener, router).await?;
    Ok(())
}
