pub mod flashcards;
pub mod study;
pub mod timetable;

pub use flashcards::*;
pub use study::*;
pub use timetable::*;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::db::DbPool;

/// JSON body for every error response. `code` is the machine-readable
/// kind for validation failures; plain failures carry only a message.
#[derive(Debug, Serialize)]
pub struct ApiError {
  pub error: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub code: Option<&'static str>,
}

pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// Build a failure response
pub fn fail<T>(status: StatusCode, message: impl Into<String>) -> ApiResult<T> {
  Err((
    status,
    Json(ApiError {
      error: message.into(),
      code: None,
    }),
  ))
}

/// Build a failure response with a machine-readable code
pub fn fail_with_code<T>(
  status: StatusCode,
  code: &'static str,
  message: impl Into<String>,
) -> ApiResult<T> {
  Err((
    status,
    Json(ApiError {
      error: message.into(),
      code: Some(code),
    }),
  ))
}

/// Log a storage failure and hide the details from the client
pub fn storage_failed<T>(context: &str, e: impl std::fmt::Display) -> ApiResult<T> {
  tracing::error!("{}: {}", context, e);
  fail(StatusCode::INTERNAL_SERVER_ERROR, "Storage error")
}

/// Assemble the full application router
pub fn router(pool: DbPool) -> Router {
  Router::new()
    .route("/timetable", get(timetable::get_timetable))
    .route(
      "/events",
      get(timetable::list_events).post(timetable::create_event),
    )
    .route(
      "/events/{id}",
      axum::routing::put(timetable::update_event).delete(timetable::delete_event),
    )
    .route(
      "/flashcards",
      get(flashcards::list_flashcards).post(flashcards::import_flashcards),
    )
    .route("/flashcards/topics", get(flashcards::list_topics))
    .route("/study/start", post(study::start_drill))
    .route("/study/card", get(study::get_drill_card))
    .route("/study/answer", post(study::submit_answer))
    .route("/study/totals", get(study::get_study_totals))
    .layer(TraceLayer::new_for_http())
    .with_state(pool)
}
