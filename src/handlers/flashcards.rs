//! Flashcard import and listing.
//!
//! Cards arrive pre-generated from the external content service;
//! this side only stores and serves them, grouped by topic.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::{self, DbPool};
use crate::domain::Flashcard;

use super::{fail, fail_with_code, storage_failed, ApiResult};

#[derive(Debug, Deserialize)]
pub struct ImportForm {
  pub topic: String,
  pub cards: Vec<Flashcard>,
}

#[derive(Debug, Serialize)]
pub struct ImportResult {
  pub topic: String,
  pub imported: usize,
}

#[derive(Debug, Deserialize)]
pub struct TopicQuery {
  pub topic: String,
}

/// POST /flashcards
pub async fn import_flashcards(
  State(pool): State<DbPool>,
  Json(form): Json<ImportForm>,
) -> ApiResult<ImportResult> {
  let topic = form.topic.trim().to_string();
  if topic.is_empty() {
    return fail_with_code(
      StatusCode::UNPROCESSABLE_ENTITY,
      "empty_topic",
      "Topic must not be empty",
    );
  }
  if form.cards.is_empty() {
    return fail_with_code(
      StatusCode::UNPROCESSABLE_ENTITY,
      "no_cards",
      "At least one card is required",
    );
  }

  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(e) => return fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
  };
  match db::insert_flashcards(&conn, &topic, &form.cards) {
    Ok(imported) => {
      tracing::info!("Imported {} cards for topic '{}'", imported, topic);
      Ok(Json(ImportResult { topic, imported }))
    }
    Err(e) => storage_failed("Failed to insert flashcards", e),
  }
}

/// GET /flashcards?topic=...
pub async fn list_flashcards(
  State(pool): State<DbPool>,
  Query(query): Query<TopicQuery>,
) -> ApiResult<Vec<Flashcard>> {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(e) => return fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
  };
  match db::get_flashcards_by_topic(&conn, &query.topic) {
    Ok(cards) => Ok(Json(cards)),
    Err(e) => storage_failed("Failed to load flashcards", e),
  }
}

/// GET /flashcards/topics
pub async fn list_topics(State(pool): State<DbPool>) -> ApiResult<Vec<String>> {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(e) => return fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
  };
  match db::list_topics(&conn) {
    Ok(topics) => Ok(Json(topics)),
    Err(e) => storage_failed("Failed to list topics", e),
  }
}
