//! Drill session endpoints.
//!
//! A drill is created from a topic's full deck and lives in the
//! in-memory session store; the session id travels in request and
//! response bodies. When a drill completes, its score is folded into
//! the per-topic totals and the session is dropped.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::{self, DbPool, StudyTotal};
use crate::domain::Flashcard;
use crate::session::{self, ActiveDrill};
use crate::study::{DrillSession, DrillState};

use super::{fail, fail_with_code, storage_failed, ApiResult};

#[derive(Debug, Deserialize)]
pub struct StartDrillForm {
  pub topic: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerForm {
  pub session_id: String,
  pub correct: bool,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
  pub session_id: String,
}

/// Snapshot of a drill returned by every session endpoint
#[derive(Debug, Serialize)]
pub struct DrillStatus {
  pub session_id: String,
  pub topic: String,
  pub state: DrillState,
  pub score: u32,
  pub remaining: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub card: Option<Flashcard>,
}

impl DrillStatus {
  fn new(session_id: String, topic: String, drill: &DrillSession) -> Self {
    Self {
      session_id,
      topic,
      state: drill.state(),
      score: drill.score(),
      remaining: drill.remaining(),
      card: drill.current_card().cloned(),
    }
  }
}

/// POST /study/start
pub async fn start_drill(
  State(pool): State<DbPool>,
  Json(form): Json<StartDrillForm>,
) -> ApiResult<DrillStatus> {
  let cards = {
    let conn = match db::try_lock(&pool) {
      Ok(conn) => conn,
      Err(e) => return fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    match db::get_flashcards_by_topic(&conn, &form.topic) {
      Ok(cards) => cards,
      Err(e) => return storage_failed("Failed to load flashcards", e),
    }
  };

  let drill = match DrillSession::start(cards) {
    Ok(drill) => drill,
    Err(e) => {
      return fail_with_code(StatusCode::UNPROCESSABLE_ENTITY, "empty_deck", e.to_string())
    }
  };

  let session_id = session::generate_session_id();
  let status = DrillStatus::new(session_id.clone(), form.topic.clone(), &drill);
  session::put_drill(
    &session_id,
    ActiveDrill {
      topic: form.topic,
      drill,
    },
  );

  tracing::info!(
    "Started drill {} for topic '{}' with {} cards",
    status.session_id,
    status.topic,
    status.remaining
  );
  Ok(Json(status))
}

/// GET /study/card?session_id=...
pub async fn get_drill_card(Query(query): Query<SessionQuery>) -> ApiResult<DrillStatus> {
  match session::get_drill(&query.session_id) {
    Some(active) => Ok(Json(DrillStatus::new(
      query.session_id,
      active.topic,
      &active.drill,
    ))),
    None => fail(StatusCode::NOT_FOUND, "Unknown or expired drill session"),
  }
}

/// POST /study/answer
pub async fn submit_answer(
  State(pool): State<DbPool>,
  Json(form): Json<AnswerForm>,
) -> ApiResult<DrillStatus> {
  let mut active = match session::get_drill(&form.session_id) {
    Some(active) => active,
    None => return fail(StatusCode::NOT_FOUND, "Unknown or expired drill session"),
  };

  let state = match active.drill.answer(form.correct) {
    Ok(state) => state,
    Err(e) => return fail_with_code(StatusCode::CONFLICT, "session_complete", e.to_string()),
  };

  let status = DrillStatus::new(form.session_id.clone(), active.topic.clone(), &active.drill);

  if state == DrillState::Complete {
    // Fold the final score into the topic totals, then drop the session
    let conn = match db::try_lock(&pool) {
      Ok(conn) => conn,
      Err(e) => return fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    if let Err(e) = db::record_drill_result(&conn, &active.topic, active.drill.score()) {
      return storage_failed("Failed to record drill result", e);
    }
    session::remove_drill(&form.session_id);
    tracing::info!(
      "Drill {} complete: topic '{}', score {}",
      form.session_id,
      active.topic,
      active.drill.score()
    );
  } else {
    session::put_drill(&form.session_id, active);
  }

  Ok(Json(status))
}

/// GET /study/totals
pub async fn get_study_totals(State(pool): State<DbPool>) -> ApiResult<Vec<StudyTotal>> {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(e) => return fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
  };
  match db::get_study_totals(&conn) {
    Ok(totals) => Ok(Json(totals)),
    Err(e) => storage_failed("Failed to load study totals", e),
  }
}
