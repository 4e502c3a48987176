//! Timetable endpoints: event CRUD plus the per-day instance view.
//!
//! Create and edit validate the candidate against everything already
//! projected onto its calendar date before touching the store; the
//! store itself is last-write-wins.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::db::{self, DbPool};
use crate::domain::{Event, RepeatRule};
use crate::schedule::{self, EventInstance, ValidationError};

use super::{fail, fail_with_code, storage_failed, ApiResult};

#[derive(Debug, Deserialize)]
pub struct TimetableQuery {
  /// Calendar date to project onto, ISO format (YYYY-MM-DD)
  pub date: NaiveDate,
}

/// Candidate event payload for create and edit
#[derive(Debug, Deserialize)]
pub struct EventForm {
  pub title: String,
  pub description: Option<String>,
  #[serde(default = "default_color")]
  pub color: String,
  pub start_time: DateTime<Utc>,
  pub end_time: DateTime<Utc>,
  pub repeat_rule: RepeatRule,
}

fn default_color() -> String {
  "#A78BFA".to_string()
}

/// GET /timetable?date=YYYY-MM-DD
pub async fn get_timetable(
  State(pool): State<DbPool>,
  Query(query): Query<TimetableQuery>,
) -> ApiResult<Vec<EventInstance>> {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(e) => return fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
  };
  let events = match db::get_all_events(&conn) {
    Ok(events) => events,
    Err(e) => return storage_failed("Failed to load events", e),
  };

  Ok(Json(schedule::instances_for_date(&events, query.date)))
}

/// GET /events
pub async fn list_events(State(pool): State<DbPool>) -> ApiResult<Vec<Event>> {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(e) => return fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
  };
  match db::get_all_events(&conn) {
    Ok(events) => Ok(Json(events)),
    Err(e) => storage_failed("Failed to load events", e),
  }
}

/// POST /events
pub async fn create_event(
  State(pool): State<DbPool>,
  Json(form): Json<EventForm>,
) -> ApiResult<Event> {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(e) => return fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
  };
  let existing = match db::get_all_events(&conn) {
    Ok(events) => events,
    Err(e) => return storage_failed("Failed to load events", e),
  };

  if let Err(e) = validate_form(&form, &existing, None) {
    return rejected(e);
  }

  let mut event = Event::new(
    form.title,
    form.description,
    form.color,
    form.start_time,
    form.end_time,
    form.repeat_rule,
  );
  match db::insert_event(&conn, &event) {
    Ok(id) => {
      tracing::info!("Created event {} ({})", id, event.title);
      event.id = id;
      Ok(Json(event))
    }
    Err(e) => storage_failed("Failed to insert event", e),
  }
}

/// PUT /events/{id}
pub async fn update_event(
  State(pool): State<DbPool>,
  Path(id): Path<i64>,
  Json(form): Json<EventForm>,
) -> ApiResult<Event> {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(e) => return fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
  };

  match db::get_event_by_id(&conn, id) {
    Ok(Some(_)) => {}
    Ok(None) => return fail(StatusCode::NOT_FOUND, format!("No event with id {}", id)),
    Err(e) => return storage_failed("Failed to load event", e),
  }

  let existing = match db::get_all_events(&conn) {
    Ok(events) => events,
    Err(e) => return storage_failed("Failed to load events", e),
  };

  // Validate against everything except the event being edited
  if let Err(e) = validate_form(&form, &existing, Some(id)) {
    return rejected(e);
  }

  let mut event = Event::new(
    form.title,
    form.description,
    form.color,
    form.start_time,
    form.end_time,
    form.repeat_rule,
  );
  event.id = id;

  match db::update_event(&conn, &event) {
    Ok(true) => Ok(Json(event)),
    Ok(false) => fail(StatusCode::NOT_FOUND, format!("No event with id {}", id)),
    Err(e) => storage_failed("Failed to update event", e),
  }
}

/// DELETE /events/{id}
pub async fn delete_event(State(pool): State<DbPool>, Path(id): Path<i64>) -> ApiResult<()> {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(e) => return fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
  };
  match db::delete_event(&conn, id) {
    Ok(true) => {
      tracing::info!("Deleted event {}", id);
      Ok(Json(()))
    }
    Ok(false) => fail(StatusCode::NOT_FOUND, format!("No event with id {}", id)),
    Err(e) => storage_failed("Failed to delete event", e),
  }
}

/// Run the scheduling validation against the candidate's own calendar date
fn validate_form(
  form: &EventForm,
  existing: &[Event],
  exclude_event_id: Option<i64>,
) -> Result<(), ValidationError> {
  schedule::validate_event(
    &form.title,
    form.start_time,
    form.end_time,
    form.start_time.date_naive(),
    existing,
    exclude_event_id,
  )
}

fn rejected<T>(e: ValidationError) -> ApiResult<T> {
  fail_with_code(StatusCode::UNPROCESSABLE_ENTITY, e.as_str(), e.to_string())
}
