//! Candidate-event validation: title, duration, and time-overlap checks.
//!
//! Runs client-side of the store; the caller persists only on success.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::Event;

use super::recurrence::instances_for_date;

/// Why a candidate event was rejected. All variants are recoverable,
/// user-facing input errors; the caller shows them and lets the user
/// correct the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
  /// Title is blank or whitespace-only
  EmptyTitle,
  /// End time is not after start time
  InvalidDuration,
  /// Overlaps an existing instance on the target date
  Overlap,
}

impl ValidationError {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::EmptyTitle => "empty_title",
      Self::InvalidDuration => "invalid_duration",
      Self::Overlap => "overlap",
    }
  }
}

impl std::fmt::Display for ValidationError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let msg = match self {
      Self::EmptyTitle => "Event title must not be empty",
      Self::InvalidDuration => "Event must end after it starts",
      Self::Overlap => "Event overlaps an existing event",
    };
    write!(f, "{}", msg)
  }
}

impl std::error::Error for ValidationError {}

/// Whether a candidate interval collides with anything on `date`.
///
/// Overlap is strict on both ends: intervals that merely touch at an
/// endpoint do not conflict. `exclude_event_id` skips instances derived
/// from that stored event, so an edit never conflicts with itself.
/// Stops at the first conflict found.
pub fn has_conflict(
  candidate_start: DateTime<Utc>,
  candidate_end: DateTime<Utc>,
  date: NaiveDate,
  events: &[Event],
  exclude_event_id: Option<i64>,
) -> bool {
  instances_for_date(events, date)
    .iter()
    .filter(|instance| exclude_event_id != Some(instance.event_id))
    .any(|instance| candidate_start < instance.end_time && candidate_end > instance.start_time)
}

/// Validate a candidate new/edited event against the stored events.
/// Checks run in order: title, then duration, then overlap.
pub fn validate_event(
  title: &str,
  candidate_start: DateTime<Utc>,
  candidate_end: DateTime<Utc>,
  date: NaiveDate,
  events: &[Event],
  exclude_event_id: Option<i64>,
) -> Result<(), ValidationError> {
  if title.trim().is_empty() {
    return Err(ValidationError::EmptyTitle);
  }
  if candidate_end <= candidate_start {
    return Err(ValidationError::InvalidDuration);
  }
  if has_conflict(candidate_start, candidate_end, date, events, exclude_event_id) {
    return Err(ValidationError::Overlap);
  }
  Ok(())
}
