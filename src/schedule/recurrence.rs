//! Projection of stored events onto a single calendar date.
//!
//! Repeating events have one stored record; everything a given day
//! shows is derived here on demand. Pure function of its inputs, no
//! caching: callers pass the current event snapshot on every query.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::Event;

/// One calendar-day occurrence of a (possibly repeating) event.
/// Read-only; times are re-anchored onto the queried date.
#[derive(Debug, Clone, Serialize)]
pub struct EventInstance {
  /// Id of the stored event this occurrence derives from
  pub event_id: i64,
  pub title: String,
  pub description: Option<String>,
  pub color: String,
  pub start_time: DateTime<Utc>,
  pub end_time: DateTime<Utc>,
}

/// Everything on the calendar for `date`, sorted by projected start time.
///
/// Non-repeating events match by exact calendar date. Repeating events
/// match when the date's weekday is in the rule's day set and the date
/// is not before the event's original date; a rule never projects an
/// event into its own past.
pub fn instances_for_date(events: &[Event], date: NaiveDate) -> Vec<EventInstance> {
  let mut instances = Vec::new();

  for event in events {
    let origin = event.start_time.date_naive();
    let occurs = if event.repeat_rule.is_repeating() {
      event.repeat_rule.applies_on(date.weekday()) && date >= origin
    } else {
      date == origin
    };
    if occurs {
      instances.push(project(event, date));
    }
  }

  instances.sort_by_key(|i| i.start_time);
  instances
}

/// Re-anchor an event onto `date`, keeping the original time-of-day.
/// The end keeps the original start-to-end day offset as well, so an
/// event ending exactly at midnight projects with positive duration.
fn project(event: &Event, date: NaiveDate) -> EventInstance {
  let day_offset = event.end_time.date_naive() - event.start_time.date_naive();
  EventInstance {
    event_id: event.id,
    title: event.title.clone(),
    description: event.description.clone(),
    color: event.color.clone(),
    start_time: date.and_time(event.start_time.time()).and_utc(),
    end_time: (date + day_offset).and_time(event.end_time.time()).and_utc(),
  }
}
