//! Event CRUD and query operations

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result, Row};

use crate::domain::{Event, RepeatRule};

pub fn insert_event(conn: &Connection, event: &Event) -> Result<i64> {
  conn.execute(
    r#"
    INSERT INTO events (title, description, color, start_time, end_time, repeat_rule)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#,
    params![
      event.title,
      event.description,
      event.color,
      event.start_time.to_rfc3339(),
      event.end_time.to_rfc3339(),
      event.repeat_rule.as_storage(),
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn get_all_events(conn: &Connection) -> Result<Vec<Event>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, title, description, color, start_time, end_time, repeat_rule
    FROM events
    ORDER BY start_time ASC
    "#,
  )?;

  let events = stmt
    .query_map([], row_to_event)?
    .collect::<Result<Vec<_>>>()?;
  Ok(events)
}

pub fn get_event_by_id(conn: &Connection, id: i64) -> Result<Option<Event>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, title, description, color, start_time, end_time, repeat_rule
    FROM events WHERE id = ?1
    "#,
  )?;

  let mut rows = stmt.query(params![id])?;
  if let Some(row) = rows.next()? {
    Ok(Some(row_to_event(row)?))
  } else {
    Ok(None)
  }
}

/// Overwrite a stored event. Returns false when the id does not exist.
pub fn update_event(conn: &Connection, event: &Event) -> Result<bool> {
  let changed = conn.execute(
    r#"
    UPDATE events
    SET title = ?1, description = ?2, color = ?3, start_time = ?4, end_time = ?5, repeat_rule = ?6
    WHERE id = ?7
    "#,
    params![
      event.title,
      event.description,
      event.color,
      event.start_time.to_rfc3339(),
      event.end_time.to_rfc3339(),
      event.repeat_rule.as_storage(),
      event.id,
    ],
  )?;
  Ok(changed > 0)
}

/// Returns false when the id does not exist
pub fn delete_event(conn: &Connection, id: i64) -> Result<bool> {
  let changed = conn.execute("DELETE FROM events WHERE id = ?1", params![id])?;
  Ok(changed > 0)
}

fn row_to_event(row: &Row) -> Result<Event> {
  let repeat_raw: String = row.get(6)?;
  let repeat_rule = RepeatRule::from_str(&repeat_raw).ok_or_else(|| {
    rusqlite::Error::FromSqlConversionFailure(
      6,
      rusqlite::types::Type::Text,
      format!("unrecognized repeat rule: {}", repeat_raw).into(),
    )
  })?;

  Ok(Event {
    id: row.get(0)?,
    title: row.get(1)?,
    description: row.get(2)?,
    color: row.get(3)?,
    start_time: parse_timestamp(row, 4)?,
    end_time: parse_timestamp(row, 5)?,
    repeat_rule,
  })
}

fn parse_timestamp(row: &Row, idx: usize) -> Result<DateTime<Utc>> {
  let value: String = row.get(idx)?;
  DateTime::parse_from_rfc3339(&value)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| {
      rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::run_migrations;
  use chrono::Weekday;

  fn test_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    conn
  }

  fn utc(s: &str) -> DateTime<Utc> {
    format!("{}Z", s).parse().unwrap()
  }

  fn sample_event() -> Event {
    Event::new(
      "Maths revision".to_string(),
      Some("Chapter 4".to_string()),
      "#34D399".to_string(),
      utc("2026-03-02T10:00:00"),
      utc("2026-03-02T11:00:00"),
      RepeatRule::on_days(&[Weekday::Mon, Weekday::Wed]).unwrap(),
    )
  }

  #[test]
  fn test_insert_and_get_roundtrip() {
    let conn = test_conn();
    let id = insert_event(&conn, &sample_event()).unwrap();

    let loaded = get_event_by_id(&conn, id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.title, "Maths revision");
    assert_eq!(loaded.description.as_deref(), Some("Chapter 4"));
    assert_eq!(loaded.start_time, utc("2026-03-02T10:00:00"));
    assert_eq!(loaded.end_time, utc("2026-03-02T11:00:00"));
    assert_eq!(
      loaded.repeat_rule,
      RepeatRule::on_days(&[Weekday::Mon, Weekday::Wed]).unwrap()
    );
  }

  #[test]
  fn test_get_missing_event() {
    let conn = test_conn();
    assert!(get_event_by_id(&conn, 42).unwrap().is_none());
  }

  #[test]
  fn test_get_all_events_ordered_by_start() {
    let conn = test_conn();

    let mut late = sample_event();
    late.start_time = utc("2026-03-02T15:00:00");
    late.end_time = utc("2026-03-02T16:00:00");
    let late_id = insert_event(&conn, &late).unwrap();

    let early_id = insert_event(&conn, &sample_event()).unwrap();

    let all = get_all_events(&conn).unwrap();
    let ids: Vec<i64> = all.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![early_id, late_id]);
  }

  #[test]
  fn test_update_event() {
    let conn = test_conn();
    let id = insert_event(&conn, &sample_event()).unwrap();

    let mut edited = sample_event();
    edited.id = id;
    edited.title = "Physics revision".to_string();
    edited.repeat_rule = RepeatRule::NoRepeat;
    assert!(update_event(&conn, &edited).unwrap());

    let loaded = get_event_by_id(&conn, id).unwrap().unwrap();
    assert_eq!(loaded.title, "Physics revision");
    assert_eq!(loaded.repeat_rule, RepeatRule::NoRepeat);
  }

  #[test]
  fn test_update_missing_event() {
    let conn = test_conn();
    let mut event = sample_event();
    event.id = 999;
    assert!(!update_event(&conn, &event).unwrap());
  }

  #[test]
  fn test_delete_event() {
    let conn = test_conn();
    let id = insert_event(&conn, &sample_event()).unwrap();

    assert!(delete_event(&conn, id).unwrap());
    assert!(get_event_by_id(&conn, id).unwrap().is_none());
    assert!(!delete_event(&conn, id).unwrap());
  }

  #[test]
  fn test_corrupt_repeat_rule_is_an_error() {
    let conn = test_conn();
    conn
      .execute(
        "INSERT INTO events (title, color, start_time, end_time, repeat_rule) VALUES ('x', '#fff', ?1, ?2, 'Yearly')",
        params![
          utc("2026-03-02T10:00:00").to_rfc3339(),
          utc("2026-03-02T11:00:00").to_rfc3339()
        ],
      )
      .unwrap();

    assert!(get_all_events(&conn).is_err());
  }
}
