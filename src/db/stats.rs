//! Long-lived per-topic study totals.
//!
//! A drill session is ephemeral; when one completes, its final score
//! is folded into these running totals.

use rusqlite::{params, Connection, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudyTotal {
  pub topic: String,
  pub sessions_completed: i64,
  pub total_score: i64,
}

/// Fold one completed drill into the topic's running totals
pub fn record_drill_result(conn: &Connection, topic: &str, score: u32) -> Result<()> {
  conn.execute(
    r#"
    INSERT INTO study_totals (topic, sessions_completed, total_score)
    VALUES (?1, 1, ?2)
    ON CONFLICT(topic) DO UPDATE SET
      sessions_completed = sessions_completed + 1,
      total_score = total_score + excluded.total_score
    "#,
    params![topic, score as i64],
  )?;
  Ok(())
}

pub fn get_study_totals(conn: &Connection) -> Result<Vec<StudyTotal>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT topic, sessions_completed, total_score
    FROM study_totals
    ORDER BY topic ASC
    "#,
  )?;

  let totals = stmt
    .query_map([], |row| {
      Ok(StudyTotal {
        topic: row.get(0)?,
        sessions_completed: row.get(1)?,
        total_score: row.get(2)?,
      })
    })?
    .collect::<Result<Vec<_>>>()?;
  Ok(totals)
}
