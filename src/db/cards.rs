//! Flashcard storage, grouped by topic

use chrono::Utc;
use rusqlite::{params, Connection, Result};

use crate::domain::Flashcard;

/// Insert a batch of generated cards under one topic.
/// Returns the number of cards stored.
pub fn insert_flashcards(conn: &Connection, topic: &str, cards: &[Flashcard]) -> Result<usize> {
  let created_at = Utc::now().to_rfc3339();
  let mut stmt = conn.prepare(
    r#"
    INSERT INTO flashcards (topic, question, answer, created_at)
    VALUES (?1, ?2, ?3, ?4)
    "#,
  )?;

  for card in cards {
    stmt.execute(params![topic, card.question, card.answer, created_at])?;
  }
  Ok(cards.len())
}

pub fn get_flashcards_by_topic(conn: &Connection, topic: &str) -> Result<Vec<Flashcard>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT question, answer
    FROM flashcards
    WHERE topic = ?1
    ORDER BY id ASC
    "#,
  )?;

  let cards = stmt
    .query_map(params![topic], |row| {
      Ok(Flashcard {
        question: row.get(0)?,
        answer: row.get(1)?,
      })
    })?
    .collect::<Result<Vec<_>>>()?;
  Ok(cards)
}

/// Distinct topics that have at least one card
pub fn list_topics(conn: &Connection) -> Result<Vec<String>> {
  let mut stmt = conn.prepare("SELECT DISTINCT topic FROM flashcards ORDER BY topic ASC")?;
  let topics = stmt
    .query_map([], |row| row.get(0))?
    .collect::<Result<Vec<_>>>()?;
  Ok(topics)
}
