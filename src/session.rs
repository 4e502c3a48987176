//! Simple in-memory storage for active drill sessions.
//!
//! Stores DrillSession state keyed by session ID (from the request
//! body). Sessions auto-expire after a configurable duration of
//! inactivity; completed drills are removed explicitly once their
//! score is persisted.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use crate::config;
use crate::study::DrillSession;

/// A drill in flight, tagged with the topic its deck was drawn from
/// so the final score can be accumulated per topic.
#[derive(Debug, Clone)]
pub struct ActiveDrill {
  pub topic: String,
  pub drill: DrillSession,
}

/// Session entry with last access time for expiration
struct SessionEntry {
  active: ActiveDrill,
  last_access: DateTime<Utc>,
}

/// Global session store
static SESSIONS: LazyLock<Mutex<HashMap<String, SessionEntry>>> =
  LazyLock::new(|| Mutex::new(HashMap::new()));

/// Look up an active drill by session ID
pub fn get_drill(session_id: &str) -> Option<ActiveDrill> {
  let mut sessions = SESSIONS.lock().expect("Session store lock poisoned");

  // Clean up expired sessions occasionally (~10% chance)
  if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
    cleanup_expired(&mut sessions);
  }

  sessions.get_mut(session_id).map(|entry| {
    entry.last_access = Utc::now();
    entry.active.clone()
  })
}

/// Insert or update a drill session
pub fn put_drill(session_id: &str, active: ActiveDrill) {
  let mut sessions = SESSIONS.lock().expect("Session store lock poisoned");
  sessions.insert(
    session_id.to_string(),
    SessionEntry {
      active,
      last_access: Utc::now(),
    },
  );
}

/// Drop a drill session (after completion or abandonment)
pub fn remove_drill(session_id: &str) {
  let mut sessions = SESSIONS.lock().expect("Session store lock poisoned");
  sessions.remove(session_id);
}

/// Clean up expired sessions
fn cleanup_expired(sessions: &mut HashMap<String, SessionEntry>) {
  let expiry = Utc::now() - Duration::hours(config::SESSION_EXPIRY_HOURS);
  sessions.retain(|_, entry| entry.last_access > expiry);
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Flashcard;

  fn sample_drill() -> DrillSession {
    DrillSession::start(vec![Flashcard::new("q", "a")]).unwrap()
  }

  #[test]
  fn test_get_missing_session() {
    assert!(get_drill("no-such-session").is_none());
  }

  #[test]
  fn test_put_get_remove_roundtrip() {
    let id = format!("test-{}", generate_session_id());
    put_drill(
      &id,
      ActiveDrill {
        topic: "algebra".to_string(),
        drill: sample_drill(),
      },
    );

    let active = get_drill(&id).expect("session should exist");
    assert_eq!(active.topic, "algebra");
    assert_eq!(active.drill.remaining(), 1);

    remove_drill(&id);
    assert!(get_drill(&id).is_none());
  }

  #[test]
  fn test_put_overwrites_existing() {
    let id = format!("test-{}", generate_session_id());
    put_drill(
      &id,
      ActiveDrill {
        topic: "first".to_string(),
        drill: sample_drill(),
      },
    );
    put_drill(
      &id,
      ActiveDrill {
        topic: "second".to_string(),
        drill: sample_drill(),
      },
    );

    assert_eq!(get_drill(&id).unwrap().topic, "second");
    remove_drill(&id);
  }

  #[test]
  fn test_session_id_format() {
    let id = generate_session_id();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
  }

  #[test]
  fn test_session_ids_are_unique() {
    let a = generate_session_id();
    let b = generate_session_id();
    assert_ne!(a, b);
  }
}
