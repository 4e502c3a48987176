//! Timetable event types and the persisted repeat-rule representation.
//!
//! The storage layer keeps the repeat rule as a plain string
//! ("Does not repeat", "Daily", or a comma-joined weekday list).
//! That string is parsed into `RepeatRule` here, at the boundary;
//! nothing past this module branches on the raw string.

use chrono::{DateTime, Utc, Weekday};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Storage label for events that never repeat
pub const NO_REPEAT_LABEL: &str = "Does not repeat";

/// Storage label for events that repeat every day
pub const DAILY_LABEL: &str = "Daily";

/// How an event recurs across calendar dates.
///
/// `OnDays` holds a non-empty, deduplicated day set ordered Sun..Sat.
/// A set containing all seven days is semantically `Daily` and is
/// normalized to it during parsing and construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeatRule {
  NoRepeat,
  Daily,
  OnDays(Vec<Weekday>),
}

impl RepeatRule {
  /// Build a rule from a weekday set, normalizing the full week to `Daily`.
  /// Returns None for an empty set.
  pub fn on_days(days: &[Weekday]) -> Option<Self> {
    let mut days = days.to_vec();
    days.sort_by_key(|d| d.num_days_from_sunday());
    days.dedup();
    match days.len() {
      0 => None,
      7 => Some(Self::Daily),
      _ => Some(Self::OnDays(days)),
    }
  }

  /// Parse the persisted string form.
  pub fn from_str(s: &str) -> Option<Self> {
    let s = s.trim();
    if s == NO_REPEAT_LABEL {
      return Some(Self::NoRepeat);
    }
    if s == DAILY_LABEL {
      return Some(Self::Daily);
    }
    let mut days = Vec::new();
    for part in s.split(',') {
      let day: Weekday = part.trim().parse().ok()?;
      days.push(day);
    }
    Self::on_days(&days)
  }

  /// Render the persisted string form.
  pub fn as_storage(&self) -> String {
    match self {
      Self::NoRepeat => NO_REPEAT_LABEL.to_string(),
      Self::Daily => DAILY_LABEL.to_string(),
      Self::OnDays(days) => days
        .iter()
        .map(|d| day_name(*d))
        .collect::<Vec<_>>()
        .join(", "),
    }
  }

  /// Whether the rule projects the event onto other dates at all
  pub fn is_repeating(&self) -> bool {
    !matches!(self, Self::NoRepeat)
  }

  /// Whether a repeating rule covers the given weekday.
  /// Always false for `NoRepeat`; that variant matches by exact date only.
  pub fn applies_on(&self, weekday: Weekday) -> bool {
    match self {
      Self::NoRepeat => false,
      Self::Daily => true,
      Self::OnDays(days) => days.contains(&weekday),
    }
  }
}

/// Full English weekday name, matching the persisted format
fn day_name(day: Weekday) -> &'static str {
  match day {
    Weekday::Sun => "Sunday",
    Weekday::Mon => "Monday",
    Weekday::Tue => "Tuesday",
    Weekday::Wed => "Wednesday",
    Weekday::Thu => "Thursday",
    Weekday::Fri => "Friday",
    Weekday::Sat => "Saturday",
  }
}

// Serialize as the storage string so the JSON and SQLite boundaries agree
impl Serialize for RepeatRule {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.as_storage())
  }
}

impl<'de> Deserialize<'de> for RepeatRule {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    Self::from_str(&s).ok_or_else(|| D::Error::custom(format!("unrecognized repeat rule: {}", s)))
  }
}

/// A schedulable item. A repeating event has exactly one stored record;
/// occurrences on later dates are derived, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
  pub id: i64,
  pub title: String,
  pub description: Option<String>,
  /// Display tag only; never affects scheduling
  pub color: String,
  pub start_time: DateTime<Utc>,
  pub end_time: DateTime<Utc>,
  pub repeat_rule: RepeatRule,
}

impl Event {
  pub fn new(
    title: String,
    description: Option<String>,
    color: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    repeat_rule: RepeatRule,
  ) -> Self {
    Self {
      id: 0,
      title,
      description,
      color,
      start_time,
      end_time,
      repeat_rule,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_no_repeat() {
    assert_eq!(
      RepeatRule::from_str("Does not repeat"),
      Some(RepeatRule::NoRepeat)
    );
  }

  #[test]
  fn test_parse_daily() {
    assert_eq!(RepeatRule::from_str("Daily"), Some(RepeatRule::Daily));
  }

  #[test]
  fn test_parse_day_list() {
    let rule = RepeatRule::from_str("Monday, Wednesday, Friday");
    assert_eq!(
      rule,
      Some(RepeatRule::OnDays(vec![
        Weekday::Mon,
        Weekday::Wed,
        Weekday::Fri
      ]))
    );
  }

  #[test]
  fn test_parse_orders_days_sun_first() {
    let rule = RepeatRule::from_str("Friday, Sunday, Monday");
    assert_eq!(
      rule,
      Some(RepeatRule::OnDays(vec![
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Fri
      ]))
    );
  }

  #[test]
  fn test_parse_dedupes_days() {
    let rule = RepeatRule::from_str("Monday, Monday, Tuesday");
    assert_eq!(
      rule,
      Some(RepeatRule::OnDays(vec![Weekday::Mon, Weekday::Tue]))
    );
  }

  #[test]
  fn test_all_seven_days_normalizes_to_daily() {
    let rule = RepeatRule::from_str(
      "Sunday, Monday, Tuesday, Wednesday, Thursday, Friday, Saturday",
    );
    assert_eq!(rule, Some(RepeatRule::Daily));
  }

  #[test]
  fn test_parse_invalid() {
    assert_eq!(RepeatRule::from_str(""), None);
    assert_eq!(RepeatRule::from_str("Fortnightly"), None);
    assert_eq!(RepeatRule::from_str("Monday, Blursday"), None);
  }

  #[test]
  fn test_storage_roundtrip() {
    let rules = vec![
      RepeatRule::NoRepeat,
      RepeatRule::Daily,
      RepeatRule::on_days(&[Weekday::Tue, Weekday::Thu]).unwrap(),
    ];
    for rule in rules {
      let s = rule.as_storage();
      assert_eq!(RepeatRule::from_str(&s), Some(rule));
    }
  }

  #[test]
  fn test_on_days_empty_rejected() {
    assert_eq!(RepeatRule::on_days(&[]), None);
  }

  #[test]
  fn test_applies_on() {
    assert!(!RepeatRule::NoRepeat.applies_on(Weekday::Mon));
    assert!(RepeatRule::Daily.applies_on(Weekday::Mon));

    let rule = RepeatRule::on_days(&[Weekday::Mon, Weekday::Wed]).unwrap();
    assert!(rule.applies_on(Weekday::Mon));
    assert!(rule.applies_on(Weekday::Wed));
    assert!(!rule.applies_on(Weekday::Tue));
  }

  #[test]
  fn test_serde_uses_storage_string() {
    let rule = RepeatRule::on_days(&[Weekday::Mon, Weekday::Fri]).unwrap();
    let json = serde_json::to_string(&rule).unwrap();
    assert_eq!(json, "\"Monday, Friday\"");

    let parsed: RepeatRule = serde_json::from_str("\"Daily\"").unwrap();
    assert_eq!(parsed, RepeatRule::Daily);

    assert!(serde_json::from_str::<RepeatRule>("\"Hourly\"").is_err());
  }
}
