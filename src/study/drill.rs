//! Flashcard drill session engine.
//!
//! One drill runs through a shuffled deck. Correct answers remove the
//! card and score a point; missed cards go to the back of the deck and
//! come around again, so a card only ever leaves on a correct answer
//! and the final score always equals the deck size. The session is
//! ephemeral; the caller accumulates the final score into the
//! longer-lived per-topic totals.

use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::VecDeque;

use crate::domain::Flashcard;

/// Error starting a drill with no cards. Rejected explicitly so the
/// caller can tell "never started" apart from "complete with zero score".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyDeckError;

impl std::fmt::Display for EmptyDeckError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Cannot start a drill with an empty deck")
  }
}

impl std::error::Error for EmptyDeckError {}

/// Error answering a drill that already finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCompleteError;

impl std::fmt::Display for SessionCompleteError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Drill session is already complete")
  }
}

impl std::error::Error for SessionCompleteError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillState {
  InProgress,
  Complete,
}

/// A single run through a deck. Created by [`DrillSession::start`];
/// a session that was never started simply does not exist.
#[derive(Debug, Clone)]
pub struct DrillSession {
  /// Cards still awaiting a correct answer
  deck: VecDeque<Flashcard>,
  /// Index of the card currently shown; wraps to 0 past the end
  cursor: usize,
  /// Correct answers so far, never decreases
  score: u32,
  state: DrillState,
}

impl DrillSession {
  /// Shuffle the cards into a fresh deck and begin the drill.
  /// Every permutation is equally likely (Fisher-Yates via `shuffle`).
  pub fn start(mut cards: Vec<Flashcard>) -> Result<Self, EmptyDeckError> {
    if cards.is_empty() {
      return Err(EmptyDeckError);
    }
    cards.shuffle(&mut rand::rng());
    Ok(Self {
      deck: cards.into(),
      cursor: 0,
      score: 0,
      state: DrillState::InProgress,
    })
  }

  /// Record an answer for the current card.
  ///
  /// Correct: the card leaves the deck and scores a point. Incorrect:
  /// the card moves to the back of the deck to be seen again this
  /// session. The drill completes exactly when the deck empties.
  pub fn answer(&mut self, is_correct: bool) -> Result<DrillState, SessionCompleteError> {
    if self.state == DrillState::Complete {
      return Err(SessionCompleteError);
    }

    if is_correct {
      self.deck.remove(self.cursor);
      self.score += 1;
    } else if let Some(card) = self.deck.remove(self.cursor) {
      self.deck.push_back(card);
    }

    if self.cursor >= self.deck.len() {
      self.cursor = 0;
    }
    if self.deck.is_empty() {
      self.state = DrillState::Complete;
    }
    Ok(self.state)
  }

  /// The card awaiting an answer, or None once the drill is complete
  pub fn current_card(&self) -> Option<&Flashcard> {
    if self.state != DrillState::InProgress {
      return None;
    }
    self.deck.get(self.cursor)
  }

  pub fn state(&self) -> DrillState {
    self.state
  }

  pub fn is_complete(&self) -> bool {
    self.state == DrillState::Complete
  }

  pub fn score(&self) -> u32 {
    self.score
  }

  /// Cards still awaiting a correct answer
  pub fn remaining(&self) -> usize {
    self.deck.len()
  }

  /// Build a session with a fixed deck order, bypassing the shuffle
  #[cfg(test)]
  fn from_deck(cards: Vec<Flashcard>) -> Self {
    assert!(!cards.is_empty());
    Self {
      deck: cards.into(),
      cursor: 0,
      score: 0,
      state: DrillState::InProgress,
    }
  }
}
