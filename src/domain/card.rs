use serde::{Deserialize, Serialize};

/// A question/answer pair produced by the external content generator.
/// Immutable once created; drill sessions only read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
  pub question: String,
  pub answer: String,
}

impl Flashcard {
  pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
    Self {
      question: question.into(),
      answer: answer.into(),
    }
  }
}
