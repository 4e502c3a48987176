pub mod card;
pub mod event;

pub use card::Flashcard;
pub use event::{Event, RepeatRule};
