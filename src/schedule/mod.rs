pub mod conflict;
pub mod recurrence;

pub use conflict::{has_conflict, validate_event, ValidationError};
pub use recurrence::{instances_for_date, EventInstance};
