pub mod drill;

pub use drill::{DrillSession, DrillState, EmptyDeckError, SessionCompleteError};
