//! Turn arbitration between a human and the AI: the session owns the
//! authoritative board, runs AI searches on a task pool, and keeps undo history.
pub mod error;
pub mod session;

pub use error::SessionError;
pub use session::{GameSnapshot, Session, SessionConfig, SessionState};
