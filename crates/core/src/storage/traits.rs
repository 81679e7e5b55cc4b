//! Storage traits
//!
//! The session store persists through this trait, allowing SQLite on disk,
//! SQLite in memory, or a test double.

use crate::error::Result;
use crate::models::Session;

/// Durable session persistence
pub trait SessionPersistence: Send {
    /// Load the last persisted session (empty if none)
    fn load_session(&self) -> Result<Session>;

    /// Persist a session, replacing whatever was there
    fn save_session(&self, session: &Session) -> Result<()>;

    /// Remove the persisted session
    fn clear_session(&self) -> Result<()>;
}
