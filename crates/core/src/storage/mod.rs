//! SQLite storage layer for durable client state

mod local;
mod migrations;
mod session;
mod traits;

use rusqlite::Connection;
use std::path::Path;
use tracing::instrument;

use crate::error::Result;
use crate::models::Session;

pub use local::LocalStore;
pub use session::{SessionRecordStore, EMAIL_KEY, ROLE_KEY, TOKEN_KEY};
pub use traits::SessionPersistence;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Current schema version
    pub fn schema_version(&self) -> Result<u32> {
        migrations::schema_version(&self.conn)
    }

    /// Raw key/value access
    pub fn local(&self) -> LocalStore<'_> {
        LocalStore::new(&self.conn)
    }

    /// Session entries
    pub fn sessions(&self) -> SessionRecordStore<'_> {
        SessionRecordStore::new(&self.conn)
    }
}

impl SessionPersistence for Database {
    fn load_session(&self) -> Result<Session> {
        self.sessions().load()
    }

    fn save_session(&self, session: &Session) -> Result<()> {
        self.sessions().save(session)
    }

    fn clear_session(&self) -> Result<()> {
        self.sessions().clear()
    }
}
