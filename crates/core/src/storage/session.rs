//! Durable session entries
//!
//! The session is kept as three `local_state` rows: `token`, `email` and
//! `role`. They are written and deleted together in one transaction, so a
//! restart never observes a half-written session.

use rusqlite::Connection;
use tracing::{instrument, warn};

use super::local::LocalStore;
use crate::error::Result;
use crate::models::{Role, Session};

pub const TOKEN_KEY: &str = "token";
pub const EMAIL_KEY: &str = "email";
pub const ROLE_KEY: &str = "role";

pub struct SessionRecordStore<'a> {
    conn: &'a Connection,
}

impl<'a> SessionRecordStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Load the persisted session, or an empty one
    ///
    /// A token without an email is treated as corrupt and ignored. An
    /// unreadable role row yields no role.
    #[instrument(skip(self))]
    pub fn load(&self) -> Result<Session> {
        let store = LocalStore::new(self.conn);
        let token = store.get(TOKEN_KEY)?;
        let email = store.get(EMAIL_KEY)?;

        let (Some(token), Some(email)) = (token, email) else {
            return Ok(Session::empty());
        };

        let role = match store.get(ROLE_KEY)? {
            Some(raw) => match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(_) => {
                    warn!(role = %raw, "Ignoring unrecognised persisted role");
                    None
                }
            },
            None => None,
        };

        Ok(Session::new(token, email, role))
    }

    /// Replace the persisted session with `session`
    ///
    /// An unauthenticated session clears the entries instead.
    #[instrument(skip(self, session), fields(identity = ?session.identity))]
    pub fn save(&self, session: &Session) -> Result<()> {
        let (Some(token), Some(email)) = (session.credential.as_deref(), session.identity.as_deref())
        else {
            return self.clear();
        };

        let tx = self.conn.unchecked_transaction()?;
        {
            let store = LocalStore::new(&tx);
            store.set(TOKEN_KEY, token)?;
            store.set(EMAIL_KEY, email)?;
            match session.role {
                Some(role) => store.set(ROLE_KEY, role.as_str())?,
                None => store.remove(ROLE_KEY)?,
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Delete all session entries
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let store = LocalStore::new(&tx);
            store.remove(TOKEN_KEY)?;
            store.remove(EMAIL_KEY)?;
            store.remove(ROLE_KEY)?;
        }
        tx.commit()?;
        Ok(())
    }
}
