//! Session store: who is logged in, and with which role
//!
//! The session is replaced wholesale on login and cleared wholesale on
//! logout, always written through to durable storage first. Observers and
//! the HTTP gateway read it through a `watch` channel, so they see either the
//! old session or the new one, never a mix. Observer callbacks must not
//! log in or out synchronously.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{info, instrument, warn};

use inventory_core::validation::validate_credentials;
use inventory_core::{decode_role, AuthApi, Error, Result, Role, Session, SessionPersistence};

use crate::observers::{Observers, Subscription};

pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    storage: Mutex<Box<dyn SessionPersistence>>,
    state: watch::Sender<Session>,
    observers: Observers<Session>,
}

impl SessionStore {
    /// Build around an existing channel whose value was loaded from `storage`
    pub fn new(
        api: Arc<dyn AuthApi>,
        storage: Box<dyn SessionPersistence>,
        state: watch::Sender<Session>,
    ) -> Self {
        Self {
            api,
            storage: Mutex::new(storage),
            state,
            observers: Observers::new(),
        }
    }

    /// Build with the session restored from `storage`
    pub fn restore(api: Arc<dyn AuthApi>, storage: Box<dyn SessionPersistence>) -> Result<Self> {
        let session = storage.load_session()?;
        if session.is_authenticated() {
            info!(identity = ?session.identity, role = ?session.role, "Restored session");
        }
        let (state, _) = watch::channel(session);
        Ok(Self::new(api, storage, state))
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Live view of the session, used for bearer injection
    pub fn watch(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Role hint for UI affordances; the backend enforces the real check
    pub fn is_admin(&self) -> bool {
        self.state.borrow().is_admin()
    }

    /// Guard for views that need a logged-in user
    pub fn require_authenticated(&self) -> Result<Session> {
        let session = self.session();
        if session.is_authenticated() {
            Ok(session)
        } else {
            Err(Error::Authentication("Login required".into()))
        }
    }

    /// Authenticate and replace the session
    #[instrument(skip(self, secret))]
    pub async fn login(&self, identity: &str, secret: &str) -> Result<()> {
        validate_credentials(identity, secret)?;
        let identity = identity.trim();

        let credential = self.api.login(identity, secret).await.inspect_err(|e| {
            warn!(error = %e, "Login failed");
        })?;

        let role = decode_role(&credential);
        if role.is_none() {
            warn!("Credential carries no readable role claim");
        }

        self.replace(Session::new(credential, identity.to_string(), role))?;
        info!(role = ?role, "Logged in");
        Ok(())
    }

    /// Create an account, then log in with the same secret
    #[instrument(skip(self, secret))]
    pub async fn register(&self, identity: &str, secret: &str, role: Role) -> Result<()> {
        validate_credentials(identity, secret)?;

        self.api
            .register(identity.trim(), secret, role)
            .await
            .inspect_err(|e| warn!(error = %e, "Registration failed"))?;
        info!("Registered account");

        self.login(identity, secret).await
    }

    /// Forget the session; never fails
    #[instrument(skip(self))]
    pub fn logout(&self) {
        let storage = self.storage();
        if let Err(e) = storage.clear_session() {
            warn!(error = %e, "Failed to clear persisted session");
        }
        self.state.send_replace(Session::empty());
        self.observers.notify(&Session::empty());
        info!("Logged out");
    }

    // The storage guard is held through notification so observers see
    // sessions in the order they were written
    fn replace(&self, session: Session) -> Result<()> {
        let storage = self.storage();
        storage.save_session(&session)?;
        self.state.send_replace(session.clone());
        self.observers.notify(&session);
        Ok(())
    }

    fn storage(&self) -> MutexGuard<'_, Box<dyn SessionPersistence>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
