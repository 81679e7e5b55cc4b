//! Application state: explicit wiring of the stores
//!
//! Both stores share one HTTP gateway. The gateway reads the bearer
//! credential from the session store's channel, so a login or logout is
//! visible to the very next request.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use inventory_core::{ClientConfig, Database, InventoryApi, Result, SessionPersistence};
use inventory_net::HttpGateway;

use crate::catalog::CollectionStore;
use crate::session::SessionStore;

/// Main application state
pub struct AppState {
    pub config: ClientConfig,
    pub session: Arc<SessionStore>,
    pub products: Arc<CollectionStore>,
}

impl AppState {
    /// Open local storage and connect to the configured backend
    pub fn new(config: ClientConfig) -> Result<Self> {
        let db_path = config.database_path()?;

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&db_path)?;
        let initial = db.load_session()?;
        let (session_tx, session_rx) = watch::channel(initial);

        let gateway = HttpGateway::new(config.api_url.as_str())?.with_session(session_rx);
        info!(api_url = %gateway.base_url(), db = %db_path.display(), "Initialized client");

        let gateway = Arc::new(gateway);
        let session = SessionStore::new(gateway.clone(), Box::new(db), session_tx);
        let products = CollectionStore::new(gateway);

        Ok(Self {
            config,
            session: Arc::new(session),
            products: Arc::new(products),
        })
    }

    /// Wire the stores against any backend and storage
    pub fn with_parts<A>(
        config: ClientConfig,
        api: Arc<A>,
        storage: Box<dyn SessionPersistence>,
    ) -> Result<Self>
    where
        A: InventoryApi + 'static,
    {
        let session = SessionStore::restore(api.clone(), storage)?;
        let products = CollectionStore::new(api);
        Ok(Self {
            config,
            session: Arc::new(session),
            products: Arc::new(products),
        })
    }
}
