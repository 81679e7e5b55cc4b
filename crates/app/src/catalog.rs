//! Product collection store
//!
//! Holds the last-known server view of the product list together with the
//! loading flag and the last error message. Every transition is applied in a
//! single watch update, then observers are notified with the resulting
//! snapshot. Transitions are serialized, so observers see them in order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use inventory_core::validation::{validate_draft, validate_patch};
use inventory_core::{Error, ListQuery, Product, ProductApi, ProductDraft, ProductPatch, Result};

use crate::observers::{Observers, Subscription};

/// Observable collection state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub items: Vec<Product>,
    pub loading: bool,
    pub error: Option<String>,
    /// Bumped whenever `items` changes
    pub revision: u64,
}

pub struct CollectionStore {
    api: Arc<dyn ProductApi>,
    state: watch::Sender<CatalogState>,
    observers: Observers<CatalogState>,
    list_seq: AtomicU64,
    last_applied: AtomicU64,
    notify_order: Mutex<()>,
}

impl CollectionStore {
    pub fn new(api: Arc<dyn ProductApi>) -> Self {
        let (state, _) = watch::channel(CatalogState::default());
        Self {
            api,
            state,
            observers: Observers::new(),
            list_seq: AtomicU64::new(0),
            last_applied: AtomicU64::new(0),
            notify_order: Mutex::new(()),
        }
    }

    pub fn snapshot(&self) -> CatalogState {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<Product> {
        self.state.borrow().items.clone()
    }

    pub fn find(&self, id: i64) -> Option<Product> {
        self.state.borrow().items.iter().find(|p| p.id == id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn revision(&self) -> u64 {
        self.state.borrow().revision
    }

    pub fn watch(&self) -> watch::Receiver<CatalogState> {
        self.state.subscribe()
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&CatalogState) + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    /// Dismiss the last error message
    pub fn clear_error(&self) {
        self.transition(|state| state.error.take().is_some());
    }

    /// Replace the collection with the result of `query`
    ///
    /// Failures are recorded on the state, never returned. Overlapping calls
    /// are not coalesced: whichever completes last wins.
    pub async fn list(&self, query: &ListQuery) {
        // Already recorded on the state
        let _ = self.refresh(query).await;
    }

    /// Same as [`list`](Self::list), but also hands the failure back to the
    /// caller with its kind intact
    #[instrument(skip(self))]
    pub async fn refresh(&self, query: &ListQuery) -> Result<()> {
        let ticket = self.list_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.transition(|state| {
            let changed = !state.loading || state.error.is_some();
            state.loading = true;
            state.error = None;
            changed
        });

        let result = self.api.list(query).await;

        let newest = self.last_applied.fetch_max(ticket, Ordering::SeqCst);
        if newest > ticket {
            debug!(ticket, newest, "List response arrived after a newer one");
        }

        match result {
            Ok(items) => {
                debug!(count = items.len(), "Loaded products");
                self.transition(|state| {
                    state.items = items;
                    state.loading = false;
                    state.revision += 1;
                    true
                });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load products");
                let message = e.to_string();
                self.transition(|state| {
                    state.loading = false;
                    state.error = Some(message);
                    true
                });
                Err(e)
            }
        }
    }

    /// Fetch one product from the server without touching the collection
    #[instrument(skip(self))]
    pub async fn fetch(&self, id: i64) -> Result<Product> {
        self.api.get(id).await.inspect_err(|e| self.record_error(e))
    }

    /// Create a product and prepend the server's copy
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: ProductDraft) -> Result<Product> {
        let draft = draft.normalized();
        validate_draft(&draft).inspect_err(|e| self.record_error(e))?;

        let product = self
            .api
            .create(&draft)
            .await
            .inspect_err(|e| self.record_error(e))?;

        self.transition(|state| {
            state.items.insert(0, product.clone());
            state.revision += 1;
            true
        });
        info!(id = product.id, "Created product");
        Ok(product)
    }

    /// Apply a partial update and replace the element in place
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, patch: ProductPatch) -> Result<Product> {
        let patch = patch.normalized();
        validate_patch(&patch).inspect_err(|e| self.record_error(e))?;

        let product = self
            .api
            .update(id, &patch)
            .await
            .inspect_err(|e| self.record_error(e))?;

        self.transition(|state| {
            let Some(slot) = state.items.iter_mut().find(|p| p.id == product.id) else {
                return false;
            };
            *slot = product.clone();
            state.revision += 1;
            true
        });
        info!(id, "Updated product");
        Ok(product)
    }

    /// Delete a product, removing it locally before the server confirms
    ///
    /// On failure the collection is restored exactly as it was.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: i64) -> Result<()> {
        let mut before = None;
        self.transition(|state| {
            if !state.items.iter().any(|p| p.id == id) {
                return false;
            }
            before = Some(state.items.clone());
            state.items.retain(|p| p.id != id);
            state.revision += 1;
            true
        });

        match self.api.delete(id).await {
            Ok(()) => {
                info!(id, "Deleted product");
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "Delete failed, restoring collection");
                let message = e.to_string();
                self.transition(|state| {
                    if let Some(items) = before.take() {
                        state.items = items;
                        state.revision += 1;
                    }
                    state.error = Some(message);
                    true
                });
                Err(e)
            }
        }
    }

    fn record_error(&self, error: &Error) {
        warn!(error = %error, "Product operation failed");
        let message = error.to_string();
        self.transition(|state| {
            state.error = Some(message);
            true
        });
    }

    /// Apply `change` atomically and notify observers once
    ///
    /// `change` returns whether it modified anything; a no-op stays silent.
    /// Apply and notify happen under `notify_order`, so observers receive
    /// snapshots in the order they were applied even across worker threads.
    /// Callbacks may read the store but must not mutate it synchronously.
    fn transition<F>(&self, change: F)
    where
        F: FnOnce(&mut CatalogState) -> bool,
    {
        let _order = self
            .notify_order
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut snapshot = None;
        self.state.send_if_modified(|state| {
            if !change(state) {
                return false;
            }
            snapshot = Some(state.clone());
            true
        });
        if let Some(snapshot) = snapshot {
            self.observers.notify(&snapshot);
        }
    }
}
