//! Change notification for the stores
//!
//! Views register a callback and get back a [`Subscription`]. Callbacks run
//! after a state transition has been fully applied, with a snapshot of the
//! new state. Dropping the subscription unregisters the callback.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use uuid::Uuid;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;
type Registry<T> = Mutex<Vec<(Uuid, Callback<T>)>>;

/// Registered callbacks for one store
pub struct Observers<T> {
    registry: Arc<Registry<T>>,
}

impl<T: 'static> Observers<T> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register `callback`; it stays registered while the handle lives
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        lock(&self.registry).push((id, Arc::new(callback)));

        let registry: Weak<Registry<T>> = Arc::downgrade(&self.registry);
        Subscription {
            id,
            cancel: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    lock(&registry).retain(|(entry, _)| *entry != id);
                }
            })),
        }
    }

    /// Call every registered callback once with `state`
    pub fn notify(&self, state: &T) {
        // Callbacks may subscribe or unsubscribe, so run them unlocked
        let callbacks: Vec<Callback<T>> = lock(&self.registry)
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            callback(state);
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.registry).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(registry: &Registry<T>) -> MutexGuard<'_, Vec<(Uuid, Callback<T>)>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle returned by `subscribe`
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: Uuid,
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Stop receiving notifications
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keep the callback registered for the lifetime of the store
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
