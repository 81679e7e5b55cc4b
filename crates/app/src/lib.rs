//! Inventory client application layer
//!
//! The session and collection stores, their observer registry, and the
//! [`AppState`] that wires both to one backend.

pub mod catalog;
pub mod cli;
pub mod observers;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;

pub use catalog::{CatalogState, CollectionStore};
pub use observers::{Observers, Subscription};
pub use session::SessionStore;
pub use state::AppState;
