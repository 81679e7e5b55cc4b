//! Inventory Network Library
//!
//! HTTP gateway to the inventory REST backend.
//!
//! # Usage
//!
//! ```ignore
//! let (session_tx, session_rx) = tokio::sync::watch::channel(Session::empty());
//! let gateway = HttpGateway::new("http://localhost:8000")?.with_session(session_rx);
//!
//! let products = gateway.list(&ListQuery::new().min_price(10.0)).await?;
//! ```

pub mod client;
pub mod error;
pub mod protocol;

pub use client::HttpGateway;
pub use error::{Endpoint, Error, Result};
