//! Inventory Core Library
//!
//! Models, validation, pagination, durable session storage and the
//! repository traits shared by the inventory client crates.

pub mod api;
pub mod claims;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod storage;
pub mod validation;

pub use api::{AuthApi, InventoryApi, ProductApi};
pub use claims::decode_role;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use models::*;
pub use pagination::Pager;
pub use storage::{Database, SessionPersistence};
