//! Data models for the inventory client

mod product;
mod query;
mod session;
pub(crate) mod wire;

pub use product::*;
pub use query::*;
pub use session::*;
