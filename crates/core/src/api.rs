//! Remote repository traits
//!
//! The stores talk to the backend only through these traits, so the HTTP
//! gateway can be swapped for a scripted fake in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ListQuery, Product, ProductDraft, ProductPatch, Role};

/// Authentication endpoints
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange email and password for a bearer credential
    async fn login(&self, email: &str, password: &str) -> Result<String>;

    /// Create an account; does not log in
    async fn register(&self, email: &str, password: &str, role: Role) -> Result<()>;
}

/// Product endpoints
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// List products matching the query, in server order
    async fn list(&self, query: &ListQuery) -> Result<Vec<Product>>;

    /// Fetch a single product
    async fn get(&self, id: i64) -> Result<Product>;

    /// Create a product
    async fn create(&self, draft: &ProductDraft) -> Result<Product>;

    /// Apply a partial update
    async fn update(&self, id: i64, patch: &ProductPatch) -> Result<Product>;

    /// Delete a product
    async fn delete(&self, id: i64) -> Result<()>;
}

/// Both endpoint groups behind one handle
pub trait InventoryApi: AuthApi + ProductApi {}

impl<T> InventoryApi for T where T: AuthApi + ProductApi {}
