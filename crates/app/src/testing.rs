//! Scripted stand-in for the backend used by the store tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

use inventory_core::{
    AuthApi, Error, ListQuery, Product, ProductApi, ProductDraft, ProductPatch, Result, Role,
};

pub fn timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp(1_757_066_400, 0).unwrap()
}

pub fn product(id: i64, name: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: None,
        price: id as f64,
        quantity: id * 10,
        image_url: None,
        updated_at: timestamp(),
    }
}

/// A JWT-shaped token whose payload carries `claims`
pub fn token_with_claims(claims: &str) -> String {
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims)
    )
}

pub fn token_for(role: &str) -> String {
    token_with_claims(&format!(r#"{{"sub":"1","role":"{}"}}"#, role))
}

#[derive(Default)]
pub struct Backend {
    /// email -> (password, role)
    pub accounts: HashMap<String, (String, Role)>,
    /// Overrides the issued token when set
    pub token_override: Option<String>,
    pub products: Vec<Product>,
    pub next_id: i64,
    pub fail_list: bool,
    /// Answer `list` as if the credential had expired
    pub reject_list: bool,
    pub fail_writes: bool,
    /// Pending list responses, consumed one per `list` call
    pub list_gates: VecDeque<oneshot::Receiver<Vec<Product>>>,
}

#[derive(Default)]
pub struct FakeApi {
    backend: Mutex<Backend>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, email: &str, password: &str, role: Role) -> Self {
        self.backend()
            .accounts
            .insert(email.to_string(), (password.to_string(), role));
        self
    }

    pub fn with_products(self, products: Vec<Product>) -> Self {
        {
            let mut backend = self.backend();
            backend.next_id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
            backend.products = products;
        }
        self
    }

    pub fn backend(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn write_failure(&self) -> Option<Error> {
        self.backend().fail_writes.then(|| Error::Server {
            status: 500,
            message: "Internal Server Error".into(),
        })
    }
}

#[async_trait]
impl AuthApi for FakeApi {
    async fn login(&self, email: &str, password: &str) -> Result<String> {
        self.record(format!("login {}", email));
        let backend = self.backend();
        match backend.accounts.get(email) {
            Some((stored, role)) if stored == password => Ok(backend
                .token_override
                .clone()
                .unwrap_or_else(|| token_for(role.as_str()))),
            _ => Err(Error::Authentication("Invalid credentials".into())),
        }
    }

    async fn register(&self, email: &str, password: &str, role: Role) -> Result<()> {
        self.record(format!("register {}", email));
        let mut backend = self.backend();
        if backend.accounts.contains_key(email) {
            return Err(Error::Registration("Email already registered".into()));
        }
        backend
            .accounts
            .insert(email.to_string(), (password.to_string(), role));
        Ok(())
    }
}

#[async_trait]
impl ProductApi for FakeApi {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Product>> {
        self.record(format!("list {:?}", query.to_params()));
        let gate = {
            let mut backend = self.backend();
            if backend.fail_list {
                return Err(Error::Network("connection refused".into()));
            }
            if backend.reject_list {
                return Err(Error::Authentication("Invalid token".into()));
            }
            match backend.list_gates.pop_front() {
                Some(gate) => gate,
                None => return Ok(backend.products.clone()),
            }
        };
        gate.await
            .map_err(|_| Error::Network("response dropped".into()))
    }

    async fn get(&self, id: i64) -> Result<Product> {
        self.record(format!("get {}", id));
        self.backend()
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Product not found".into()))
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product> {
        self.record(format!("create {}", draft.name));
        if let Some(err) = self.write_failure() {
            return Err(err);
        }
        let mut backend = self.backend();
        let id = backend.next_id.max(1);
        backend.next_id = id + 1;
        let product = Product {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            quantity: draft.quantity,
            image_url: draft.image_url.clone(),
            updated_at: timestamp(),
        };
        backend.products.push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: i64, patch: &ProductPatch) -> Result<Product> {
        self.record(format!("update {}", id));
        if let Some(err) = self.write_failure() {
            return Err(err);
        }
        let mut backend = self.backend();
        let product = backend
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::NotFound("Product not found".into()))?;
        if let Some(name) = &patch.name {
            product.name = name.clone();
        }
        if let Some(description) = &patch.description {
            product.description = description.clone();
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(quantity) = patch.quantity {
            product.quantity = quantity;
        }
        if let Some(image_url) = &patch.image_url {
            product.image_url = image_url.clone();
        }
        Ok(product.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.record(format!("delete {}", id));
        if let Some(err) = self.write_failure() {
            return Err(err);
        }
        let mut backend = self.backend();
        let before = backend.products.len();
        backend.products.retain(|p| p.id != id);
        if backend.products.len() == before {
            return Err(Error::NotFound("Product not found".into()));
        }
        Ok(())
    }
}
