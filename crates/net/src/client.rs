//! HTTP gateway to the inventory backend
//!
//! One reqwest client shared by every call. While the session holds a
//! credential, each request carries it as a bearer token; the credential is
//! read from the live session at send time, so login and logout take effect
//! on the next request without rebuilding the gateway.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use inventory_core::{
    AuthApi, ListQuery, Product, ProductApi, ProductDraft, ProductPatch, Role, Session,
};

use crate::error::{Endpoint, Error, Result};
use crate::protocol::{extract_detail, LoginRequest, RegisterRequest, TokenResponse};

/// HTTP gateway implementing the repository traits
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    session: Option<watch::Receiver<Session>>,
}

impl HttpGateway {
    /// Create a gateway that never sends a credential
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create with a custom reqwest [`Client`] (for timeouts, proxies, etc.)
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Result<Self> {
        let base = base_url.into();
        let base = base.trim_end_matches('/');
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(Error::InvalidUrl(base.to_string()));
        }
        Ok(Self {
            client,
            base_url: base.to_string(),
            session: None,
        })
    }

    /// Read the bearer credential from this session channel
    pub fn with_session(mut self, session: watch::Receiver<Session>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn credential(&self) -> Option<String> {
        self.session
            .as_ref()
            .and_then(|rx| rx.borrow().credential.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.client.request(method, self.url(path));
        if let Some(token) = self.credential() {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Send and turn non-2xx responses into [`Error::Status`]
    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let detail = extract_detail(&body);
        warn!(status = status.as_u16(), detail = %detail, "Request rejected");
        Err(Error::Status {
            status: status.as_u16(),
            detail: if detail.is_empty() {
                status.canonical_reason().unwrap_or("Request failed").to_string()
            } else {
                detail
            },
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = self.send(req).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl AuthApi for HttpGateway {
    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> inventory_core::Result<String> {
        debug!("POST /auth/login");
        let req = self
            .request(Method::POST, "/auth/login")
            .json(&LoginRequest { email, password });
        let token: TokenResponse = self
            .send_json(req)
            .await
            .map_err(|e| e.into_core(Endpoint::Login))?;
        Ok(token.access_token)
    }

    #[instrument(skip(self, password))]
    async fn register(&self, email: &str, password: &str, role: Role) -> inventory_core::Result<()> {
        debug!("POST /auth/register");
        let req = self
            .request(Method::POST, "/auth/register")
            .json(&RegisterRequest {
                email,
                password,
                role,
            });
        self.send(req)
            .await
            .map_err(|e| e.into_core(Endpoint::Register))?;
        Ok(())
    }
}

#[async_trait]
impl ProductApi for HttpGateway {
    #[instrument(skip(self))]
    async fn list(&self, query: &ListQuery) -> inventory_core::Result<Vec<Product>> {
        let params = query.to_params();
        debug!(params = ?params, "GET /products/");
        let mut req = self.request(Method::GET, "/products/");
        if !params.is_empty() {
            req = req.query(&params);
        }
        self.send_json(req)
            .await
            .map_err(|e| e.into_core(Endpoint::Products))
    }

    #[instrument(skip(self))]
    async fn get(&self, id: i64) -> inventory_core::Result<Product> {
        let req = self.request(Method::GET, &format!("/products/{}", id));
        self.send_json(req)
            .await
            .map_err(|e| e.into_core(Endpoint::Products))
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn create(&self, draft: &ProductDraft) -> inventory_core::Result<Product> {
        let req = self.request(Method::POST, "/products/").json(draft);
        self.send_json(req)
            .await
            .map_err(|e| e.into_core(Endpoint::Products))
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: i64, patch: &ProductPatch) -> inventory_core::Result<Product> {
        let req = self
            .request(Method::PUT, &format!("/products/{}", id))
            .json(patch);
        self.send_json(req)
            .await
            .map_err(|e| e.into_core(Endpoint::Products))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> inventory_core::Result<()> {
        let req = self.request(Method::DELETE, &format!("/products/{}", id));
        self.send(req)
            .await
            .map_err(|e| e.into_core(Endpoint::Products))?;
        Ok(())
    }
}
