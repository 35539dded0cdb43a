//! Code Stream HTTP Client
//!
//! A small, type-safe client for the Code Stream REST API.
//!
//! Every method is a single authenticated request: the bearer token of the
//! active target is attached, `apiVersion` is pinned, and non-2xx replies
//! are decoded from the service's error envelope into [`ClientError::Service`].
//!
//! # Example
//!
//! ```no_run
//! use codestream_client::CodeStreamClient;
//! use codestream_core::query::ResourceQuery;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CodeStreamClient::connect("https://vra.example.com", false)?
//!         .with_access_token("eyJhbGciOi...");
//!
//!     let failed = client
//!         .get_executions(&ResourceQuery::new().with_status("failed"))
//!         .await?;
//!
//!     println!("{} failed execution(s)", failed.len());
//!     Ok(())
//! }
//! ```

pub mod auth;
mod custom_integrations;
pub mod error;
mod executions;
mod pipelines;

pub use auth::{Credentials, Session};
pub use error::{ClientError, Result};

use codestream_core::dto::error::ServiceError;
use codestream_core::query::API_VERSION;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

/// HTTP client for the Code Stream API
///
/// Methods are organized into logical groups:
/// - Authentication (login, token exchange, token check)
/// - Pipelines (list, get, patch, delete, import, export)
/// - Executions (list, get, trigger, delete)
/// - Custom integrations (list, get, create, update, delete)
#[derive(Debug, Clone)]
pub struct CodeStreamClient {
    /// Base URL of the service (e.g., "https://vra.example.com")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Bearer token sent with resource requests
    access_token: Option<String>,
}

impl CodeStreamClient {
    /// Create a new client with default HTTP settings
    ///
    /// # Example
    /// ```
    /// use codestream_client::CodeStreamClient;
    ///
    /// let client = CodeStreamClient::new("https://vra.example.com/");
    /// assert_eq!(client.base_url(), "https://vra.example.com");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client, optionally skipping TLS certificate verification
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the service
    /// * `ignore_cert` - Accept invalid or self-signed certificates
    pub fn connect(base_url: impl Into<String>, ignore_cert: bool) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(ignore_cert)
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            access_token: None,
        }
    }

    /// Attach the bearer token used for resource requests
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.set_access_token(token);
        self
    }

    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Request Builders
    // =============================================================================

    /// Request without credentials
    fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "sending request");
        self.client.request(method, url)
    }

    /// Request carrying the bearer token, if one is set
    fn authorized(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.anonymous(method, path);
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// JSON API request with the pinned `apiVersion`
    fn api(&self, method: Method, path: &str) -> RequestBuilder {
        self.authorized(method, path)
            .header(ACCEPT, "application/json")
            .query(&[("apiVersion", API_VERSION)])
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status, then deserialize the JSON body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("Failed to parse JSON response: {}", e)))
    }

    /// Check the status, then return the raw body
    async fn handle_text_response(&self, response: reqwest::Response) -> Result<String> {
        let response = Self::check_status(response).await?;
        Ok(response.text().await?)
    }

    /// Turn a non-2xx response into a service error
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let reason = status.canonical_reason().unwrap_or("Unknown error");
        let message = ServiceError::describe(&body, reason);
        debug!(status = status.as_u16(), %message, "service returned an error");

        Err(ClientError::service(status.as_u16(), message))
    }
}
