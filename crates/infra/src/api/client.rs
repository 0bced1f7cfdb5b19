//! API client dispatching authenticated calls
//!
//! Every verb goes through one path: build and encode the request, resolve the
//! bearer token, pick the transport for the current mTLS settings, send once. A
//! non-success status becomes [`BanklyError::ApiRequest`] with the body kept
//! verbatim. Nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use bankly_domain::constants::{DEFAULT_API_URL, DEFAULT_API_VERSION};
use bankly_domain::{ApiConfig, BanklyError, MtlsConfig, Result, TransportErrorKind};
use parking_lot::RwLock;
use reqwest::{Method, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::auth::AccessTokenProvider;
use super::request::{merge_headers, CallOptions, HeaderList, RequestBody, RequestSpec};
use crate::errors::InfraError;
use crate::http::{ClientPool, HttpSettings};

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for API (e.g., "https://api.sandbox.bankly.com.br")
    pub base_url: String,
    /// Sent as `api-version` on every call
    pub api_version: String,
    /// Timeout for API requests
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(api: &ApiConfig) -> Self {
        Self {
            base_url: api.base_url.clone(),
            api_version: api.api_version.clone(),
            timeout: Duration::from_secs(api.timeout_secs),
            user_agent: api.user_agent.clone(),
        }
    }
}

impl ApiClientConfig {
    pub(crate) fn http_settings(&self) -> HttpSettings {
        HttpSettings { timeout: self.timeout, user_agent: self.user_agent.clone() }
    }
}

/// Body of a GET answered in raw mode (PDFs and other binaries)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Mutable per-client settings
#[derive(Debug, Default)]
struct ClientState {
    token: Option<String>,
    headers: HeaderList,
    mtls: MtlsConfig,
}

/// API client bound to one base URL and one token source
pub struct ApiClient {
    clients: Arc<ClientPool>,
    auth: Arc<dyn AccessTokenProvider>,
    base_url: Url,
    config: ApiClientConfig,
    state: RwLock<ClientState>,
}

impl ApiClient {
    /// Create a new API client with its own transport pool
    ///
    /// # Errors
    ///
    /// Returns `Config` if the base URL is invalid or the HTTP client cannot
    /// be created
    pub fn new(config: ApiClientConfig, auth: Arc<dyn AccessTokenProvider>) -> Result<Self> {
        let clients = Arc::new(ClientPool::new(config.http_settings())?);
        Self::with_pool(config, auth, clients)
    }

    /// Create a client sharing an existing transport pool
    ///
    /// # Errors
    ///
    /// Returns `Config` if the base URL is invalid
    pub fn with_pool(
        config: ApiClientConfig,
        auth: Arc<dyn AccessTokenProvider>,
        clients: Arc<ClientPool>,
    ) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| BanklyError::Config(format!("Invalid base URL {}: {}", config.base_url, e)))?;

        Ok(Self { clients, auth, base_url, config, state: RwLock::new(ClientState::default()) })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Use `token` for every later call instead of the token provider
    pub fn set_token(&self, token: impl Into<String>) {
        self.state.write().token = Some(token.into());
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    /// Merge `headers` into the client-wide headers
    pub fn set_headers(&self, headers: &[(String, String)]) {
        let mut state = self.state.write();
        state.headers = merge_headers(&state.headers, headers);
    }

    pub fn headers(&self) -> HeaderList {
        self.state.read().headers.clone()
    }

    /// Change the mTLS settings used by later calls
    pub fn update_mtls(&self, update: impl FnOnce(&mut MtlsConfig)) {
        update(&mut self.state.write().mtls);
    }

    pub fn mtls(&self) -> MtlsConfig {
        self.state.read().mtls.clone()
    }

    /// Execute a GET request, returning parsed JSON
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; an undecodable success body is a
    /// `Transport(Decode)` error
    pub async fn get(&self, path: &str, query: Vec<(String, String)>, options: CallOptions) -> Result<Value> {
        let spec = RequestSpec::new(Method::GET, path).query(query).options(options);
        let response = self.execute(spec).await?;
        read_json(response).await
    }

    /// Execute a GET request, returning the body bytes untouched
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]
    pub async fn get_raw(
        &self,
        path: &str,
        query: Vec<(String, String)>,
        options: CallOptions,
    ) -> Result<RawResponse> {
        let spec = RequestSpec::new(Method::GET, path).query(query).options(options);
        let response = self.execute(spec).await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(InfraError::from)?.to_vec();

        Ok(RawResponse { status, content_type, body })
    }

    /// Execute a POST request
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]
    pub async fn post(&self, path: &str, body: RequestBody, options: CallOptions) -> Result<Value> {
        self.send_json(Method::POST, path, body, options).await
    }

    /// Execute a PUT request
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]
    pub async fn put(&self, path: &str, body: RequestBody, options: CallOptions) -> Result<Value> {
        self.send_json(Method::PUT, path, body, options).await
    }

    /// Execute a PATCH request
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]
    pub async fn patch(&self, path: &str, body: RequestBody, options: CallOptions) -> Result<Value> {
        self.send_json(Method::PATCH, path, body, options).await
    }

    /// Execute a DELETE request
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]
    pub async fn delete(&self, path: &str, body: RequestBody, options: CallOptions) -> Result<Value> {
        self.send_json(Method::DELETE, path, body, options).await
    }

    async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: CallOptions,
    ) -> Result<Value> {
        let spec = RequestSpec::new(method, path).body(body).options(options);
        let response = self.execute(spec).await?;
        read_json(response).await
    }

    /// Perform one call and fail on non-success statuses
    ///
    /// # Errors
    ///
    /// - `Authentication` if no token can be obtained
    /// - `Transport` for network, TLS, or timeout failures
    /// - `ApiRequest` for 4xx/5xx answers, carrying status and body
    #[instrument(skip(self, spec), fields(method = %spec.method, path = %spec.path))]
    pub async fn execute(&self, spec: RequestSpec) -> Result<Response> {
        let (explicit_token, client_headers, mtls) = {
            let state = self.state.read();
            (state.token.clone(), state.headers.clone(), state.mtls.clone())
        };

        let outbound = spec.build(&self.base_url, &self.config.api_version, &client_headers)?;
        let correlation_id = outbound.correlation_id.clone();
        let prepared = outbound.prepare()?;

        let client = self.clients.client_for(&mtls)?;

        let token = match explicit_token {
            Some(token) => token,
            None => self.auth.access_token().await?,
        };

        debug!(correlation_id = ?correlation_id, mtls = mtls.is_complete(), "dispatching request");

        let response = client.send(prepared.into_request(&client, &token)).await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let raw_body = response.text().await.map_err(|e| {
                BanklyError::transport(
                    TransportErrorKind::Decode,
                    format!("cannot read {status} response body: {e}"),
                )
            })?;
            warn!(status = status.as_u16(), "API returned non-success status");
            return Err(BanklyError::api_request(status.as_u16(), raw_body));
        }

        info!(status = status.as_u16(), "request successful");
        Ok(response)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_version", &self.config.api_version)
            .field("explicit_token", &state.token.is_some())
            .field("headers", &state.headers)
            .field("mtls", &state.mtls)
            .finish_non_exhaustive()
    }
}

/// Parse a success body; empty bodies and 204/205 are `Null`
async fn read_json(response: Response) -> Result<Value> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
        return Ok(Value::Null);
    }

    let bytes = response.bytes().await.map_err(InfraError::from)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&bytes).map_err(|e| {
        BanklyError::transport(TransportErrorKind::Decode, format!("response body is not JSON: {e}"))
    })
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
    clients: Option<Arc<ClientPool>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the authentication provider
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Share a transport pool
    pub fn clients(mut self, clients: Arc<ClientPool>) -> Self {
        self.clients = Some(clients);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if required fields are missing or client creation fails
    pub fn build(self) -> Result<ApiClient> {
        let config = self.config.unwrap_or_default();
        let auth =
            self.auth.ok_or_else(|| BanklyError::Config("Auth provider not set".to_string()))?;

        match self.clients {
            Some(clients) => ApiClient::with_pool(config, auth, clients),
            None => ApiClient::new(config, auth),
        }
    }
}
