//! CMS Backend Client
//!
//! HTTP client for the Kayan Pro REST API. Every call attaches the session's
//! bearer token; a 401 from any endpoint clears the session and yields
//! `None` instead of a value.

mod dto;
mod error;
mod resources;

pub use dto::{HealthResponse, LoginRequest, LoginResponse, SendMessageRequest};
pub use error::{ClientError, ClientResult};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::session::{LogoutReason, Session};

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Options for a single API call
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn post(body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            headers: HeaderMap::new(),
            body: Some(body),
        }
    }

    /// Add a caller header; `Authorization` is ignored at send time
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Kayan Pro REST API client
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    /// Create a client for the configured backend
    pub fn new(config: &ApiConfig, session: Arc<Session>) -> ClientResult<Self> {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        Self::with_base_url(&config.resolve_base_url(), session, timeout)
    }

    /// Create a client for an explicit base URL
    pub fn with_base_url(
        base_url: &str,
        session: Arc<Session>,
        timeout: Option<Duration>,
    ) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Build)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Issue a JSON request against the backend.
    ///
    /// Returns `Ok(None)` when the backend rejected the session; the session
    /// has been cleared by then and the caller should abort.
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ClientResult<Option<T>> {
        let token = self.session.token().await;
        let headers = merge_headers(&options.headers, token.as_deref(), true)?;
        let request_id = request_id(&headers);

        let mut request = self
            .http
            .request(options.method.clone(), self.url(endpoint))
            .headers(headers);
        if let Some(body) = &options.body {
            let bytes = serde_json::to_vec(body).map_err(|e| ClientError::Decode {
                endpoint: endpoint.to_string(),
                error: e.to_string(),
            })?;
            request = request.body(bytes);
        }

        tracing::debug!(
            request_id = %request_id,
            method = %options.method,
            endpoint = %endpoint,
            "Calling backend"
        );

        match self.dispatch(endpoint, &request_id, request).await? {
            Some(response) => decode(endpoint, response).await.map(Some),
            None => Ok(None),
        }
    }

    /// Log in with operator credentials.
    ///
    /// Any non-success status means invalid credentials.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<bool> {
        let endpoint = "/api/auth/login";

        let response = self
            .http
            .post(self.url(endpoint))
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| ClientError::transport(endpoint, e))?;

        if !response.status().is_success() {
            tracing::info!(status = response.status().as_u16(), "Login rejected");
            return Ok(false);
        }

        let login: LoginResponse = decode(endpoint, response).await?;
        self.session.set(login.access_token).await?;
        tracing::info!(username = %username, "Logged in");
        Ok(true)
    }

    /// End the operator session
    pub async fn logout(&self) -> ClientResult<()> {
        self.session.clear(LogoutReason::Operator).await?;
        Ok(())
    }

    /// Upload one file as multipart form field `file`
    pub async fn upload_media(&self, path: &Path) -> ClientResult<Option<serde_json::Value>> {
        let endpoint = "/api/media/upload";

        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::File {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.clone())
            .mime_str(mime_for(path))
            .map_err(|e| ClientError::transport(endpoint, e))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let token = self.session.token().await;
        let headers = merge_headers(&HeaderMap::new(), token.as_deref(), false)?;
        let request_id = request_id(&headers);

        tracing::debug!(request_id = %request_id, file = %filename, "Uploading media");

        let request = self
            .http
            .post(self.url(endpoint))
            .headers(headers)
            .multipart(form);

        match self.dispatch(endpoint, &request_id, request).await? {
            Some(response) => decode(endpoint, response).await.map(Some),
            None => Ok(None),
        }
    }

    /// Send a request and apply the uniform status handling
    async fn dispatch(
        &self,
        endpoint: &str,
        request_id: &str,
        request: RequestBuilder,
    ) -> ClientResult<Option<Response>> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::transport(endpoint, e))?;
        let status = response.status();

        tracing::debug!(
            request_id = %request_id,
            endpoint = %endpoint,
            status = status.as_u16(),
            "Backend responded"
        );

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(request_id = %request_id, endpoint = %endpoint, "Session rejected by backend");
            self.session.clear(LogoutReason::Expired).await?;
            return Ok(None);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(Some(response))
    }
}

/// Build outgoing headers.
///
/// JSON content type first, caller headers over it, then the session's
/// bearer token. Caller `Authorization` headers are dropped so a cleared
/// session never sends one.
pub fn merge_headers(
    caller: &HeaderMap,
    token: Option<&str>,
    json: bool,
) -> ClientResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    if json {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    headers.insert(
        HeaderName::from_static(REQUEST_ID_HEADER),
        HeaderValue::from_str(&request_id).map_err(|e| ClientError::InvalidHeader(e.to_string()))?,
    );

    for (name, value) in caller.iter() {
        if name != AUTHORIZATION {
            headers.insert(name.clone(), value.clone());
        }
    }

    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ClientError::InvalidHeader(e.to_string()))?;
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> ClientResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ClientError::transport(endpoint, e))?;

    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode {
        endpoint: endpoint.to_string(),
        error: e.to_string(),
    })
}

fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}
