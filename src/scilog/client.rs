//! HTTP transport for the SciLog REST API.
//!
//! The facade talks to the service through the [`Transport`] trait;
//! [`HttpTransport`] is the reqwest-backed implementation. Connection settings
//! come from [`ClientConfig`](crate::config::ClientConfig):
//! - `SCILOG_URL` - Base URL (default: `http://localhost:3000/api/v1`)
//! - `SCILOG_TOKEN` - Bearer token from a previous login (optional)

use std::time::Duration;

use reqwest::{header, multipart, Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::config::ClientConfig;

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: login required or token expired")]
    Unauthorized,

    #[error("Server error: {0}")]
    Server(String),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A file to be sent as a multipart upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    /// `image/<ext>` or `file/<ext>`.
    pub content_type: String,
    pub content: Vec<u8>,
    /// Sidecar sent as the JSON-encoded `fields` part.
    pub fields: Map<String, Value>,
}

/// Requests the facade issues against the service.
///
/// Responses are returned as raw JSON; an empty success body is `Value::Null`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// GET `path`, with an optional encoded filter from [`make_filter`].
    async fn get(&self, path: &str, filter: Option<&str>) -> Result<Value, ClientError>;

    async fn post(&self, path: &str, payload: &Value) -> Result<Value, ClientError>;

    /// POST a multipart form with a `file` part and a `fields` part.
    async fn post_file(&self, path: &str, upload: FileUpload) -> Result<Value, ClientError>;

    async fn patch(&self, path: &str, payload: &Value) -> Result<Value, ClientError>;
}

/// Encode an equality filter as the service's `filter` query parameter.
pub fn make_filter(conditions: &Map<String, Value>) -> String {
    json!({ "where": conditions }).to_string()
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl HttpTransport {
    /// Create with explicit configuration and reqwest defaults.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client: Client::new(),
        }
    }

    /// Create from a loaded [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.address.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            client,
        })
    }

    /// Exchange credentials for a token and keep it for subsequent requests.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<&str, ClientError> {
        let response = self
            .request(Method::POST, "/users/login")
            .json(&json!({ "principal": username, "password": password }))
            .send()
            .await?;
        let login: LoginResponse = serde_json::from_value(self.handle_response(response).await?)?;
        tracing::debug!("Logged in to {} as {}", self.base_url, username);
        Ok(self.token.insert(login.token).as_str())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Build a request with optional auth header.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .client
            .request(method, &url)
            .header(header::ACCEPT, "application/json");
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Value, ClientError> {
        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            if body.is_empty() {
                // 204 No Content on PATCH
                return Ok(Value::Null);
            }
            Ok(serde_json::from_slice(&body)?)
        } else {
            let body = response.text().await.unwrap_or_default();
            match status {
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    Err(ClientError::BadRequest(body))
                }
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                _ => Err(ClientError::Server(format!("{}: {}", status, body))),
            }
        }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, path: &str, filter: Option<&str>) -> Result<Value, ClientError> {
        let mut req = self.request(Method::GET, path);
        if let Some(filter) = filter {
            req = req.query(&[("filter", filter)]);
        }
        let response = req.send().await?;
        self.handle_response(response).await
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<Value, ClientError> {
        let response = self
            .request(Method::POST, path)
            .json(payload)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn post_file(&self, path: &str, upload: FileUpload) -> Result<Value, ClientError> {
        let file_part = multipart::Part::bytes(upload.content)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        let form = multipart::Form::new()
            .part("file", file_part)
            .text("fields", Value::Object(upload.fields).to_string());

        let response = self
            .request(Method::POST, path)
            .multipart(form)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn patch(&self, path: &str, payload: &Value) -> Result<Value, ClientError> {
        let response = self
            .request(Method::PATCH, path)
            .json(payload)
            .send()
            .await?;
        self.handle_response(response).await
    }
}
