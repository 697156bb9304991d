//! HTTP transport seam.
//!
//! The service builds [`TransportRequest`] values and hands them to a
//! [`Transport`]. [`HttpTransport`] sends them with reqwest; tests substitute
//! scripted transports.

use crate::config::StudioConfig;
use crate::error::{ConfigError, ServiceApiError};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::debug;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// A single outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl TransportRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and decoded JSON body of a response.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: StatusCode,
    /// `None` when the server sent no body.
    pub body: Option<Value>,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: Option<Value>) -> Self {
        Self { status, body }
    }

    /// Decode raw body bytes. Empty or whitespace-only bodies count as absent.
    ///
    /// Error statuses often carry HTML or plain text; those bodies are kept
    /// as a JSON string instead of failing to decode.
    pub fn from_bytes(status: StatusCode, bytes: &[u8]) -> Result<Self, ServiceApiError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new(status, None));
        }
        match serde_json::from_slice(bytes) {
            Ok(body) => Ok(Self::new(status, Some(body))),
            Err(_) if !status.is_success() => {
                let text = String::from_utf8_lossy(bytes).into_owned();
                Ok(Self::new(status, Some(Value::String(text))))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Body text for error messages.
    pub fn body_text(&self) -> String {
        match &self.body {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request/response round trip.
    ///
    /// Non-2xx statuses are returned as responses, not errors; only failures
    /// to obtain or decode a response are errors.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, ServiceApiError>;
}

/// Transport backed by a shared reqwest client.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Build a client honouring the configured timeouts.
    pub fn from_config(config: &StudioConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, ServiceApiError> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self.client.request(request.method, &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        debug!("{} ({} bytes)", status, bytes.len());

        TransportResponse::from_bytes(status, &bytes)
    }
}
