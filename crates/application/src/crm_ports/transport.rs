use std::fmt::{Debug, Formatter};
use std::time::Duration;

use async_trait::async_trait;
use dynsync_core::TransportError;
use serde_json::Value;

/// HTTP methods used against the identity provider and the CRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrmMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PATCH`
    Patch,
}

impl CrmMethod {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
        }
    }
}

/// Request body variants.
///
/// `Debug` shows form keys only; values may hold the client secret.
#[derive(Clone, PartialEq)]
pub enum CrmRequestBody {
    /// No body.
    Empty,
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
    /// `application/json` document.
    Json(Value),
}

impl Debug for CrmRequestBody {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => formatter.write_str("Empty"),
            Self::Form(fields) => formatter
                .debug_tuple("Form")
                .field(&fields.iter().map(|(key, _)| key.as_str()).collect::<Vec<_>>())
                .finish(),
            Self::Json(_) => formatter.debug_tuple("Json").finish_non_exhaustive(),
        }
    }
}

/// Outgoing request handed to a [`CrmTransport`].
///
/// Transports always send `Accept: application/json` and must verify TLS
/// certificates.
#[derive(Clone, PartialEq)]
pub struct CrmRequest {
    /// HTTP method.
    pub method: CrmMethod,
    /// Absolute request URL.
    pub url: String,
    /// Bearer token for the `Authorization` header.
    pub bearer_token: Option<String>,
    /// Request body.
    pub body: CrmRequestBody,
    /// Per-request timeout; `None` inherits the transport default.
    pub timeout: Option<Duration>,
}

impl CrmRequest {
    fn new(method: CrmMethod, url: impl Into<String>, body: CrmRequestBody) -> Self {
        Self {
            method,
            url: url.into(),
            bearer_token: None,
            body,
            timeout: None,
        }
    }

    /// Creates a `GET` request without body.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(CrmMethod::Get, url, CrmRequestBody::Empty)
    }

    /// Creates a form-encoded `POST` request.
    #[must_use]
    pub fn post_form(url: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self::new(CrmMethod::Post, url, CrmRequestBody::Form(fields))
    }

    /// Creates a JSON `POST` request.
    #[must_use]
    pub fn post_json(url: impl Into<String>, body: Value) -> Self {
        Self::new(CrmMethod::Post, url, CrmRequestBody::Json(body))
    }

    /// Creates a JSON `PATCH` request.
    #[must_use]
    pub fn patch_json(url: impl Into<String>, body: Value) -> Self {
        Self::new(CrmMethod::Patch, url, CrmRequestBody::Json(body))
    }

    /// Attaches a bearer token.
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Debug for CrmRequest {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let body = match &self.body {
            CrmRequestBody::Empty => "empty",
            CrmRequestBody::Form(_) => "form",
            CrmRequestBody::Json(_) => "json",
        };

        formatter
            .debug_struct("CrmRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("authorized", &self.bearer_token.is_some())
            .field("body", &body)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrmResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text; empty for `204 No Content`.
    pub body: String,
}

impl CrmResponse {
    /// Creates a response value.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Port for the HTTPS calls made by the sync client.
///
/// Any received status code, including 4xx and 5xx, is a successful
/// exchange; only failures before a status arrives are errors.
#[async_trait]
pub trait CrmTransport: Send + Sync {
    /// Sends the request and returns the response status and body.
    async fn execute(&self, request: CrmRequest) -> Result<CrmResponse, TransportError>;
}
