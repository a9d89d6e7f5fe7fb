//! # Transport
//!
//! The HTTP seam under the resource proxy. [`ReqwestTransport`] talks to a remote
//! server; [`RouterTransport`] drives an in-process [`axum::Router`] and is what
//! the integration tests use. [`MockTransport`](crate::mock::MockTransport)
//! replays canned responses.

use crate::error::CrudError;
use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// An outgoing request, already addressed and encoded.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl TransportRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach an encoded JSON body.
    pub fn json(mut self, body: Vec<u8>) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(body);
        self
    }
}

/// Status and body text of an answered request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends a request and returns whatever status the peer answered with.
///
/// Only failures to get an answer at all are errors here; status mapping is left
/// to the caller.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn exchange(&self, request: TransportRequest) -> Result<TransportResponse, CrudError>;
}

fn transport_error(err: impl std::fmt::Display) -> CrudError {
    CrudError::Upstream {
        status: None,
        body: err.to_string(),
    }
}

/// Remote transport backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (timeouts, proxies, TLS roots).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn exchange(&self, request: TransportRequest) -> Result<TransportResponse, CrudError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        Ok(TransportResponse { status, body })
    }
}

/// In-process transport: every request is served by a clone of `router`.
#[derive(Clone)]
pub struct RouterTransport {
    router: Router,
}

impl RouterTransport {
    pub fn new(router: Router) -> Self {
        Self { router }
    }
}

#[async_trait]
impl Transport for RouterTransport {
    async fn exchange(&self, request: TransportRequest) -> Result<TransportResponse, CrudError> {
        let mut http_request = Request::builder()
            .method(request.method)
            .uri(request.url.as_str())
            .body(Body::from(request.body.unwrap_or_default()))
            .map_err(transport_error)?;
        *http_request.headers_mut() = request.headers;

        let response = match self.router.clone().oneshot(http_request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(transport_error)?
            .to_bytes();
        Ok(TransportResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
