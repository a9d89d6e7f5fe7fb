//! # Mock Transport
//!
//! `MockTransport` answers requests from a queue of expectations instead of a
//! network. Use it to unit test code built on the resource proxy: status mapping,
//! URL construction, query encoding and error propagation.
//!
//! ```rust
//! use crud_framework::mock::MockTransport;
//! use crud_framework::RestResource;
//! use http::{Method, StatusCode};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Deserialize)]
//! struct Company { id: String }
//! #[derive(Serialize)]
//! struct CompanyWrite { name: String }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockTransport::new();
//!     mock.expect(Method::GET, "http://host/api/company/c1")
//!         .respond(StatusCode::OK, r#"{"id":"c1"}"#);
//!
//!     let companies: RestResource<String, Company, CompanyWrite> =
//!         RestResource::new(mock.transport(), "http://host/api/company");
//!     let company = companies.get_by_id(&"c1".to_string()).await.unwrap();
//!     assert_eq!(company.unwrap().id, "c1");
//!
//!     mock.verify();
//! }
//! ```
//!
//! A request that does not match the next expectation is answered with a
//! transport failure, and `verify()` panics while expectations remain.

use crate::error::CrudError;
use crate::transport::{Transport, TransportRequest, TransportResponse};
use async_trait::async_trait;
use http::{Method, StatusCode};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct Expectation {
    method: Method,
    url: String,
    response: Result<TransportResponse, CrudError>,
}

/// A [`Transport`] that replays queued responses in order.
#[derive(Clone, Default)]
pub struct MockTransport {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A shareable handle for building proxies; expectations stay visible here.
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }

    /// Expect `method` on exactly `url` (query string included).
    pub fn expect(&self, method: Method, url: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            url: url.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<TransportRequest> {
        lock(&self.requests).clone()
    }

    /// Panics if any expectation was not consumed.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Builder for one expected request.
pub struct ExpectationBuilder {
    method: Method,
    url: String,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ExpectationBuilder {
    pub fn respond(self, status: StatusCode, body: impl Into<String>) {
        self.push(Ok(TransportResponse::new(status, body)));
    }

    pub fn respond_json<T: Serialize>(self, status: StatusCode, body: &T) {
        let body = serde_json::to_string(body).map_err(CrudError::from);
        self.push(body.map(|body| TransportResponse::new(status, body)));
    }

    /// Fail the exchange itself, as a dropped connection would.
    pub fn fail(self, error: CrudError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<TransportResponse, CrudError>) {
        lock(&self.expectations).push_back(Expectation {
            method: self.method,
            url: self.url,
            response,
        });
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn exchange(&self, request: TransportRequest) -> Result<TransportResponse, CrudError> {
        let method = request.method.clone();
        let url = request.url.clone();
        lock(&self.requests).push(request);

        let expectation = lock(&self.expectations).pop_front();
        match expectation {
            Some(expected) if expected.method == method && expected.url == url => {
                expected.response
            }
            Some(expected) => Err(CrudError::Upstream {
                status: None,
                body: format!(
                    "expected {} {}, got {method} {url}",
                    expected.method, expected.url
                ),
            }),
            None => Err(CrudError::Upstream {
                status: None,
                body: format!("unexpected request {method} {url}"),
            }),
        }
    }
}
