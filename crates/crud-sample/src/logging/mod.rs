//! # Request Logging
//!
//! An axum middleware that logs one event per handled request: method, the
//! (shortened) URI, the status and optionally the handling time. Successful
//! answers are logged at `log-level`, 4xx/5xx answers at `error-log-level`.

pub mod shorten;

use crate::config::{LogLevel, LoggingConfig};
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use std::time::Instant;

pub async fn log_requests(
    State(config): State<Arc<LoggingConfig>>,
    request: Request,
    next: Next,
) -> Response {
    if !config.enabled {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let uri = shorten::left(
        &request.uri().to_string(),
        config.trim_length,
        shorten::ELLIPSIS,
    );
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = config
        .duration
        .then(|| u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX));
    let level = if status.is_client_error() || status.is_server_error() {
        config.error_log_level
    } else {
        config.log_level
    };
    log_at_level(level, &method, &uri, status, elapsed_ms);

    response
}

fn log_at_level(level: LogLevel, method: &Method, uri: &str, status: StatusCode, elapsed_ms: Option<u64>) {
    let status = status.as_u16();
    match level {
        LogLevel::Trace => tracing::trace!(%method, uri, status, elapsed_ms, "Request"),
        LogLevel::Debug => tracing::debug!(%method, uri, status, elapsed_ms, "Request"),
        LogLevel::Info => tracing::info!(%method, uri, status, elapsed_ms, "Request"),
        LogLevel::Warn => tracing::warn!(%method, uri, status, elapsed_ms, "Request"),
        LogLevel::Error => tracing::error!(%method, uri, status, elapsed_ms, "Request"),
        LogLevel::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::{middleware, Router};
    use crud_framework::{RouterTransport, Transport, TransportRequest};

    fn app(config: LoggingConfig) -> RouterTransport {
        let router = Router::new()
            .route("/ok", get(|| async { "fine" }))
            .route("/teapot", get(|| async { (StatusCode::IM_A_TEAPOT, "short") }))
            .layer(middleware::from_fn_with_state(Arc::new(config), log_requests));
        RouterTransport::new(router)
    }

    async fn call(transport: &RouterTransport, path: &str) -> (StatusCode, String) {
        let response = transport
            .exchange(TransportRequest::new(Method::GET, format!("http://localhost{path}")))
            .await
            .unwrap();
        (response.status, response.body)
    }

    #[tokio::test]
    async fn test_responses_pass_through() {
        let transport = app(LoggingConfig {
            trim_length: 5,
            ..LoggingConfig::default()
        });

        assert_eq!(call(&transport, "/ok").await, (StatusCode::OK, "fine".to_string()));
        assert_eq!(
            call(&transport, "/teapot?verbose=true").await,
            (StatusCode::IM_A_TEAPOT, "short".to_string())
        );
    }

    #[tokio::test]
    async fn test_disabled_and_silenced_logging() {
        let disabled = app(LoggingConfig {
            enabled: false,
            ..LoggingConfig::default()
        });
        let silenced = app(LoggingConfig {
            error_log_level: LogLevel::None,
            duration: false,
            ..LoggingConfig::default()
        });

        assert_eq!(call(&disabled, "/ok").await.0, StatusCode::OK);
        assert_eq!(call(&silenced, "/teapot").await.0, StatusCode::IM_A_TEAPOT);
    }
}
