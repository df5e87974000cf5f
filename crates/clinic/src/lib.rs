//! TecHealth Clinic library.
//!
//! The patient exercise dashboard: six sidebar pages (Home, Data, View
//! Data, Masters, Analysis, Video). Everything but Home sits behind the
//! sidebar login against `credentials.xlsx`. Records live in `.xlsx` files
//! in the data directory and are re-read on every request.
//!
//! The router is built here so the binary and the integration tests serve
//! the same application.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod camera;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod views;

use axum::{Router, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the clinic application with sessions and request tracing.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::ClinicConfig;

    fn test_app(dir: &std::path::Path) -> Router {
        let data_dir = dir.display().to_string();
        let config = ClinicConfig::from_lookup(|key| match key {
            "CLINIC_DATA_DIR" => Some(data_dir.clone()),
            "CLINIC_LOTTIE_URL" => Some("http://127.0.0.1:9/animation.json".to_string()),
            _ => None,
        })
        .unwrap();
        app(AppState::new(config).unwrap())
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(test_app(dir.path()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_gated_pages_show_login_warning() {
        let dir = tempfile::tempdir().unwrap();
        for uri in ["/data", "/view-data", "/masters", "/analysis", "/video"] {
            let (status, body) = get(test_app(dir.path()), uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert!(body.contains(views::LOGIN_REQUIRED), "{uri}");
        }
        assert!(!dir.path().join("datos_pacientes.xlsx").exists());
    }

    #[tokio::test]
    async fn test_stream_requires_login() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _) = get(test_app(dir.path()), "/video/stream").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_select_by_label() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(dir.path())
            .oneshot(
                Request::get("/select?page=View%20Data")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()["location"], "/view-data");

        let (status, _) = get(test_app(dir.path()), "/select?page=Settings").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
