//! Lottie animation client.
//!
//! The animation is plain JSON fetched from a public URL. A successful fetch
//! is cached for an hour; a failed one is not cached, so the next home page
//! render tries again.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tracing::instrument;

/// How long a fetched animation is reused.
const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Request timeout; the home page waits for this at most.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors fetching the animation.
#[derive(Debug, Error)]
pub enum LottieError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

/// Client for the home page animation.
#[derive(Clone)]
pub struct LottieClient {
    inner: Arc<LottieClientInner>,
}

struct LottieClientInner {
    client: reqwest::Client,
    url: String,
    cache: Cache<String, Arc<serde_json::Value>>,
}

impl LottieClient {
    /// Create a client for the animation at `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(CACHE_TTL)
            .build();

        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(LottieClientInner {
                client,
                url: url.into(),
                cache,
            }),
        }
    }

    /// The animation JSON, or `None` if it cannot be fetched.
    #[instrument(skip(self), fields(url = %self.inner.url))]
    pub async fn animation(&self) -> Option<Arc<serde_json::Value>> {
        let result = self
            .inner
            .cache
            .try_get_with(self.inner.url.clone(), self.fetch())
            .await;

        match result {
            Ok(animation) => Some(animation),
            Err(e) => {
                tracing::warn!(error = %e, "Lottie animation not loaded");
                None
            }
        }
    }

    async fn fetch(&self) -> Result<Arc<serde_json::Value>, LottieError> {
        let response = self.inner.client.get(&self.inner.url).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(LottieError::Status(status));
        }

        let animation: serde_json::Value = response.json().await?;
        tracing::debug!("Lottie animation fetched");
        Ok(Arc::new(animation))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Json, Router, http::StatusCode, routing::get};

    use super::*;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_animation_is_fetched() {
        let base = serve(Router::new().route(
            "/anim.json",
            get(|| async { Json(serde_json::json!({"v": "5.7.4", "layers": []})) }),
        ))
        .await;

        let client = LottieClient::new(format!("{base}/anim.json"));
        let animation = client.animation().await.unwrap();
        assert_eq!(animation["v"], "5.7.4");
    }

    #[tokio::test]
    async fn test_non_200_is_none() {
        let base = serve(Router::new().route(
            "/anim.json",
            get(|| async { StatusCode::NOT_FOUND }),
        ))
        .await;

        let client = LottieClient::new(format!("{base}/anim.json"));
        assert!(client.animation().await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_none() {
        let client = LottieClient::new("http://127.0.0.1:9/anim.json");
        assert!(client.animation().await.is_none());
    }
}
