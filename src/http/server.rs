//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Serve until a shutdown signal arrives

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::fetch::Fetcher;
use crate::http::handlers::{get_status, index, liveness, liveness_head, proxy_handler};
use crate::http::request::assign_request_id;
use crate::lifecycle::shutdown_signal;
use crate::rewrite::RewritePipeline;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Fetcher,
    pub pipeline: Arc<RewritePipeline>,
    pub proxy_path: Arc<str>,
    pub started_at: Instant,
}

impl AppState {
    /// Build handler state from configuration.
    pub fn new(config: &ProxyConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            fetcher: Fetcher::new(&config.upstream)?,
            pipeline: Arc::new(RewritePipeline::new(&config.rewrite)),
            proxy_path: Arc::from(config.rewrite.proxy_path.as_str()),
            started_at: Instant::now(),
        })
    }
}

/// HTTP server for the rewriting proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let state = AppState::new(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route(&config.rewrite.proxy_path, get(proxy_handler))
            .route("/", get(index))
            .route("/api/status", get(get_status))
            .route("/api/test", get(liveness).head(liveness_head))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn(assign_request_id))
            .layer(TraceLayer::new_for_http())
    }

    /// The configured router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until Ctrl+C, SIGTERM or a broadcast on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            proxy_path = %self.config.rewrite.proxy_path,
            upstream_timeout_secs = self.config.upstream.timeout_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        HttpServer::new(ProxyConfig::default()).unwrap().router()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_url_is_bad_request() {
        for uri in ["/proxy", "/proxy?url=", "/proxy?other=1"] {
            let response = router()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body_text(response).await, "URL não fornecida");
        }
    }

    #[tokio::test]
    async fn test_invalid_url_is_server_error() {
        let response = router()
            .oneshot(Request::get("/proxy?url=notaurl").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.starts_with("Erro ao acessar a URL: "));
    }

    #[tokio::test]
    async fn test_request_id_assigned_and_echoed() {
        let response = router()
            .oneshot(Request::get("/api/test").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let id = response.headers()["x-request-id"].to_str().unwrap();
        assert_eq!(id.len(), 36);

        let response = router()
            .oneshot(
                Request::get("/api/test")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let response = router()
            .oneshot(Request::get("/api/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["status"], "online");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_liveness_reports_timestamp() {
        let response = router()
            .oneshot(Request::get("/api/test").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["message"], "Servidor está funcionando corretamente");
        let timestamp = json["timestamp"].as_str().unwrap();
        assert!(timestamp.ends_with('Z'), "{}", timestamp);
        assert!(timestamp.contains('T'), "{}", timestamp);
    }

    #[tokio::test]
    async fn test_head_liveness() {
        let response = router()
            .oneshot(Request::head("/api/test").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_url_uses_first_value() {
        let response = router()
            .oneshot(
                Request::get("/proxy?url=notaurl&url=https://example.com/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert!(body.starts_with("Erro ao acessar a URL: "), "{}", body);
        assert!(body.contains("notaurl"), "{}", body);
    }

    #[tokio::test]
    async fn test_unparsable_query_is_missing_target() {
        let response = router()
            .oneshot(Request::get("/proxy?foo&&=x&bar").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "URL não fornecida");
    }

    #[tokio::test]
    async fn test_index_points_at_proxy_path() {
        let mut config = ProxyConfig::default();
        config.rewrite.proxy_path = "/go".into();
        let response = HttpServer::new(config)
            .unwrap()
            .router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"action="/go""#));
        assert!(html.contains(r#"name="url""#));
    }
}
