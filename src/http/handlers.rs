use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::fetch::{ProxyError, ProxyRequest};
use crate::http::request::request_id;
use crate::http::response::assemble;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::rewrite::RewriteContext;

#[derive(Serialize)]
pub struct SystemStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}

/// Fetch the target, rewrite it when it is HTML, and relay it.
pub async fn proxy_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers);
    let request = ProxyRequest::from_query(query.as_deref());

    let (url, fetch) = match state.fetcher.fetch(request.target()).await {
        Ok(ok) => ok,
        Err(e) => {
            match &e {
                ProxyError::MissingTarget => {
                    tracing::warn!(request_id = %request_id, "Proxy request without target");
                }
                ProxyError::Fetch { reason, cause } => {
                    tracing::error!(
                        request_id = %request_id,
                        target = ?request.target(),
                        reason = reason.as_str(),
                        error = %cause,
                        "Upstream fetch failed"
                    );
                    metrics::record_fetch_error(reason.as_str());
                }
            }
            metrics::record_request("error", e.status().as_u16(), start_time);
            return e.into_response();
        }
    };

    let status = fetch.status;
    let (kind, body) = if fetch.is_html() {
        let target = request.target().unwrap_or_default();
        let ctx = RewriteContext::new(&url, target);
        metrics::record_rewrite();
        ("html", Bytes::from(state.pipeline.process(&fetch.body, &ctx)))
    } else {
        ("passthrough", fetch.body.clone())
    };

    tracing::info!(
        request_id = %request_id,
        target = %url,
        status = %status,
        kind,
        upstream_bytes = fetch.body.len(),
        bytes = body.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Proxied request"
    );
    metrics::record_request(kind, status.as_u16(), start_time);

    assemble(fetch, body)
}

/// Landing page with a URL form pointing at the proxy endpoint.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let action = html_escape::encode_double_quoted_attribute(&state.proxy_path);
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Internet 3.0</title>
    <style>
        body {{
            font-family: Arial, sans-serif;
            background: #111;
            color: white;
            display: flex;
            align-items: center;
            justify-content: center;
            min-height: 100vh;
            margin: 0;
        }}
        form {{
            display: flex;
            gap: 8px;
            width: 100%;
            max-width: 640px;
        }}
        input[type=url] {{
            flex: 1;
            padding: 10px;
            font-size: 16px;
        }}
    </style>
</head>
<body>
    <form method="get" action="{action}">
        <input type="url" name="url" placeholder="https://" required>
        <button type="submit">Navegar</button>
    </form>
</body>
</html>
"#
    ))
}

/// Diagnostics endpoint.
pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        status: "online",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

#[derive(Serialize)]
pub struct TestResponse {
    pub message: &'static str,
    pub timestamp: String,
}

/// Liveness check with a server timestamp.
pub async fn liveness() -> Json<TestResponse> {
    Json(TestResponse {
        message: "Servidor está funcionando corretamente",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Bodiless liveness check for HEAD.
pub async fn liveness_head() -> StatusCode {
    StatusCode::OK
}
