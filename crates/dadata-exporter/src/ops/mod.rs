//! Operational HTTP endpoints.
//!
//! - `/`        : landing page
//! - `/healthz` : liveness
//! - `/metrics` : one collection cycle, Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::app_state::AppState;
use crate::obs::TextEncoder;

pub async fn index() -> Html<&'static str> {
    Html(
        r#"<html>
<head><title>Dadata Exporter</title></head>
<body>
<h1>Dadata Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
</body>
</html>"#,
    )
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let exporter = state.exporter();

    // The cycle does blocking I/O under its lock; keep it off the reactor.
    let body = tokio::task::spawn_blocking(move || {
        let snapshot = exporter.collect();
        let mut enc = TextEncoder::new();
        snapshot.encode(&mut enc);
        exporter.metrics().render_into(enc.buffer_mut());
        enc.finish()
    })
    .await;

    match body {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "collection task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "collection failed").into_response()
        }
    }
}
