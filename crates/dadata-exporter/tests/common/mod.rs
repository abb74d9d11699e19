//! In-process stand-in for the Dadata profile API.
//!
//! Runs axum on a private multi-thread runtime so the blocking exporter can
//! be driven from plain `#[test]` functions.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use dadata_exporter::{Credentials, Exporter, UpstreamClient};

pub const SECRET: &str = "12345";

pub const BALANCE_BODY: &str = r#"{ "balance": 9922.30 }"#;
pub const STATS_BODY: &str = r#"
{
    "date": "2018-09-12",
    "services": {
        "merging": 0,
        "suggestions": 11,
        "clean": 1004
    }
}"#;

#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    /// Raw bytes, not necessarily UTF-8.
    Bytes(Vec<u8>),
    Status(u16),
    /// Values derived from the per-endpoint request sequence number.
    Sequence,
}

struct Shared {
    balance: Mutex<Reply>,
    stats: Mutex<Reply>,
    hits: AtomicUsize,
    balance_seq: AtomicU64,
    stats_seq: AtomicU64,
    dates: Mutex<Vec<String>>,
}

pub struct MockUpstream {
    pub base_url: String,
    shared: Arc<Shared>,
    rt: tokio::runtime::Runtime,
}

impl MockUpstream {
    pub fn start() -> Self {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("runtime");

        let shared = Arc::new(Shared {
            balance: Mutex::new(Reply::Body(BALANCE_BODY.into())),
            stats: Mutex::new(Reply::Body(STATS_BODY.into())),
            hits: AtomicUsize::new(0),
            balance_seq: AtomicU64::new(0),
            stats_seq: AtomicU64::new(0),
            dates: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/profile/balance", get(balance))
            .route("/stat/daily", get(stats))
            .with_state(Arc::clone(&shared));

        let mut mock = Self {
            base_url: String::new(),
            shared,
            rt,
        };
        mock.base_url = mock.serve(app);
        mock
    }

    /// Serve another router on the mock's runtime; returns its base URL.
    pub fn serve(&self, app: Router) -> String {
        let listener = self
            .rt
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        self.rt.spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    pub fn set_balance(&self, reply: Reply) {
        *self.shared.balance.lock().unwrap() = reply;
    }

    pub fn set_stats(&self, reply: Reply) {
        *self.shared.stats.lock().unwrap() = reply;
    }

    /// Requests received on either endpoint, authorized or not.
    pub fn hits(&self) -> usize {
        self.shared.hits.load(Ordering::SeqCst)
    }

    pub fn reset_sequences(&self) {
        self.shared.balance_seq.store(0, Ordering::SeqCst);
        self.shared.stats_seq.store(0, Ordering::SeqCst);
    }

    /// `date` query values seen by the stats endpoint.
    pub fn dates(&self) -> Vec<String> {
        self.shared.dates.lock().unwrap().clone()
    }

    /// Exporter with valid credentials and a bounded client timeout.
    pub fn exporter(&self) -> Exporter {
        let creds = Credentials::new(&self.base_url, SECRET, SECRET).expect("credentials");
        let client = UpstreamClient::new(creds, Some(Duration::from_secs(5)));
        match Exporter::with_client(client) {
            Ok(e) => e,
            Err(e) => panic!("exporter construction failed: {e}"),
        }
    }

    /// Stop serving; later requests fail at the transport level.
    pub fn shutdown(self) {
        self.rt.shutdown_timeout(Duration::from_secs(2));
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    let token = format!("Token {SECRET}");
    let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
    let secret = headers.get("x-secret").and_then(|v| v.to_str().ok());
    auth == Some(token.as_str()) && secret == Some(SECRET)
}

fn render(reply: Reply, sequence_body: impl FnOnce() -> String) -> Response {
    let json = [(header::CONTENT_TYPE, "application/json")];
    match reply {
        Reply::Body(b) => (json, b).into_response(),
        Reply::Bytes(b) => (json, b).into_response(),
        Reply::Status(code) => StatusCode::from_u16(code).unwrap().into_response(),
        Reply::Sequence => (json, sequence_body()).into_response(),
    }
}

async fn balance(State(s): State<Arc<Shared>>, headers: HeaderMap) -> Response {
    s.hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    let reply = s.balance.lock().unwrap().clone();
    render(reply, || {
        let n = s.balance_seq.fetch_add(1, Ordering::SeqCst) + 1;
        format!(r#"{{"balance": {n}}}"#)
    })
}

async fn stats(
    State(s): State<Arc<Shared>>,
    Query(q): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    s.hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    if let Some(d) = q.get("date") {
        s.dates.lock().unwrap().push(d.clone());
    }
    let reply = s.stats.lock().unwrap().clone();
    render(reply, || {
        let n = s.stats_seq.fetch_add(1, Ordering::SeqCst) + 1;
        format!(r#"{{"date":"2018-09-12","services":{{"merging":{n},"suggestions":{n},"clean":{n}}}}}"#)
    })
}
