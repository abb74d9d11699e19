//! Collection cycle: Dadata balance + daily usage -> metric state.
//!
//! One cycle runs per scrape, under a single lock held for the whole cycle:
//! - `total_scrapes` is bumped first, regardless of outcome.
//! - The balance and stats calls are sequential and fail independently.
//! - A failed call bumps its failure counter and leaves the previous value
//!   in place; stale-but-valid beats absent.
//! - Nothing escapes `collect`; construction is the only fallible step.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use dadata_core::api::{self, Balance, DailyStats, BALANCE_PATH};
use dadata_core::error::{DadataError, Result};

use crate::obs::{ExporterMetrics, MetricDesc, MetricKind, MetricSink};
use crate::upstream::{Credentials, UpstreamClient};

pub const TOTAL_SCRAPES: MetricDesc = MetricDesc {
    name: "dadata_exporter_scrapes_total",
    help: "Count of total scrapes",
    kind: MetricKind::Counter,
};
pub const FAILED_BALANCE_SCRAPES: MetricDesc = MetricDesc {
    name: "dadata_exporter_failed_balance_scrapes_total",
    help: "Count of failed balance scrapes",
    kind: MetricKind::Counter,
};
pub const FAILED_STATS_SCRAPES: MetricDesc = MetricDesc {
    name: "dadata_exporter_failed_stats_scrapes_total",
    help: "Count of failed stats scrapes",
    kind: MetricKind::Counter,
};
pub const CURRENT_BALANCE: MetricDesc = MetricDesc {
    name: "dadata_current_balance",
    help: "Current balance on Dadata",
    kind: MetricKind::Gauge,
};
pub const SERVICES_CLEAN: MetricDesc = MetricDesc {
    name: "dadata_services_clean_total",
    help: "Clean count for today",
    kind: MetricKind::Gauge,
};
pub const SERVICES_MERGING: MetricDesc = MetricDesc {
    name: "dadata_services_merging_total",
    help: "Merging count for today",
    kind: MetricKind::Gauge,
};
pub const SERVICES_SUGGESTIONS: MetricDesc = MetricDesc {
    name: "dadata_services_suggestions_total",
    help: "Suggestions count for today",
    kind: MetricKind::Gauge,
};

/// Last known values plus scrape bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricState {
    pub total_scrapes: u64,
    pub failed_balance_scrapes: u64,
    pub failed_stats_scrapes: u64,
    pub current_balance: f64,
    pub services_merging: f64,
    pub services_suggestions: f64,
    pub services_clean: f64,
}

impl MetricState {
    /// Push every observation into `sink`.
    pub fn encode(&self, sink: &mut dyn MetricSink) {
        sink.record(&TOTAL_SCRAPES, self.total_scrapes as f64);
        sink.record(&FAILED_BALANCE_SCRAPES, self.failed_balance_scrapes as f64);
        sink.record(&FAILED_STATS_SCRAPES, self.failed_stats_scrapes as f64);
        sink.record(&CURRENT_BALANCE, self.current_balance);
        sink.record(&SERVICES_CLEAN, self.services_clean);
        sink.record(&SERVICES_MERGING, self.services_merging);
        sink.record(&SERVICES_SUGGESTIONS, self.services_suggestions);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Balance,
    Stats,
}

impl Endpoint {
    fn as_str(self) -> &'static str {
        match self {
            Endpoint::Balance => "balance",
            Endpoint::Stats => "stats",
        }
    }
}

pub struct Exporter {
    client: UpstreamClient,
    state: Mutex<MetricState>,
    metrics: Arc<ExporterMetrics>,
}

impl Exporter {
    /// Validate the credentials and probe the balance endpoint once.
    pub fn new(base_url: &str, token: &str, secret: &str) -> Result<Self> {
        let creds = Credentials::new(base_url, token, secret)?;
        Self::with_client(UpstreamClient::new(creds, None))
    }

    /// Same probe as `new`, for a client configured by the caller.
    pub fn with_client(client: UpstreamClient) -> Result<Self> {
        // The body is not decoded; the probe only checks the credentials.
        client.fetch(BALANCE_PATH).map_err(|e| {
            tracing::error!(
                base_url = %client.credentials().base_url(),
                kind = e.kind().as_str(),
                error = %e,
                "dadata credentials check failed"
            );
            e
        })?;

        Ok(Self {
            client,
            state: Mutex::new(MetricState::default()),
            metrics: Arc::new(ExporterMetrics::default()),
        })
    }

    pub fn client(&self) -> &UpstreamClient {
        &self.client
    }

    pub fn metrics(&self) -> Arc<ExporterMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run one collection cycle and return the resulting state.
    ///
    /// Concurrent callers queue on the cycle lock; each runs its own cycle.
    pub fn collect(&self) -> MetricState {
        let mut state = self.lock_state();

        state.total_scrapes += 1;

        match self.timed(Endpoint::Balance, || {
            self.client.fetch_json::<Balance>(BALANCE_PATH)
        }) {
            Ok(b) => state.current_balance = b.balance,
            Err(_) => state.failed_balance_scrapes += 1,
        }

        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let path = api::daily_stats_path(&today);
        match self.timed(Endpoint::Stats, || self.client.fetch_json::<DailyStats>(&path)) {
            Ok(s) => {
                state.services_merging = s.services.merging as f64;
                state.services_suggestions = s.services.suggestions as f64;
                state.services_clean = s.services.clean as f64;
            }
            Err(_) => state.failed_stats_scrapes += 1,
        }

        *state
    }

    /// Current state without running a cycle; waits out an in-flight cycle.
    pub fn snapshot(&self) -> MetricState {
        *self.lock_state()
    }

    fn lock_state(&self) -> MutexGuard<'_, MetricState> {
        // Plain numbers; a panic mid-cycle cannot leave them torn.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn timed<T>(&self, endpoint: Endpoint, call: impl FnOnce() -> Result<T>) -> Result<T> {
        let started = Instant::now();
        let res = call();
        self.metrics
            .upstream_duration
            .observe(&[("endpoint", endpoint.as_str())], started.elapsed());

        if let Err(e) = &res {
            self.record_failure(endpoint, e);
        }
        res
    }

    fn record_failure(&self, endpoint: Endpoint, e: &DadataError) {
        let kind = e.kind().as_str();
        self.metrics
            .upstream_errors
            .inc(&[("endpoint", endpoint.as_str()), ("kind", kind)]);

        match e.status() {
            Some(status) => {
                tracing::warn!(endpoint = endpoint.as_str(), kind, status, error = %e, "scrape failed")
            }
            None => tracing::warn!(endpoint = endpoint.as_str(), kind, error = %e, "scrape failed"),
        }
    }
}
