//! Exporter self-metrics.
//!
//! Labelled counters and histograms backed by `DashMap`. Label sets are
//! flattened into sorted key vectors so rendering order within a series is
//! deterministic. Histogram observations are accumulated in microseconds and
//! rendered in seconds.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

type LabelKey = Vec<(String, String)>;

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn write_header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value of one series (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "counter");
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| (label_str(r.key()), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (labels, val) in rows {
            if labels.is_empty() {
                let _ = writeln!(out, "{} {}", name, val);
            } else {
                let _ = writeln!(out, "{}{{{}}} {}", name, labels, val);
            }
        }
    }
}

// Upstream calls are network round-trips: 5ms .. 10s, in microseconds.
const BUCKETS_MICROS: [u64; 10] = [
    5_000, 10_000, 25_000, 50_000, 100_000, 250_000, 500_000, 1_000_000, 5_000_000, 10_000_000,
];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum_micros: AtomicU64,
    buckets: [AtomicU64; BUCKETS_MICROS.len()],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration; buckets are cumulative.
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self.map.entry(label_key(labels)).or_default();
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum_micros.fetch_add(micros, Ordering::Relaxed);

        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Number of observations of one series.
    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "histogram");
        let mut series: Vec<_> = self.map.iter().collect();
        series.sort_by(|a, b| a.key().cmp(b.key()));

        for r in series {
            let hist = r.value();
            let labels = label_str(r.key());
            let prefix = if labels.is_empty() {
                String::new()
            } else {
                format!("{},", labels)
            };

            for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let le_secs = le as f64 / 1_000_000.0;
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le_secs, count);
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);

            let sum_secs = hist.sum_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0;
            if labels.is_empty() {
                let _ = writeln!(out, "{}_sum {}", name, sum_secs);
                let _ = writeln!(out, "{}_count {}", name, count);
            } else {
                let _ = writeln!(out, "{}_sum{{{}}} {}", name, labels, sum_secs);
                let _ = writeln!(out, "{}_count{{{}}} {}", name, labels, count);
            }
        }
    }
}

/// Counters about the exporter itself, next to the upstream values.
#[derive(Default)]
pub struct ExporterMetrics {
    /// labels: endpoint, kind
    pub upstream_errors: CounterVec,
    /// labels: endpoint
    pub upstream_duration: HistogramVec,
}

impl ExporterMetrics {
    pub fn render_into(&self, out: &mut String) {
        self.upstream_errors.render(
            "dadata_exporter_upstream_errors_total",
            "Failed upstream calls by endpoint and error kind",
            out,
        );
        self.upstream_duration.render(
            "dadata_exporter_upstream_request_duration_seconds",
            "Upstream request latency including body decoding",
            out,
        );
    }
}
