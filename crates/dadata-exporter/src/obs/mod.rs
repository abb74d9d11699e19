//! Exposition side of the exporter.
//!
//! The collector does not know the wire format it is scraped in. It pushes
//! each observation into a [`MetricSink`]; [`TextEncoder`] is the sink that
//! produces Prometheus text exposition for `/metrics`.

pub mod metrics;

use std::fmt::Write;

pub use metrics::{CounterVec, ExporterMetrics, HistogramVec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

/// Static description of one exposed observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDesc {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
}

/// Receiver of metric observations.
pub trait MetricSink {
    fn record(&mut self, desc: &MetricDesc, value: f64);
}

/// Prometheus text exposition (version 0.0.4).
#[derive(Debug, Default)]
pub struct TextEncoder {
    out: String,
}

impl TextEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access for renderers that write whole families themselves.
    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.out
    }

    pub fn finish(self) -> String {
        self.out
    }
}

impl MetricSink for TextEncoder {
    fn record(&mut self, desc: &MetricDesc, value: f64) {
        let _ = writeln!(self.out, "# HELP {} {}", desc.name, escape_help(desc.help));
        let _ = writeln!(self.out, "# TYPE {} {}", desc.name, desc.kind.as_str());
        let _ = writeln!(self.out, "{} {}", desc.name, value);
    }
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}
