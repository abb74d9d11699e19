//! Dadata exporter library entry.
//!
//! This crate wires the upstream client, the collection cycle and the
//! exposition encoder into a Prometheus exporter. It is consumed by the
//! binary (`main.rs`) and by integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod app_state;
pub mod collector;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod upstream;

pub use collector::{Exporter, MetricState};
pub use upstream::{Credentials, UpstreamClient};
