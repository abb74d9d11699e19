//! Shared application state for the exporter HTTP surface.
//!
//! The exporter is handed in explicitly; there is no process-wide registry.

use std::sync::Arc;

use crate::collector::Exporter;
use crate::config::ExporterConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ExporterConfig,
    exporter: Arc<Exporter>,
}

impl AppState {
    pub fn new(cfg: ExporterConfig, exporter: Arc<Exporter>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cfg, exporter }),
        }
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn exporter(&self) -> Arc<Exporter> {
        Arc::clone(&self.inner.exporter)
    }
}
