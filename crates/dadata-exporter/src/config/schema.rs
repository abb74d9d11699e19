use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use dadata_core::error::{DadataError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub exporter: ExporterSection,

    #[serde(default)]
    pub upstream: UpstreamSection,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            version: 1,
            exporter: ExporterSection::default(),
            upstream: UpstreamSection::default(),
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(DadataError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.exporter.validate()?;
        self.upstream.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            DadataError::Config(format!("exporter.listen must be a valid SocketAddr: {e}"))
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unset keeps the HTTP client's own defaults.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: None,
        }
    }
}

impl UpstreamSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(DadataError::Config(
                "upstream.base_url must start with http:// or https://".into(),
            ));
        }
        if let Some(ms) = self.timeout_ms {
            if !(100..=120000).contains(&ms) {
                return Err(DadataError::Config(
                    "upstream.timeout_ms must be between 100 and 120000".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

fn default_listen() -> String {
    "0.0.0.0:9501".into()
}
fn default_base_url() -> String {
    "https://dadata.ru/api/v2".into()
}
