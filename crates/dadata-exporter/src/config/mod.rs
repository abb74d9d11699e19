//! Exporter config loader (strict parsing).

pub mod schema;

use std::fs;

use dadata_core::error::{DadataError, Result};

pub use schema::{ExporterConfig, ExporterSection, UpstreamSection};

/// Environment variable naming an optional YAML config file.
pub const CONFIG_ENV: &str = "DADATA_EXPORTER_CONFIG";
pub const TOKEN_ENV: &str = "DADATA_TOKEN";
pub const SECRET_ENV: &str = "DADATA_X_SECRET";

pub fn load_from_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| DadataError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg: ExporterConfig = serde_yaml::from_str(s)
        .map_err(|e| DadataError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path` when given, otherwise fall back to the built-in defaults.
pub fn load(path: Option<&str>) -> Result<ExporterConfig> {
    match path {
        Some(p) => load_from_file(p),
        None => {
            let cfg = ExporterConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
    }
}
