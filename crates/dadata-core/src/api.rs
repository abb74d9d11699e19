//! Upstream wire shapes (Dadata profile API) and JSON decoding.
//!
//! Decoding is lenient about extra fields, the informational `date` (any
//! JSON value, or absent) and anything after the first JSON value, but
//! strict about the values the exporter republishes: a balance response
//! without `balance` or a stats response without `services` is a decode
//! error, never a silent zero.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{DadataError, Result};

/// Path of the account balance endpoint.
pub const BALANCE_PATH: &str = "profile/balance";

/// Path of the daily usage statistics endpoint (takes `?date=YYYY-MM-DD`).
pub const DAILY_STATS_PATH: &str = "stat/daily";

/// `GET profile/balance`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Balance {
    pub balance: f64,
}

/// `GET stat/daily?date=...`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyStats {
    /// Echo of the requested day; not interpreted.
    #[serde(default)]
    pub date: Option<Value>,
    pub services: Services,
}

/// Per-category request counts for one day.
///
/// Categories missing from the payload count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Services {
    #[serde(default)]
    pub merging: u64,
    #[serde(default)]
    pub suggestions: u64,
    #[serde(default)]
    pub clean: u64,
}

/// Path + query for the stats of a given day (`date` as `YYYY-MM-DD`).
pub fn daily_stats_path(date: &str) -> String {
    format!("{DAILY_STATS_PATH}?date={date}")
}

/// Decode a response body; `path` only labels the error.
pub fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T> {
    decode_slice(path, body.as_bytes())
}

/// Decode the first JSON value of a raw body. Trailing bytes are not read,
/// and invalid UTF-8 inside the value is a decode error.
pub fn decode_slice<T: DeserializeOwned>(path: &str, body: &[u8]) -> Result<T> {
    let mut de = serde_json::Deserializer::from_slice(body);
    T::deserialize(&mut de).map_err(|source| DadataError::Decode {
        path: path.to_string(),
        source,
    })
}
