//! Shared error type across the exporter crates.

use thiserror::Error;

/// Boxed cause carried by transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Stable error classification (used for log fields and metric labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or invalid configuration.
    Config,
    /// Upstream unreachable or request could not be built.
    Transport,
    /// Upstream rejected the token/secret pair.
    Auth,
    /// Upstream answered with an unexpected status.
    Upstream,
    /// Response body did not match the expected shape.
    Decode,
}

impl ErrorKind {
    /// String representation used in logs and labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::Transport => "transport",
            ErrorKind::Auth => "auth",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Decode => "decode",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, DadataError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum DadataError {
    #[error("{field} should not be empty")]
    MissingField { field: &'static str },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("cannot make request to {path}: {source}")]
    Transport {
        path: String,
        #[source]
        source: BoxError,
    },

    #[error("can't access {path} with provided token/x-secret pair")]
    Auth { path: String },

    #[error("error occurred on {path}, got status code {status}")]
    Upstream { path: String, status: u16 },

    #[error("cannot parse {path} response: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DadataError {
    /// Build a transport error from any underlying cause.
    pub fn transport(path: impl Into<String>, source: impl Into<BoxError>) -> Self {
        DadataError::Transport {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DadataError::MissingField { .. } | DadataError::Config(_) => ErrorKind::Config,
            DadataError::Transport { .. } => ErrorKind::Transport,
            DadataError::Auth { .. } => ErrorKind::Auth,
            DadataError::Upstream { .. } => ErrorKind::Upstream,
            DadataError::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// HTTP status preserved from the upstream, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            DadataError::Auth { .. } => Some(403),
            DadataError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
