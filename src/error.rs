use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures of an upstream acquisition (fetch, classification, parsing).
///
/// This is the error surfaced by the market data operations. Cache
/// failures never appear here: they are recovered inside the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network-level failure: DNS, connect, timeout, reset, body read.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// Upstream answered with a non-success status other than 429.
    #[error("request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    /// Upstream rejected the call because of its rate limit (HTTP 429).
    #[error("rate limited by upstream (status {status})")]
    RateLimited { status: u16 },

    /// The response body was not valid JSON or had an unexpected shape.
    #[error("failed to parse upstream response: {message}")]
    ParseFailure { message: String },
}

impl FetchError {
    /// Create a transport error from any displayable cause.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a parse failure from any displayable cause.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseFailure {
            message: message.into(),
        }
    }

    /// True for the distinguished upstream rate-limit rejection.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, Error>;
