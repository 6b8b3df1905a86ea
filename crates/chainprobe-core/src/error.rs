//! Error types for the probe pipeline.

use thiserror::Error;

/// Errors raised by an [`ExecutionClient`](crate::ExecutionClient) call.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, non-2xx status, etc.).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON-RPC protocol-level error returned by the node (e.g. a revert).
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Response could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// An unexpected error.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns `true` if this is a node-side execution error.
    pub fn is_execution_error(&self) -> bool {
        matches!(self, Self::Rpc { .. })
    }
}

/// A string result could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid hex in call result: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Why a single address probe failed during a tick.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{call} failed: {source}")]
    Transport {
        call: &'static str,
        #[source]
        source: TransportError,
    },

    #[error("{call} returned an undecodable value: {source}")]
    Decode {
        call: &'static str,
        #[source]
        source: DecodeError,
    },

    #[error("pair has no {token} reserve")]
    EmptyReserve { token: &'static str },

    #[error("call plan step {step} references result {reference} which is not available yet")]
    UnresolvedArgument { step: usize, reference: usize },

    /// The job was cancelled while the probe was in flight.
    #[error("probe cancelled")]
    Cancelled,
}

impl ProbeError {
    /// Cancellation is a shutdown signal, not a probe failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Errors while wiring a job's instruments.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to register metrics for job '{job}': {source}")]
    Registration {
        job: &'static str,
        #[source]
        source: prometheus::Error,
    },
}

/// Errors while loading the exporter configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
