//! # chainprobe-observability
//!
//! Process-level observability for the ChainProbe exporter.
//!
//! ## Structured logging
//! `tracing` with an `EnvFilter` built from the `logging` config section,
//! human-readable or JSON lines. `RUST_LOG` wins when set.
//!
//! ## Metrics endpoint
//! `GET /metrics` serves the exporter's registry in the Prometheus text
//! format until the shutdown token fires.

pub mod server;
pub mod tracing_setup;

pub use server::{MetricsServer, ServerError};
pub use tracing_setup::{build_filter, init_tracing};
