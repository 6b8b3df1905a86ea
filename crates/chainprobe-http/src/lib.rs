//! chainprobe-http — JSON-RPC over HTTP for the ChainProbe job engine.
//!
//! [`HttpExecutionClient`] implements [`chainprobe_core::ExecutionClient`]
//! with `reqwest`, and optionally records per-request Prometheus metrics
//! through [`RpcMetrics`].

pub mod client;
pub mod metrics;
pub mod request;

pub use client::{HttpClientConfig, HttpExecutionClient};
pub use metrics::RpcMetrics;
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
