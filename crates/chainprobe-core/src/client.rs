//! The `ExecutionClient` trait — the RPC surface the job engine consumes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Block tag used by every probe.
pub const BLOCK_LATEST: &str = "latest";

/// A read-only `eth_call` transaction object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    pub to: String,
    pub data: String,
}

impl CallRequest {
    pub fn new(to: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            data: data.into(),
        }
    }

    /// The 4-byte selector prefix of `data` (`0x` + 8 hex chars), if present.
    pub fn selector(&self) -> Option<&str> {
        self.data.get(..10)
    }
}

/// The two node primitives every probe is built from.
///
/// Implementations must be `Send + Sync`: one client is shared by all job
/// tasks behind an `Arc<dyn ExecutionClient>`.
#[async_trait]
pub trait ExecutionClient: Send + Sync + 'static {
    /// Execute a read-only contract call and return the raw hex result.
    async fn eth_call(&self, tx: &CallRequest, block: &str) -> Result<String, TransportError>;

    /// Return the native balance of `address` as a hex-encoded integer.
    async fn eth_get_balance(&self, address: &str, block: &str)
        -> Result<String, TransportError>;
}
