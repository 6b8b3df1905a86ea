//! HTTP JSON-RPC client backed by `reqwest`.
//!
//! One POST per call; no batching and no retry. A failed call surfaces to
//! the job, which counts it and moves on to the next address.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{json, Value};

use chainprobe_core::client::{CallRequest, ExecutionClient};
use chainprobe_core::error::TransportError;

use crate::metrics::RpcMetrics;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

const HTTP_METHOD: &str = "POST";
const CODE_TRANSPORT_FAILURE: &str = "error";

/// Configuration for [`HttpExecutionClient`].
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub url: String,
    pub request_timeout: Duration,
    /// Extra headers sent with every request.
    pub headers: HashMap<String, String>,
}

impl HttpClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            request_timeout: Duration::from_secs(10),
            headers: HashMap::new(),
        }
    }
}

/// Execution-layer client speaking JSON-RPC 2.0 over HTTP.
pub struct HttpExecutionClient {
    url: String,
    path: String,
    http: reqwest::Client,
    request_timeout: Duration,
    next_id: AtomicU64,
    metrics: Option<RpcMetrics>,
}

impl HttpExecutionClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, TransportError> {
        let url = reqwest::Url::parse(&config.url)
            .map_err(|e| TransportError::Other(format!("invalid url '{}': {e}", config.url)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::Other(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::Other(format!("invalid value for header '{name}': {e}")))?;
            headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;

        Ok(Self {
            path: url.path().to_string(),
            url: config.url,
            http,
            request_timeout: config.request_timeout,
            next_id: AtomicU64::new(1),
            metrics: None,
        })
    }

    /// Record request metrics into `metrics`.
    pub fn with_metrics(mut self, metrics: RpcMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request(&self, method: &str, params: Vec<Value>) -> Result<String, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let req = JsonRpcRequest::new(id, method, params);

        if let Some(metrics) = &self.metrics {
            metrics.observe_request(HTTP_METHOD, &self.path, method);
        }
        let started = Instant::now();
        let sent = self.http.post(&self.url).json(&req).send().await;

        let code = match &sent {
            Ok(resp) => resp.status().as_u16().to_string(),
            Err(_) => CODE_TRANSPORT_FAILURE.to_string(),
        };
        if let Some(metrics) = &self.metrics {
            metrics.observe_response(HTTP_METHOD, &self.path, method, &code, started.elapsed());
        }

        let resp = sent.map_err(|e| self.map_reqwest_error(e))?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Http(format!("HTTP {status}: {body}")));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;
        let resp: JsonRpcResponse = serde_json::from_slice(&body)?;
        let hex = resp.into_hex().map_err(|e| TransportError::Rpc {
            code: e.code,
            message: e.message,
        })?;

        tracing::trace!(method, id, result = %hex, "rpc response");
        Ok(hex)
    }

    fn map_reqwest_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                ms: self.request_timeout.as_millis() as u64,
            }
        } else {
            TransportError::Http(e.to_string())
        }
    }
}

#[async_trait]
impl ExecutionClient for HttpExecutionClient {
    async fn eth_call(&self, tx: &CallRequest, block: &str) -> Result<String, TransportError> {
        self.request("eth_call", vec![json!({ "to": tx.to, "data": tx.data }), json!(block)])
            .await
    }

    async fn eth_get_balance(&self, address: &str, block: &str) -> Result<String, TransportError> {
        self.request("eth_getBalance", vec![json!(address), json!(block)])
            .await
    }
}
