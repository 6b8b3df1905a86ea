//! Request metrics for the execution endpoint.

use std::time::Duration;

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};

const REQUEST_LABELS: &[&str] = &["method", "path", "api_method"];
const RESPONSE_LABELS: &[&str] = &["method", "path", "api_method", "code"];
const DURATION_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Request, response and latency instruments under `<namespace>_api_*`.
#[derive(Clone)]
pub struct RpcMetrics {
    requests: CounterVec,
    responses: CounterVec,
    duration: HistogramVec,
}

impl RpcMetrics {
    pub fn register(registry: &Registry, namespace: &str) -> Result<Self, prometheus::Error> {
        let namespace = format!("{namespace}_api");

        let requests = CounterVec::new(
            Opts::new("request_count", "Number of requests").namespace(namespace.clone()),
            REQUEST_LABELS,
        )?;
        let responses = CounterVec::new(
            Opts::new("response_count", "Number of responses").namespace(namespace.clone()),
            RESPONSE_LABELS,
        )?;
        let duration = HistogramVec::new(
            HistogramOpts::new("request_duration_seconds", "Request duration (in seconds.)")
                .namespace(namespace)
                .buckets(DURATION_BUCKETS.to_vec()),
            RESPONSE_LABELS,
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(responses.clone()))?;
        registry.register(Box::new(duration.clone()))?;

        Ok(Self {
            requests,
            responses,
            duration,
        })
    }

    pub fn observe_request(&self, method: &str, path: &str, api_method: &str) {
        self.requests
            .with_label_values(&[method, path, api_method])
            .inc();
    }

    pub fn observe_response(
        &self,
        method: &str,
        path: &str,
        api_method: &str,
        code: &str,
        elapsed: Duration,
    ) {
        let labels = [method, path, api_method, code];
        self.responses.with_label_values(&labels).inc();
        self.duration
            .with_label_values(&labels)
            .observe(elapsed.as_secs_f64());
    }
}
