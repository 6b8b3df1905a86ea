//! `chainprobe check` — validate the config and show the label layout.

use std::sync::Arc;

use anyhow::{Context, Result};
use prometheus::Registry;

use chainprobe_core::build_jobs;
use chainprobe_core::config::ExporterConfig;
use chainprobe_http::{HttpClientConfig, HttpExecutionClient};

pub fn run(config: &ExporterConfig) -> Result<()> {
    let client = HttpExecutionClient::new(HttpClientConfig {
        url: config.execution.url.clone(),
        request_timeout: config.execution.timeout(),
        headers: config.execution.headers.clone(),
    })
    .context("building execution client")?;

    let jobs = build_jobs(config, Arc::new(client), &Registry::new())
        .context("building jobs")?;

    println!("execution: {}", config.execution.url);
    println!("metrics:   {}", config.metrics_addr);
    println!("namespace: {}", config.namespace);
    println!();

    if jobs.is_empty() {
        println!("no jobs configured");
        return Ok(());
    }

    for job in &jobs {
        println!("{}_{}  ({} targets)", config.namespace, job.name(), job.target_count());
        for (index, label) in job.label_names().iter().enumerate() {
            println!("  [{index}] {label}");
        }
    }
    Ok(())
}
