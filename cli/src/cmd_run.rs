//! `chainprobe run` — poll every configured job and serve `/metrics`.

use std::sync::Arc;

use anyhow::{Context, Result};
use prometheus::Registry;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use chainprobe_core::build_jobs;
use chainprobe_core::config::ExporterConfig;
use chainprobe_http::{HttpClientConfig, HttpExecutionClient, RpcMetrics};
use chainprobe_observability::{init_tracing, MetricsServer, ServerError};

pub async fn run(mut config: ExporterConfig, metrics_addr: Option<String>) -> Result<()> {
    if let Some(addr) = metrics_addr {
        config.metrics_addr = addr;
    }
    init_tracing(&config.logging);

    let registry = Registry::new();
    let rpc_metrics = RpcMetrics::register(&registry, &config.namespace)
        .context("registering RPC metrics")?;
    let client = HttpExecutionClient::new(HttpClientConfig {
        url: config.execution.url.clone(),
        request_timeout: config.execution.timeout(),
        headers: config.execution.headers.clone(),
    })
    .context("building execution client")?
    .with_metrics(rpc_metrics);

    let jobs = build_jobs(&config, Arc::new(client), &registry).context("building jobs")?;
    if jobs.is_empty() {
        warn!("no job has any address configured; only RPC metrics will be served");
    }

    let server = MetricsServer::bind(&config.metrics_addr).await?;
    info!(
        addr = %server.local_addr(),
        execution = %config.execution.url,
        jobs = jobs.len(),
        "chainprobe started"
    );

    let cancel = CancellationToken::new();
    let mut tasks = JoinSet::new();
    for job in jobs {
        tasks.spawn(job.run(cancel.child_token()));
    }
    let server_task = tokio::spawn(server.serve(registry, cancel.child_token()));

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl-C, shutting down"),
            Err(e) => error!(error = %e, "cannot listen for Ctrl-C, shutting down"),
        }
        shutdown.cancel();
    });

    supervise(&mut tasks, server_task, &cancel).await?;

    info!("chainprobe stopped");
    Ok(())
}

/// Wait for every job and the metrics server.
///
/// A server that stops on its own cancels the jobs; its error is returned
/// once they have drained.
async fn supervise(
    tasks: &mut JoinSet<()>,
    mut server_task: JoinHandle<Result<(), ServerError>>,
    cancel: &CancellationToken,
) -> Result<()> {
    let mut server_done = false;
    loop {
        tokio::select! {
            served = &mut server_task, if !server_done => {
                server_done = true;
                let served = served
                    .context("metrics server task")
                    .and_then(|r| r.map_err(anyhow::Error::from));
                if let Err(e) = served {
                    error!(error = %e, "metrics server stopped, shutting down");
                    cancel.cancel();
                    drain(tasks).await;
                    return Err(e);
                }
            }
            joined = tasks.join_next() => match joined {
                Some(Err(e)) => error!(error = %e, "job task panicked"),
                Some(Ok(())) => {}
                None => break,
            },
        }
    }
    if !server_done {
        server_task.await.context("metrics server task")??;
    }
    Ok(())
}

async fn drain(tasks: &mut JoinSet<()>) {
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "job task panicked");
        }
    }
}
