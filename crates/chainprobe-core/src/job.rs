//! The generic job engine: one probe, its targets, its instruments.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use prometheus::Registry;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::client::ExecutionClient;
use crate::error::{ProbeError, SetupError};
use crate::labels::{LabelSchema, LabelSource, LABEL_ADDRESS, LABEL_CONTRACT, LABEL_NAME};
use crate::metrics::Instruments;
use crate::probe::{execute_plan, ContractProbe};
use crate::scheduler::{JobState, Scheduler};

/// Settings shared by every job of one exporter.
#[derive(Debug, Clone)]
pub struct JobSettings {
    /// Metric namespace root, e.g. `eth_address`.
    pub namespace: String,
    /// Labels attached to every sample of every job.
    pub const_labels: HashMap<String, String>,
    /// Time between the end of one tick and the start of the next.
    pub interval: Duration,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            namespace: "eth_address".into(),
            const_labels: HashMap::new(),
            interval: Duration::from_secs(15),
        }
    }
}

/// A configured probe bound to its targets, instruments and schedule.
pub struct Job<P: ContractProbe> {
    probe: P,
    client: Arc<dyn ExecutionClient>,
    targets: Vec<P::Target>,
    schema: LabelSchema,
    instruments: Instruments,
    scheduler: Scheduler,
}

impl<P: ContractProbe> Job<P> {
    /// Build the label schema and register the job's instruments.
    pub fn new(
        probe: P,
        client: Arc<dyn ExecutionClient>,
        registry: &Registry,
        settings: &JobSettings,
        targets: Vec<P::Target>,
    ) -> Result<Self, SetupError> {
        let schema = LabelSchema::build(probe.base_labels(), &targets);
        let instruments = Instruments::register(
            registry,
            &settings.namespace,
            probe.name(),
            &probe.metric(),
            &schema,
            &settings.const_labels,
        )
        .map_err(|source| SetupError::Registration {
            job: probe.name(),
            source,
        })?;

        Ok(Self {
            probe,
            client,
            targets,
            schema,
            instruments,
            scheduler: Scheduler::new(settings.interval),
        })
    }

    pub fn name(&self) -> &'static str {
        self.probe.name()
    }

    pub fn schema(&self) -> &LabelSchema {
        &self.schema
    }

    pub fn targets(&self) -> &[P::Target] {
        &self.targets
    }

    pub fn instruments(&self) -> &Instruments {
        &self.instruments
    }

    pub fn state(&self) -> JobState {
        self.scheduler.state()
    }

    /// Tick immediately, then on every interval, until `cancel` fires.
    pub async fn start(&self, cancel: CancellationToken) {
        info!(
            job = self.name(),
            targets = self.targets.len(),
            interval_secs = self.scheduler.interval().as_secs(),
            "starting job"
        );
        self.scheduler.run(&cancel, || self.tick(&cancel)).await;
        info!(job = self.name(), "job stopped");
    }

    /// Probe every target once, in configuration order.
    ///
    /// A failing target is logged and counted; it never stops the tick.
    pub async fn tick(&self, cancel: &CancellationToken) {
        debug!(job = self.name(), "tick");
        for target in &self.targets {
            match self.probe_target(target, cancel).await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {
                    debug!(job = self.name(), "tick interrupted by shutdown");
                    return;
                }
                Err(e) => {
                    let address = target
                        .base_value(LABEL_ADDRESS)
                        .or_else(|| target.base_value(LABEL_CONTRACT))
                        .unwrap_or_default();
                    error!(
                        job = self.name(),
                        name = %target.base_value(LABEL_NAME).unwrap_or_default(),
                        address = %address,
                        error = %e,
                        "probe failed"
                    );
                }
            }
        }
    }

    /// Run the call plan for one target and record the outcome.
    ///
    /// On success the gauge is set; on failure the error counter is
    /// incremented exactly once. A cancelled probe records nothing.
    pub async fn probe_target(
        &self,
        target: &P::Target,
        cancel: &CancellationToken,
    ) -> Result<(), ProbeError> {
        let plan = self.probe.plan(target);
        let outcome = match execute_plan(self.client.as_ref(), &plan, cancel).await {
            Ok(results) => self.probe.interpret(target, &results),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(reading) => {
                let computed: Vec<(&str, &str)> = reading
                    .labels
                    .iter()
                    .map(|(name, value)| (*name, value.as_str()))
                    .collect();
                let labels = self.schema.values_for(target, &computed);
                if let Err(e) = self.instruments.set(&labels, reading.value) {
                    warn!(job = self.name(), error = %e, "cannot set gauge");
                }
                Ok(())
            }
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => {
                let labels = self.schema.values_for(target, &[]);
                if let Err(metric_err) = self.instruments.inc_error(&labels) {
                    warn!(job = self.name(), error = %metric_err, "cannot increment error counter");
                }
                Err(e)
            }
        }
    }
}

/// A job with its probe type erased, so heterogeneous jobs can be spawned
/// side by side.
#[async_trait]
pub trait Runnable: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Label names in index order.
    fn label_names(&self) -> Vec<String>;

    fn target_count(&self) -> usize;

    fn state(&self) -> JobState;

    async fn run(self: Arc<Self>, cancel: CancellationToken);
}

#[async_trait]
impl<P: ContractProbe> Runnable for Job<P> {
    fn name(&self) -> &'static str {
        self.probe.name()
    }

    fn label_names(&self) -> Vec<String> {
        self.schema.names().to_vec()
    }

    fn target_count(&self) -> usize {
        self.targets.len()
    }

    fn state(&self) -> JobState {
        self.scheduler.state()
    }

    async fn run(self: Arc<Self>, cancel: CancellationToken) {
        self.start(cancel).await;
    }
}
