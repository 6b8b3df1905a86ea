//! Exporter configuration, loaded from YAML.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::job::JobSettings;
use crate::targets::{AccountTarget, ContractTarget, PairTarget, TokenTarget};

/// Top-level exporter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    #[serde(default)]
    pub logging: LogSettings,
    /// Listen address of the `/metrics` endpoint.
    #[serde(default = "default_metrics_addr")]
    pub metrics_addr: String,
    /// Metric namespace root; each job registers under `<namespace>_<job>`.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Constant labels attached to every exported sample.
    #[serde(default)]
    pub global_labels: HashMap<String, String>,
    /// Default interval between ticks, in seconds.
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
}

fn default_metrics_addr() -> String { "0.0.0.0:9090".into() }
fn default_namespace() -> String { "eth_address".into() }
fn default_check_interval_secs() -> u64 { 15 }
fn default_timeout_ms() -> u64 { 10_000 }
fn default_level() -> String { "info".into() }

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// Default filter level (`trace`, `debug`, `info`, `warn`, `error`).
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
    /// Per-target level overrides, e.g. `chainprobe_http: debug`.
    #[serde(default)]
    pub components: BTreeMap<String, String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            components: BTreeMap::new(),
        }
    }
}

/// The execution-layer JSON-RPC endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    pub url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Extra HTTP headers sent with every request (e.g. auth).
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl ExecutionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Targets and optional interval override for one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct JobConfig<T> {
    /// Overrides the exporter-wide `check_interval_secs`.
    #[serde(default)]
    pub check_interval_secs: Option<u64>,
    #[serde(default = "Vec::new")]
    pub addresses: Vec<T>,
}

impl<T> Default for JobConfig<T> {
    fn default() -> Self {
        Self {
            check_interval_secs: None,
            addresses: Vec::new(),
        }
    }
}

impl<T> JobConfig<T> {
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// One optional section per built-in probe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobsConfig {
    #[serde(default)]
    pub account: JobConfig<AccountTarget>,
    #[serde(default)]
    pub erc20: JobConfig<ContractTarget>,
    #[serde(default)]
    pub erc721: JobConfig<ContractTarget>,
    #[serde(default)]
    pub erc1155: JobConfig<TokenTarget>,
    #[serde(default)]
    pub erc4337: JobConfig<ContractTarget>,
    #[serde(default)]
    pub erc4626: JobConfig<ContractTarget>,
    #[serde(default)]
    pub chainlink_data_feed: JobConfig<PairTarget>,
    #[serde(default)]
    pub uniswap_pair: JobConfig<PairTarget>,
}

impl JobsConfig {
    /// Interval overrides of every job, keyed by job name.
    fn intervals(&self) -> [(&'static str, Option<u64>); 8] {
        [
            ("account", self.account.check_interval_secs),
            ("erc20", self.erc20.check_interval_secs),
            ("erc721", self.erc721.check_interval_secs),
            ("erc1155", self.erc1155.check_interval_secs),
            ("erc4337", self.erc4337.check_interval_secs),
            ("erc4626", self.erc4626.check_interval_secs),
            ("chainlink_data_feed", self.chainlink_data_feed.check_interval_secs),
            ("uniswap_pair", self.uniswap_pair.check_interval_secs),
        ]
    }
}

impl ExporterConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.execution.url.trim().is_empty() {
            return Err(ConfigError::Invalid("execution.url must not be empty".into()));
        }
        if self.execution.timeout_ms == 0 {
            return Err(ConfigError::Invalid("execution.timeout_ms must be positive".into()));
        }
        if self.check_interval_secs == 0 {
            return Err(ConfigError::Invalid("check_interval_secs must be positive".into()));
        }
        for (job, interval) in self.jobs.intervals() {
            if interval == Some(0) {
                return Err(ConfigError::Invalid(format!(
                    "jobs.{job}.check_interval_secs must be positive"
                )));
            }
        }
        if self.namespace.is_empty() {
            return Err(ConfigError::Invalid("namespace must not be empty".into()));
        }
        Ok(())
    }

    /// Job settings for a job with the given interval override.
    pub fn job_settings(&self, interval_override: Option<u64>) -> JobSettings {
        JobSettings {
            namespace: self.namespace.clone(),
            const_labels: self.global_labels.clone(),
            interval: Duration::from_secs(interval_override.unwrap_or(self.check_interval_secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::U256;

    const FULL: &str = r#"
logging:
  level: debug
  json: true
  components:
    chainprobe_http: trace
metrics_addr: "127.0.0.1:9100"
namespace: eth
global_labels:
  network: mainnet
check_interval_secs: 30
execution:
  url: http://localhost:8545
  timeout_ms: 2000
  headers:
    Authorization: Bearer abc
jobs:
  account:
    addresses:
      - name: treasury
        address: "0x1111111111111111111111111111111111111111"
        labels:
          team: ops
  erc20:
    check_interval_secs: 60
    addresses:
      - name: usdc
        address: "0x1111111111111111111111111111111111111111"
        contract: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"
  erc1155:
    addresses:
      - name: sword
        address: "0x1111111111111111111111111111111111111111"
        contract: "0x2222222222222222222222222222222222222222"
        token_id: 7
      - name: wrapped-name
        address: "0x1111111111111111111111111111111111111111"
        contract: "0xD4416b13d2b3a9aBae7AcD5D6C2BbDBE25686401"
        token_id: 18446744073709551616
  uniswap_pair:
    addresses:
      - name: weth-usdc
        contract: "0xB4e16d0168e52d35CaCD2c6185b44281Ec28C9Dc"
        from: usdc
        to: weth
"#;

    #[test]
    fn parses_full_document() {
        let config = ExporterConfig::from_yaml_str(FULL).unwrap();
        assert_eq!(config.namespace, "eth");
        assert_eq!(config.metrics_addr, "127.0.0.1:9100");
        assert!(config.logging.json);
        assert_eq!(config.logging.components["chainprobe_http"], "trace");
        assert_eq!(config.execution.timeout(), Duration::from_secs(2));
        assert_eq!(config.jobs.account.addresses[0].labels["team"], "ops");
        assert_eq!(config.jobs.erc1155.addresses[0].token_id, U256::from(7u64));
        assert_eq!(
            config.jobs.erc1155.addresses[1].token_id.to_string(),
            "18446744073709551616"
        );
        assert!(config.jobs.erc721.is_empty());
        assert_eq!(config.jobs.uniswap_pair.addresses[0].from, "usdc");
    }

    #[test]
    fn defaults_apply() {
        let config =
            ExporterConfig::from_yaml_str("execution:\n  url: http://localhost:8545\n").unwrap();
        assert_eq!(config.namespace, "eth_address");
        assert_eq!(config.metrics_addr, "0.0.0.0:9090");
        assert_eq!(config.check_interval_secs, 15);
        assert_eq!(config.execution.timeout_ms, 10_000);
        assert_eq!(config.logging.level, "info");
        assert!(config.jobs.account.is_empty());
    }

    #[test]
    fn job_interval_override() {
        let config = ExporterConfig::from_yaml_str(FULL).unwrap();
        let erc20 = config.job_settings(config.jobs.erc20.check_interval_secs);
        let account = config.job_settings(config.jobs.account.check_interval_secs);
        assert_eq!(erc20.interval, Duration::from_secs(60));
        assert_eq!(account.interval, Duration::from_secs(30));
        assert_eq!(account.const_labels["network"], "mainnet");
    }

    #[test]
    fn empty_url_is_rejected() {
        let err = ExporterConfig::from_yaml_str("execution:\n  url: \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_job_interval_is_rejected() {
        let yaml = "execution:\n  url: http://x\njobs:\n  erc721:\n    check_interval_secs: 0\n";
        let err = ExporterConfig::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("erc721"));
    }

    #[test]
    fn missing_execution_is_a_yaml_error() {
        assert!(matches!(
            ExporterConfig::from_yaml_str("namespace: eth\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ExporterConfig::load("/nonexistent/chainprobe.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/chainprobe.yaml"));
    }
}
