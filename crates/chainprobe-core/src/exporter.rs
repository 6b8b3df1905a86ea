//! Assemble the configured jobs into runnable units.

use std::sync::Arc;

use prometheus::Registry;
use tracing::debug;

use crate::client::ExecutionClient;
use crate::config::{ExporterConfig, JobConfig};
use crate::error::SetupError;
use crate::job::{Job, Runnable};
use crate::probe::ContractProbe;
use crate::probes::{
    Account, ChainlinkDataFeed, Erc1155, Erc20, Erc4337, Erc4626, Erc721, UniswapPair,
};

/// Build one job per non-empty section of `config.jobs`, registering every
/// job's instruments into `registry`.
///
/// Sections without addresses are skipped and register nothing.
pub fn build_jobs(
    config: &ExporterConfig,
    client: Arc<dyn ExecutionClient>,
    registry: &Registry,
) -> Result<Vec<Arc<dyn Runnable>>, SetupError> {
    let jobs = &config.jobs;
    let mut built: Vec<Arc<dyn Runnable>> = Vec::new();

    push(&mut built, Account, &jobs.account, config, &client, registry)?;
    push(&mut built, Erc20, &jobs.erc20, config, &client, registry)?;
    push(&mut built, Erc721, &jobs.erc721, config, &client, registry)?;
    push(&mut built, Erc1155, &jobs.erc1155, config, &client, registry)?;
    push(&mut built, Erc4337, &jobs.erc4337, config, &client, registry)?;
    push(&mut built, Erc4626, &jobs.erc4626, config, &client, registry)?;
    push(&mut built, ChainlinkDataFeed, &jobs.chainlink_data_feed, config, &client, registry)?;
    push(&mut built, UniswapPair, &jobs.uniswap_pair, config, &client, registry)?;

    Ok(built)
}

fn push<P>(
    built: &mut Vec<Arc<dyn Runnable>>,
    probe: P,
    section: &JobConfig<P::Target>,
    config: &ExporterConfig,
    client: &Arc<dyn ExecutionClient>,
    registry: &Registry,
) -> Result<(), SetupError>
where
    P: ContractProbe,
    P::Target: Clone,
{
    if section.is_empty() {
        debug!(job = probe.name(), "no addresses configured, skipping");
        return Ok(());
    }
    let settings = config.job_settings(section.check_interval_secs);
    let job = Job::new(
        probe,
        Arc::clone(client),
        registry,
        &settings,
        section.addresses.clone(),
    )?;
    built.push(Arc::new(job));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CallRequest;
    use crate::error::TransportError;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl ExecutionClient for Unreachable {
        async fn eth_call(&self, _tx: &CallRequest, _block: &str) -> Result<String, TransportError> {
            Err(TransportError::Other("unreachable".into()))
        }

        async fn eth_get_balance(&self, _address: &str, _block: &str) -> Result<String, TransportError> {
            Err(TransportError::Other("unreachable".into()))
        }
    }

    const YAML: &str = r#"
namespace: eth
execution:
  url: http://localhost:8545
jobs:
  account:
    addresses:
      - name: a
        address: "0x1111111111111111111111111111111111111111"
        labels: { team: ops }
  erc4626:
    addresses:
      - name: v
        address: "0x1111111111111111111111111111111111111111"
        contract: "0x2222222222222222222222222222222222222222"
  erc20:
    addresses: []
"#;

    #[test]
    fn skips_empty_sections() {
        let config = ExporterConfig::from_yaml_str(YAML).unwrap();
        let registry = Registry::new();
        let jobs = build_jobs(&config, Arc::new(Unreachable), &registry).unwrap();

        let names: Vec<&str> = jobs.iter().map(|j| j.name()).collect();
        assert_eq!(names, vec!["account", "erc4626"]);
        assert_eq!(jobs[0].label_names(), vec!["name", "address", "team"]);
        assert_eq!(jobs[1].label_names(), vec!["name", "address", "contract", "symbol"]);
        assert_eq!(jobs[1].target_count(), 1);
    }

    #[test]
    fn building_twice_into_one_registry_fails() {
        let config = ExporterConfig::from_yaml_str(YAML).unwrap();
        let registry = Registry::new();
        build_jobs(&config, Arc::new(Unreachable), &registry).unwrap();
        let err = build_jobs(&config, Arc::new(Unreachable), &registry).err().unwrap();
        assert!(matches!(err, SetupError::Registration { job: "account", .. }));
    }
}
