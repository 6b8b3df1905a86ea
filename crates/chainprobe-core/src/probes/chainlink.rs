//! Latest answer of a Chainlink price feed.
//!
//! The raw aggregator answer is exported as-is; scaling by the feed's
//! decimals is left to the dashboard.

use crate::codec::{self, selectors};
use crate::error::ProbeError;
use crate::labels::{LABEL_CONTRACT, LABEL_FROM, LABEL_NAME, LABEL_TO};
use crate::metrics::MetricDescriptor;
use crate::probe::{Call, CallPlan, ContractProbe, Reading};
use crate::targets::PairTarget;

pub const NAME: &str = "chainlink_data_feed";

#[derive(Debug, Clone, Copy, Default)]
pub struct ChainlinkDataFeed;

impl ContractProbe for ChainlinkDataFeed {
    type Target = PairTarget;

    fn name(&self) -> &'static str {
        NAME
    }

    fn base_labels(&self) -> &'static [&'static str] {
        &[LABEL_NAME, LABEL_CONTRACT, LABEL_FROM, LABEL_TO]
    }

    fn metric(&self) -> MetricDescriptor {
        MetricDescriptor {
            name: "balance",
            help: "The latest answer of a chainlink data feed contract.",
            error_help: "The total errors when getting the latest answer of a chainlink data feed contract.",
        }
    }

    fn plan(&self, target: &PairTarget) -> CallPlan {
        vec![Call::contract(
            "latestAnswer",
            &target.contract,
            selectors::LATEST_ANSWER,
            vec![],
        )]
    }

    fn interpret(&self, _target: &PairTarget, results: &[String]) -> Result<Reading, ProbeError> {
        Ok(Reading::value(codec::decode_numeric(super::result(results, 0)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn reads_raw_latest_answer() {
        let target = PairTarget {
            name: "ETH/USD".into(),
            contract: "0x5f4eC3Df9cbd43714FE2740f5E3616155c5b8419".into(),
            from: "eth".into(),
            to: "usd".into(),
            labels: BTreeMap::new(),
        };
        let plan = ChainlinkDataFeed.plan(&target);
        assert_eq!(plan[0].method(), "latestAnswer");
        let reading = ChainlinkDataFeed
            .interpret(&target, &["0x0000000000000000000000000000000000000000000000000000004a817c8000".to_string()])
            .unwrap();
        assert_eq!(reading.value, 320_000_000_000.0);
    }
}
