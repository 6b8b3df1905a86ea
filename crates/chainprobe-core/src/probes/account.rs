//! Native balance of an externally owned account.

use crate::codec;
use crate::error::ProbeError;
use crate::labels::{LABEL_ADDRESS, LABEL_NAME};
use crate::metrics::MetricDescriptor;
use crate::probe::{Call, CallPlan, ContractProbe, Reading};
use crate::targets::AccountTarget;

pub const NAME: &str = "account";

#[derive(Debug, Clone, Copy, Default)]
pub struct Account;

impl ContractProbe for Account {
    type Target = AccountTarget;

    fn name(&self) -> &'static str {
        NAME
    }

    fn base_labels(&self) -> &'static [&'static str] {
        &[LABEL_NAME, LABEL_ADDRESS]
    }

    fn metric(&self) -> MetricDescriptor {
        MetricDescriptor {
            name: "balance",
            help: "The balance of a account address.",
            error_help: "The total errors when getting the balance of a account address.",
        }
    }

    fn plan(&self, target: &AccountTarget) -> CallPlan {
        vec![Call::Balance {
            address: target.address.clone(),
        }]
    }

    fn interpret(&self, _target: &AccountTarget, results: &[String]) -> Result<Reading, ProbeError> {
        let balance = super::result(results, 0)?;
        Ok(Reading::value(codec::decode_numeric(balance)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn one_balance_call() {
        let target = AccountTarget {
            name: "treasury".into(),
            address: "0x1111111111111111111111111111111111111111".into(),
            labels: BTreeMap::new(),
        };
        assert_eq!(
            Account.plan(&target),
            vec![Call::Balance { address: target.address.clone() }]
        );
        let reading = Account.interpret(&target, &["0xde0b6b3a7640000".to_string()]).unwrap();
        assert_eq!(reading.value, 1e18);
    }

    #[test]
    fn missing_result_is_an_error() {
        let target = AccountTarget {
            name: "treasury".into(),
            address: "0x1".into(),
            labels: BTreeMap::new(),
        };
        assert!(Account.interpret(&target, &[]).is_err());
    }
}
