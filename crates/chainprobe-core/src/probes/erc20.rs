//! ERC20 token balance of a holder, labelled with the token symbol.

use crate::codec::{self, selectors};
use crate::error::ProbeError;
use crate::labels::{LABEL_ADDRESS, LABEL_CONTRACT, LABEL_NAME, LABEL_SYMBOL};
use crate::metrics::MetricDescriptor;
use crate::probe::{Call, CallArg, CallPlan, ContractProbe, Reading};
use crate::targets::ContractTarget;

pub const NAME: &str = "erc20";

#[derive(Debug, Clone, Copy, Default)]
pub struct Erc20;

impl ContractProbe for Erc20 {
    type Target = ContractTarget;

    fn name(&self) -> &'static str {
        NAME
    }

    fn base_labels(&self) -> &'static [&'static str] {
        &[LABEL_NAME, LABEL_ADDRESS, LABEL_CONTRACT, LABEL_SYMBOL]
    }

    fn metric(&self) -> MetricDescriptor {
        MetricDescriptor {
            name: "balance",
            help: "The balance of a ethereum ERC20 token contract by address.",
            error_help: "The total errors when getting the balance of a ethereum ERC20 token contract by address.",
        }
    }

    fn plan(&self, target: &ContractTarget) -> CallPlan {
        vec![
            Call::contract(
                "balanceOf",
                &target.contract,
                selectors::BALANCE_OF,
                vec![CallArg::Address(target.address.clone())],
            ),
            Call::contract("symbol", &target.contract, selectors::SYMBOL, vec![]),
        ]
    }

    fn interpret(&self, _target: &ContractTarget, results: &[String]) -> Result<Reading, ProbeError> {
        let balance = codec::decode_numeric(super::result(results, 0)?);
        let symbol = codec::decode_abi_string(super::result(results, 1)?)
            .map_err(|source| ProbeError::Decode {
                call: "symbol",
                source,
            })?;
        Ok(Reading::value(balance).with_label(LABEL_SYMBOL, symbol))
    }
}
