//! ERC1155 balance of one token id held by an address.

use crate::codec::{self, selectors};
use crate::error::ProbeError;
use crate::labels::{LABEL_ADDRESS, LABEL_CONTRACT, LABEL_NAME, LABEL_TOKEN_ID};
use crate::metrics::MetricDescriptor;
use crate::probe::{Call, CallArg, CallPlan, ContractProbe, Reading};
use crate::targets::TokenTarget;

pub const NAME: &str = "erc1155";

#[derive(Debug, Clone, Copy, Default)]
pub struct Erc1155;

impl ContractProbe for Erc1155 {
    type Target = TokenTarget;

    fn name(&self) -> &'static str {
        NAME
    }

    fn base_labels(&self) -> &'static [&'static str] {
        &[LABEL_NAME, LABEL_ADDRESS, LABEL_CONTRACT, LABEL_TOKEN_ID]
    }

    fn metric(&self) -> MetricDescriptor {
        MetricDescriptor {
            name: "balance",
            help: "The balance of a ethereum ERC1155 token by address and token id.",
            error_help: "The total errors when getting the balance of a ethereum ERC1155 token by address and token id.",
        }
    }

    fn plan(&self, target: &TokenTarget) -> CallPlan {
        vec![Call::contract(
            "balanceOf",
            &target.contract,
            selectors::BALANCE_OF_TOKEN,
            vec![
                CallArg::Address(target.address.clone()),
                CallArg::Uint(target.token_id),
            ],
        )]
    }

    fn interpret(&self, _target: &TokenTarget, results: &[String]) -> Result<Reading, ProbeError> {
        Ok(Reading::value(codec::decode_numeric(super::result(results, 0)?)))
    }
}
