//! ERC721 NFT count held by an address.

use crate::codec::{self, selectors};
use crate::error::ProbeError;
use crate::labels::{LABEL_ADDRESS, LABEL_CONTRACT, LABEL_NAME};
use crate::metrics::MetricDescriptor;
use crate::probe::{Call, CallArg, CallPlan, ContractProbe, Reading};
use crate::targets::ContractTarget;

pub const NAME: &str = "erc721";

#[derive(Debug, Clone, Copy, Default)]
pub struct Erc721;

impl ContractProbe for Erc721 {
    type Target = ContractTarget;

    fn name(&self) -> &'static str {
        NAME
    }

    fn base_labels(&self) -> &'static [&'static str] {
        &[LABEL_NAME, LABEL_ADDRESS, LABEL_CONTRACT]
    }

    fn metric(&self) -> MetricDescriptor {
        MetricDescriptor {
            name: "balance",
            help: "The balance of a ethereum ERC721 contract by address.",
            error_help: "The total errors when getting the balance of a ethereum ERC721 contract by address.",
        }
    }

    fn plan(&self, target: &ContractTarget) -> CallPlan {
        vec![Call::contract(
            "balanceOf",
            &target.contract,
            selectors::BALANCE_OF,
            vec![CallArg::Address(target.address.clone())],
        )]
    }

    fn interpret(&self, _target: &ContractTarget, results: &[String]) -> Result<Reading, ProbeError> {
        Ok(Reading::value(codec::decode_numeric(super::result(results, 0)?)))
    }
}
