//! ERC4626 vault position of a holder, expressed in underlying assets.
//!
//! Three sequential calls against the vault: the holder's share balance,
//! the conversion of exactly those shares to assets, then the vault symbol.
//! Any failing step aborts the probe.

use crate::codec::{self, selectors};
use crate::error::ProbeError;
use crate::labels::{LABEL_ADDRESS, LABEL_CONTRACT, LABEL_NAME, LABEL_SYMBOL};
use crate::metrics::MetricDescriptor;
use crate::probe::{Call, CallArg, CallPlan, ContractProbe, Reading};
use crate::targets::ContractTarget;

pub const NAME: &str = "erc4626";

const SHARES: usize = 0;
const ASSETS: usize = 1;
const SYMBOL: usize = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct Erc4626;

impl ContractProbe for Erc4626 {
    type Target = ContractTarget;

    fn name(&self) -> &'static str {
        NAME
    }

    fn base_labels(&self) -> &'static [&'static str] {
        &[LABEL_NAME, LABEL_ADDRESS, LABEL_CONTRACT, LABEL_SYMBOL]
    }

    fn metric(&self) -> MetricDescriptor {
        MetricDescriptor {
            name: "assets",
            help: "The asset value from ERC4626 vault convertToAssets function.",
            error_help: "The total errors when calling ERC4626 vault functions.",
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
            Call::contract(
                "convertToAssets",
                &target.contract,
                selectors::CONVERT_TO_ASSETS,
                vec![CallArg::Result(SHARES)],
            ),
            Call::contract("symbol", &target.contract, selectors::SYMBOL, vec![]),
        ]
    }

    fn interpret(&self, _target: &ContractTarget, results: &[String]) -> Result<Reading, ProbeError> {
        let assets = codec::decode_numeric(super::result(results, ASSETS)?);
        let symbol = codec::decode_abi_string(super::result(results, SYMBOL)?)
            .map_err(|source| ProbeError::Decode {
                call: "symbol",
                source,
            })?;
        Ok(Reading::value(assets).with_label(LABEL_SYMBOL, symbol))
    }
}
