//! The built-in probe variants.
//!
//! | Job name              | Calls                                         | Gauge     |
//! |-----------------------|-----------------------------------------------|-----------|
//! | `account`             | `eth_getBalance`                              | `balance` |
//! | `erc20`               | `balanceOf` → `symbol`                        | `balance` |
//! | `erc721`              | `balanceOf`                                   | `balance` |
//! | `erc1155`             | `balanceOf(address,uint256)`                  | `balance` |
//! | `erc4337`             | `balanceOf` on the EntryPoint                 | `balance` |
//! | `erc4626`             | `balanceOf` → `convertToAssets` → `symbol`    | `assets`  |
//! | `chainlink_data_feed` | `latestAnswer`                                | `balance` |
//! | `uniswap_pair`        | `getReserves`                                 | `balance` |

pub mod account;
pub mod chainlink;
pub mod erc1155;
pub mod erc20;
pub mod erc4337;
pub mod erc4626;
pub mod erc721;
pub mod uniswap;

pub use account::Account;
pub use chainlink::ChainlinkDataFeed;
pub use erc1155::Erc1155;
pub use erc20::Erc20;
pub use erc4337::Erc4337;
pub use erc4626::Erc4626;
pub use erc721::Erc721;
pub use uniswap::UniswapPair;

use crate::error::ProbeError;

/// Result `index` of a plan; the engine guarantees one result per call.
pub(crate) fn result(results: &[String], index: usize) -> Result<&str, ProbeError> {
    results
        .get(index)
        .map(String::as_str)
        .ok_or(ProbeError::UnresolvedArgument {
            step: results.len(),
            reference: index,
        })
}
