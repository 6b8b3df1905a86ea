//! Spot price of a Uniswap V2 pair from its reserves.
//!
//! `getReserves()` returns `(reserve0, reserve1, blockTimestampLast)`; the
//! gauge is `reserve1 / reserve0`, the price of `from` (token0) in units of
//! `to` (token1), without decimal adjustment.

use crate::codec::{self, selectors};
use crate::error::ProbeError;
use crate::labels::{LABEL_CONTRACT, LABEL_FROM, LABEL_NAME, LABEL_TO};
use crate::metrics::MetricDescriptor;
use crate::probe::{Call, CallPlan, ContractProbe, Reading};
use crate::targets::PairTarget;

pub const NAME: &str = "uniswap_pair";

#[derive(Debug, Clone, Copy, Default)]
pub struct UniswapPair;

/// Decode `(reserve0, reserve1)` from a `getReserves()` result.
///
/// Missing words decode as zero.
pub fn decode_reserves(hex_str: &str) -> (f64, f64) {
    let words = codec::split_words(hex_str);
    let reserve = |i: usize| words.get(i).map_or(0.0, |w| codec::decode_numeric(w));
    (reserve(0), reserve(1))
}

impl ContractProbe for UniswapPair {
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
            help: "The price of a uniswap pair derived from its reserves.",
            error_help: "The total errors when getting the reserves of a uniswap pair.",
        }
    }

    fn plan(&self, target: &PairTarget) -> CallPlan {
        vec![Call::contract(
            "getReserves",
            &target.contract,
            selectors::GET_RESERVES,
            vec![],
        )]
    }

    fn interpret(&self, _target: &PairTarget, results: &[String]) -> Result<Reading, ProbeError> {
        let (reserve0, reserve1) = decode_reserves(super::result(results, 0)?);
        if reserve0 == 0.0 {
            return Err(ProbeError::EmptyReserve { token: "reserve0" });
        }
        Ok(Reading::value(reserve1 / reserve0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_reserves_decode_equal() {
        let (r0, r1) = decode_reserves("0x0000000000000000000000000000000000000000000000000de0b6b3a76400000000000000000000000000000000000000000000000000000de0b6b3a7640000");
        assert_eq!(r0, r1);
        assert_eq!(r0, 1e18);
    }

    #[test]
    fn missing_words_are_zero() {
        assert_eq!(decode_reserves("0x"), (0.0, 0.0));
    }
}
