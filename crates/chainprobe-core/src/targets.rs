//! Configured probe targets — one entry in a job's `addresses` list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::codec::U256;
use crate::labels::{
    LabelSource, LABEL_ADDRESS, LABEL_CONTRACT, LABEL_FROM, LABEL_NAME, LABEL_TO, LABEL_TOKEN_ID,
};

/// An externally owned account whose native balance is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTarget {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// A holder `address` queried against a single `contract`
/// (ERC20, ERC721, ERC4337 EntryPoint, ERC4626 vault).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTarget {
    pub name: String,
    pub address: String,
    pub contract: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// A holder `address` of one ERC1155 `token_id`.
///
/// `token_id` is a full `uint256`: a YAML integer up to `u128`, or a decimal
/// or `0x` hex string for anything wider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTarget {
    pub name: String,
    pub address: String,
    pub contract: String,
    #[serde(alias = "tokenId", alias = "tokenID", with = "token_id")]
    pub token_id: U256,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// A price source between two symbols (Chainlink feed, Uniswap V2 pair).
/// `from` / `to` are labels only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairTarget {
    pub name: String,
    pub contract: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl LabelSource for AccountTarget {
    fn custom_labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    fn base_value(&self, label: &str) -> Option<String> {
        match label {
            LABEL_NAME => Some(self.name.clone()),
            LABEL_ADDRESS => Some(self.address.clone()),
            _ => None,
        }
    }
}

impl LabelSource for ContractTarget {
    fn custom_labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    fn base_value(&self, label: &str) -> Option<String> {
        match label {
            LABEL_NAME => Some(self.name.clone()),
            LABEL_ADDRESS => Some(self.address.clone()),
            LABEL_CONTRACT => Some(self.contract.clone()),
            _ => None,
        }
    }
}

impl LabelSource for TokenTarget {
    fn custom_labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    fn base_value(&self, label: &str) -> Option<String> {
        match label {
            LABEL_NAME => Some(self.name.clone()),
            LABEL_ADDRESS => Some(self.address.clone()),
            LABEL_CONTRACT => Some(self.contract.clone()),
            LABEL_TOKEN_ID => Some(self.token_id.to_string()),
            _ => None,
        }
    }
}

impl LabelSource for PairTarget {
    fn custom_labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    fn base_value(&self, label: &str) -> Option<String> {
        match label {
            LABEL_NAME => Some(self.name.clone()),
            LABEL_CONTRACT => Some(self.contract.clone()),
            LABEL_FROM => Some(self.from.clone()),
            LABEL_TO => Some(self.to.clone()),
            _ => None,
        }
    }
}

/// Serde adapter for `uint256` token ids; serialized as a decimal string.
mod token_id {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    use crate::codec::U256;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        deserializer.deserialize_any(TokenIdVisitor)
    }

    struct TokenIdVisitor;

    impl<'de> Visitor<'de> for TokenIdVisitor {
        type Value = U256;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or a decimal / 0x-hex string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<U256, E> {
            Ok(U256::from(v))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<U256, E> {
            Ok(U256::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<U256, E> {
            u64::try_from(v)
                .map(U256::from)
                .map_err(|_| E::custom(format!("token id must not be negative: {v}")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<U256, E> {
            let v = v.trim();
            let parsed = match v.strip_prefix("0x").or_else(|| v.strip_prefix("0X")) {
                Some(hex) => U256::from_str_radix(hex, 16),
                None => U256::from_str_radix(v, 10),
            };
            parsed.map_err(|e| E::custom(format!("invalid token id '{v}': {e}")))
        }
    }
}
