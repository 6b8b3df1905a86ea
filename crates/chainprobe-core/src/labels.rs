//! Label schema shared by a job's value and error instruments.
//!
//! A schema is built once per job: the probe's base labels come first, in
//! their fixed order, followed by every custom label name found in the
//! targets' `labels` maps. Discovered names are sorted before they are
//! assigned an index so the exposition layout is identical across restarts.

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Well-known label names.
pub const LABEL_ADDRESS: &str = "address";
pub const LABEL_CONTRACT: &str = "contract";
pub const LABEL_FROM: &str = "from";
pub const LABEL_NAME: &str = "name";
pub const LABEL_SYMBOL: &str = "symbol";
pub const LABEL_TO: &str = "to";
pub const LABEL_TOKEN_ID: &str = "token_id";

/// Value used when a label has neither a custom nor a computed value.
pub const LABEL_DEFAULT_VALUE: &str = "";

/// A configured target that can fill in label values.
pub trait LabelSource {
    /// The target's custom `labels` map.
    fn custom_labels(&self) -> &BTreeMap<String, String>;

    /// The value the target itself provides for a base label, if any.
    fn base_value(&self, label: &str) -> Option<String>;
}

/// Ordered label names plus a stable name → index map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSchema {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelSchema {
    /// Build the schema from `base` labels and every target's custom labels.
    pub fn build<'a, T, I>(base: &[&str], targets: I) -> Self
    where
        T: LabelSource + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut schema = Self {
            names: Vec::with_capacity(base.len()),
            index: HashMap::with_capacity(base.len()),
        };
        for name in base {
            schema.insert(name);
        }

        let discovered: BTreeSet<&str> = targets
            .into_iter()
            .flat_map(|t| t.custom_labels().keys())
            .map(String::as_str)
            .collect();
        for name in discovered {
            schema.insert(name);
        }
        schema
    }

    fn insert(&mut self, name: &str) {
        if self.index.contains_key(name) {
            return;
        }
        self.index.insert(name.to_string(), self.names.len());
        self.names.push(name.to_string());
    }

    /// Label names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index assigned to `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Produce the label-value vector for one target.
    ///
    /// Resolution per label: a non-empty custom value, then a value computed
    /// by the probe during this tick (e.g. `symbol`), then the target's own
    /// base value, then [`LABEL_DEFAULT_VALUE`].
    pub fn values_for<T: LabelSource + ?Sized>(
        &self,
        target: &T,
        computed: &[(&str, &str)],
    ) -> Vec<String> {
        let custom = target.custom_labels();
        self.names
            .iter()
            .map(|name| {
                if let Some(value) = custom.get(name).filter(|v| !v.is_empty()) {
                    return value.clone();
                }
                if let Some((_, value)) =
                    computed.iter().find(|(label, _)| *label == name.as_str())
                {
                    return value.to_string();
                }
                target
                    .base_value(name)
                    .unwrap_or_else(|| LABEL_DEFAULT_VALUE.to_string())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Target {
        name: String,
        address: String,
        labels: BTreeMap<String, String>,
    }

    impl LabelSource for Target {
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

    fn target(name: &str, labels: &[(&str, &str)]) -> Target {
        Target {
            name: name.into(),
            address: "0x1234".into(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn base_labels_take_lowest_indices() {
        let targets = vec![target("a", &[("zone", "eu"), ("env", "prod")])];
        let schema = LabelSchema::build(&[LABEL_NAME, LABEL_ADDRESS], &targets);
        assert_eq!(schema.index_of(LABEL_NAME), Some(0));
        assert_eq!(schema.index_of(LABEL_ADDRESS), Some(1));
        assert_eq!(schema.len(), 4);
    }

    #[test]
    fn discovered_labels_are_sorted_and_deduplicated() {
        let targets = vec![
            target("a", &[("zone", "eu")]),
            target("b", &[("env", "prod"), ("zone", "us")]),
            target("c", &[("name", "override")]),
        ];
        let schema = LabelSchema::build(&[LABEL_NAME, LABEL_ADDRESS], &targets);
        assert_eq!(schema.names(), ["name", "address", "env", "zone"]);
    }

    #[test]
    fn values_follow_schema_order() {
        let targets = vec![
            target("wallet", &[("zone", "eu")]),
            target("other", &[("env", "prod")]),
        ];
        let schema = LabelSchema::build(&[LABEL_NAME, LABEL_ADDRESS], &targets);
        for t in &targets {
            assert_eq!(schema.values_for(t, &[]).len(), schema.len());
        }
        assert_eq!(
            schema.values_for(&targets[0], &[]),
            ["wallet", "0x1234", "", "eu"]
        );
    }

    #[test]
    fn custom_value_overrides_base_unless_empty() {
        let overridden = target("wallet", &[("name", "treasury")]);
        let empty = target("wallet", &[("name", "")]);
        let schema = LabelSchema::build(&[LABEL_NAME], [&overridden, &empty]);
        let name = schema.index_of(LABEL_NAME).unwrap();
        assert_eq!(schema.values_for(&overridden, &[])[name], "treasury");
        assert_eq!(schema.values_for(&empty, &[])[name], "wallet");
    }

    #[test]
    fn computed_values_fill_probe_labels() {
        let t = target("vault", &[]);
        let schema = LabelSchema::build(&[LABEL_NAME, LABEL_SYMBOL], [&t]);
        assert_eq!(
            schema.values_for(&t, &[(LABEL_SYMBOL, "USDC")]),
            ["vault", "USDC"]
        );
        assert_eq!(schema.values_for(&t, &[]), ["vault", ""]);
    }

    #[test]
    fn custom_symbol_beats_computed_symbol() {
        let t = target("vault", &[("symbol", "sUSDC")]);
        let schema = LabelSchema::build(&[LABEL_NAME, LABEL_SYMBOL], [&t]);
        assert_eq!(
            schema.values_for(&t, &[(LABEL_SYMBOL, "USDC")]),
            ["vault", "sUSDC"]
        );
    }
}
