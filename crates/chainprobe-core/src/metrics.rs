//! Per-job Prometheus instruments.
//!
//! Every job owns one gauge vector (the probed value) and one counter vector
//! (probe failures), both keyed by the job's [`LabelSchema`] and registered
//! into a registry owned by the process entry point.

use std::collections::HashMap;

use prometheus::core::Collector;
use prometheus::proto::{Metric, MetricFamily};
use prometheus::{CounterVec, GaugeVec, Opts, Registry};

use crate::labels::LabelSchema;

/// Name of every job's error counter.
pub const ERRORS_METRIC: &str = "errors_total";

/// Static description of the gauge a probe writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDescriptor {
    /// Gauge name, e.g. `balance` or `assets`.
    pub name: &'static str,
    pub help: &'static str,
    pub error_help: &'static str,
}

/// The value and error instruments of one job.
#[derive(Clone)]
pub struct Instruments {
    value: GaugeVec,
    errors: CounterVec,
    label_names: Vec<String>,
}

impl Instruments {
    /// Create both instruments under `<namespace>_<job>_*` and register them.
    pub fn register(
        registry: &Registry,
        namespace: &str,
        job: &str,
        descriptor: &MetricDescriptor,
        schema: &LabelSchema,
        const_labels: &HashMap<String, String>,
    ) -> Result<Self, prometheus::Error> {
        let namespace = format!("{namespace}_{job}");
        let labels: Vec<&str> = schema.names().iter().map(String::as_str).collect();

        let value = GaugeVec::new(
            Opts::new(descriptor.name, descriptor.help)
                .namespace(namespace.clone())
                .const_labels(const_labels.clone()),
            &labels,
        )?;
        let errors = CounterVec::new(
            Opts::new(ERRORS_METRIC, descriptor.error_help)
                .namespace(namespace)
                .const_labels(const_labels.clone()),
            &labels,
        )?;

        registry.register(Box::new(value.clone()))?;
        registry.register(Box::new(errors.clone()))?;

        Ok(Self {
            value,
            errors,
            label_names: schema.names().to_vec(),
        })
    }

    /// Set the gauge for one label vector.
    pub fn set(&self, label_values: &[String], value: f64) -> Result<(), prometheus::Error> {
        let values: Vec<&str> = label_values.iter().map(String::as_str).collect();
        self.value.get_metric_with_label_values(&values)?.set(value);
        Ok(())
    }

    /// Increment the error counter for one label vector.
    pub fn inc_error(&self, label_values: &[String]) -> Result<(), prometheus::Error> {
        let values: Vec<&str> = label_values.iter().map(String::as_str).collect();
        self.errors.get_metric_with_label_values(&values)?.inc();
        Ok(())
    }

    /// Current gauge value for a label vector, if it was ever set.
    pub fn value(&self, label_values: &[&str]) -> Option<f64> {
        let families = self.value.collect();
        self.find(&families, label_values)
            .map(|m| m.get_gauge().get_value())
    }

    /// Current error count for a label vector.
    pub fn errors(&self, label_values: &[&str]) -> f64 {
        let families = self.errors.collect();
        self.find(&families, label_values)
            .map_or(0.0, |m| m.get_counter().get_value())
    }

    /// Exported samples are keyed by name (and sorted), so match pairwise.
    fn find<'a>(&self, families: &'a [MetricFamily], label_values: &[&str]) -> Option<&'a Metric> {
        families
            .iter()
            .flat_map(|family| family.get_metric())
            .find(|metric| {
                self.label_names
                    .iter()
                    .zip(label_values)
                    .all(|(name, value)| {
                        metric
                            .get_label()
                            .iter()
                            .any(|pair| pair.get_name() == name && pair.get_value() == *value)
                    })
            })
    }

    pub fn gauge(&self) -> &GaugeVec {
        &self.value
    }

    pub fn counter(&self) -> &CounterVec {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{LABEL_ADDRESS, LABEL_NAME};
    use crate::targets::AccountTarget;

    const DESCRIPTOR: MetricDescriptor = MetricDescriptor {
        name: "balance",
        help: "test balance",
        error_help: "test errors",
    };

    fn schema() -> LabelSchema {
        LabelSchema::build::<AccountTarget, _>(&[LABEL_NAME, LABEL_ADDRESS], [])
    }

    #[test]
    fn registers_namespaced_families() {
        let registry = Registry::new();
        let mut const_labels = HashMap::new();
        const_labels.insert("network".to_string(), "mainnet".to_string());
        let instruments =
            Instruments::register(&registry, "eth", "account", &DESCRIPTOR, &schema(), &const_labels)
                .unwrap();

        let labels = vec!["wallet".to_string(), "0x1".to_string()];
        instruments.set(&labels, 42.0).unwrap();
        instruments.inc_error(&labels).unwrap();

        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|f| f.get_name().to_string())
            .collect();
        assert!(names.contains(&"eth_account_balance".to_string()));
        assert!(names.contains(&"eth_account_errors_total".to_string()));
        assert_eq!(instruments.value(&["wallet", "0x1"]), Some(42.0));
        assert_eq!(instruments.errors(&["wallet", "0x1"]), 1.0);
    }

    #[test]
    fn duplicate_registration_fails() {
        let registry = Registry::new();
        let empty = HashMap::new();
        Instruments::register(&registry, "eth", "account", &DESCRIPTOR, &schema(), &empty).unwrap();
        assert!(
            Instruments::register(&registry, "eth", "account", &DESCRIPTOR, &schema(), &empty)
                .is_err()
        );
    }

    #[test]
    fn wrong_label_count_is_an_error() {
        let registry = Registry::new();
        let instruments =
            Instruments::register(&registry, "eth", "account", &DESCRIPTOR, &schema(), &HashMap::new())
                .unwrap();
        assert!(instruments.set(&["only-one".to_string()], 1.0).is_err());
    }
}
