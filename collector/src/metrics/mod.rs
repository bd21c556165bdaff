//! # Metrics Module
//!
//! Every series the exporter publishes lives in one [`Registry`] owned by [`Metrics`]. The registry is
//! created at startup and is never reset, so the last written value of every series stays visible until
//! it is overwritten, even across failed cycles.
//!
//! Instruments are only reachable through typed setters. Label sets are passed as structs instead of
//! positional strings so a label can't be forgotten or swapped.

mod boxinfo_metrics;
mod exporter_metrics;
mod homeauto_metrics;

pub use boxinfo_metrics::{
    BoxInfoMetrics,
    BoxLabels,
};
pub use exporter_metrics::{
    ExporterMetrics,
    FieldKind,
};
pub use homeauto_metrics::{
    DeviceLabels,
    HomeAutoMetrics,
};

use prometheus::{
    Encoder as _,
    Opts,
    Registry,
    TextEncoder,
};

pub(crate) const NAMESPACE: &str = "fritzbox";

/// Content type of [`Metrics::encode`].
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

pub(crate) fn opts(subsystem: &str, name: &str, help: &str) -> Opts {
    Opts::new(name, help).namespace(NAMESPACE).subsystem(subsystem)
}

pub struct Metrics {
    registry: Registry,
    pub exporter: ExporterMetrics,
    pub boxinfo: BoxInfoMetrics,
    pub homeauto: HomeAutoMetrics,
}

impl Metrics {
    /// Create all instruments and register them. Fails only on conflicting metric names.
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        Ok(Self {
            exporter: ExporterMetrics::register(&registry)?,
            boxinfo: BoxInfoMetrics::register(&registry)?,
            homeauto: HomeAutoMetrics::register(&registry)?,
            registry,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The current state of every series in the Prometheus text format.
    pub fn encode(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
    }

    /// Value of the series `name` with exactly the given labels, if it exists.
    #[cfg(test)]
    pub(crate) fn sample(&self, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
        self.registry
            .gather()
            .iter()
            .filter(|family| family.get_name() == name)
            .flat_map(|family| family.get_metric())
            .find(|metric| {
                let pairs = metric.get_label();
                pairs.len() == labels.len()
                    && labels
                        .iter()
                        .all(|(key, value)| pairs.iter().any(|pair| pair.get_name() == *key && pair.get_value() == *value))
            })
            .map(|metric| {
                if metric.has_gauge() {
                    metric.get_gauge().get_value()
                } else {
                    metric.get_counter().get_value()
                }
            })
    }

    /// Number of series in the family `name`.
    #[cfg(test)]
    pub(crate) fn series_count(&self, name: &str) -> usize {
        self.registry
            .gather()
            .iter()
            .filter(|family| family.get_name() == name)
            .map(|family| family.get_metric().len())
            .sum()
    }
}
