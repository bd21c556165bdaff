use super::opts;
use prometheus::{
    GaugeVec,
    Registry,
};

const SUBSYSTEM: &str = "boxinfo";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoxLabels {
    pub model: String,
    pub firmware_version: String,
}

impl BoxLabels {
    fn values(&self) -> [&str; 2] {
        [self.model.as_str(), self.firmware_version.as_str()]
    }
}

#[derive(Clone)]
pub struct BoxInfoMetrics {
    lifetime: GaugeVec,
    reboots: GaugeVec,
}

impl BoxInfoMetrics {
    pub(crate) fn register(registry: &Registry) -> prometheus::Result<Self> {
        let labels = ["model", "firmware_version"];
        let metrics = Self {
            lifetime: GaugeVec::new(
                opts(SUBSYSTEM, "lifetime", "Running time of the box since first use in days."),
                &labels,
            )?,
            reboots: GaugeVec::new(opts(SUBSYSTEM, "reboots", "Number of reboots of the box."), &labels)?,
        };

        registry.register(Box::new(metrics.lifetime.clone()))?;
        registry.register(Box::new(metrics.reboots.clone()))?;
        Ok(metrics)
    }

    pub fn set(&self, labels: &BoxLabels, lifetime_days: f64, reboots: u32) {
        self.lifetime.with_label_values(&labels.values()).set(lifetime_days);
        self.reboots.with_label_values(&labels.values()).set(f64::from(reboots));
    }
}
