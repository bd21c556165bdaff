use super::opts;
use prometheus::{
    Gauge,
    IntCounter,
    IntCounterVec,
    IntGauge,
    Registry,
};
use std::time::Duration;
use strum::{
    AsRefStr,
    Display,
};

const SUBSYSTEM: &str = "exporter";

/// Device fields whose raw value may fail to parse as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    Temperature,
    SwitchState,
    Power,
    Energy,
}

/// Health of the exporter itself.
#[derive(Clone)]
pub struct ExporterMetrics {
    duration: Gauge,
    total_scrapes: IntCounter,
    scrape_errors: IntCounterVec,
    field_parse_errors: IntCounterVec,
    error: IntGauge,
    up: IntGauge,
}

impl ExporterMetrics {
    pub(crate) fn register(registry: &Registry) -> prometheus::Result<Self> {
        let metrics = Self {
            duration: Gauge::with_opts(opts(
                SUBSYSTEM,
                "last_scrape_duration_seconds",
                "Duration of the last scrape of metrics from FRITZ!Box.",
            ))?,
            total_scrapes: IntCounter::with_opts(opts(
                SUBSYSTEM,
                "scrapes_total",
                "Total number of times FRITZ!Box was scraped for metrics.",
            ))?,
            scrape_errors: IntCounterVec::new(
                opts(
                    SUBSYSTEM,
                    "scrape_errors_total",
                    "Total number of times an error occurred scraping a FRITZ!Box.",
                ),
                &["collector"],
            )?,
            field_parse_errors: IntCounterVec::new(
                opts(
                    SUBSYSTEM,
                    "field_parse_errors_total",
                    "Total number of device readings that could not be parsed as a number.",
                ),
                &["field"],
            )?,
            error: IntGauge::with_opts(opts(
                SUBSYSTEM,
                "last_scrape_error",
                "Whether the last scrape of metrics from FRITZ!Box resulted in an error (1 for error, 0 for success).",
            ))?,
            up: IntGauge::with_opts(opts(SUBSYSTEM, "up", "Whether the FRITZ!Box is up."))?,
        };

        registry.register(Box::new(metrics.duration.clone()))?;
        registry.register(Box::new(metrics.total_scrapes.clone()))?;
        registry.register(Box::new(metrics.scrape_errors.clone()))?;
        registry.register(Box::new(metrics.field_parse_errors.clone()))?;
        registry.register(Box::new(metrics.error.clone()))?;
        registry.register(Box::new(metrics.up.clone()))?;
        Ok(metrics)
    }

    pub fn set_duration(&self, duration: Duration) {
        self.duration.set(duration.as_secs_f64());
    }

    pub fn inc_total_scrapes(&self) {
        self.total_scrapes.inc();
    }

    /// Expose the error counter of a routine with 0 before its first failure.
    pub fn init_scrape_errors(&self, collector: &str) {
        self.scrape_errors.with_label_values(&[collector]);
    }

    pub fn inc_scrape_errors(&self, collector: &str) {
        self.scrape_errors.with_label_values(&[collector]).inc();
    }

    pub fn inc_field_parse_errors(&self, field: FieldKind) {
        self.field_parse_errors.with_label_values(&[field.as_ref()]).inc();
    }

    /// Connected and authenticated: up is 1 and the error flag is cleared.
    pub fn mark_up(&self) {
        self.up.set(1);
        self.error.set(0);
    }

    pub fn mark_down(&self) {
        self.up.set(0);
        self.error.set(1);
    }
}
