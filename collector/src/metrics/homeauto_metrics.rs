use super::opts;
use prometheus::{
    GaugeVec,
    Registry,
};

const SUBSYSTEM: &str = "homeauto";
const LABELS: [&str; 3] = ["uuid", "name", "productname"];

/// Identifies one smart home device across all of its series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceLabels {
    /// The AIN the box reports for the device.
    pub uuid: String,
    pub name: String,
    pub productname: String,
}

impl DeviceLabels {
    fn values(&self) -> [&str; 3] {
        [self.uuid.as_str(), self.name.as_str(), self.productname.as_str()]
    }
}

#[derive(Clone)]
pub struct HomeAutoMetrics {
    present: GaugeVec,
    temperature: GaugeVec,
    switch_state: GaugeVec,
    power: GaugeVec,
    energy: GaugeVec,
}

impl HomeAutoMetrics {
    pub(crate) fn register(registry: &Registry) -> prometheus::Result<Self> {
        let gauge = |name: &str, help: &str| GaugeVec::new(opts(SUBSYSTEM, name, help), &LABELS);
        let metrics = Self {
            present: gauge("device_present", "Device present (1) or not (0).")?,
            temperature: gauge("device_temperature", "Temperature measured at the device sensor in celsius.")?,
            switch_state: gauge("device_switch_state", "Switch state of the device, on (1) or off (0).")?,
            power: gauge("device_power", "Electric power drawn by the device in W.")?,
            energy: gauge("device_energy", "Energy consumed by the device in Wh since first use.")?,
        };

        for vec in metrics.all() {
            registry.register(Box::new(vec.clone()))?;
        }
        Ok(metrics)
    }

    fn all(&self) -> [&GaugeVec; 5] {
        [&self.present, &self.temperature, &self.switch_state, &self.power, &self.energy]
    }

    pub fn set_present(&self, labels: &DeviceLabels, present: bool) {
        self.present
            .with_label_values(&labels.values())
            .set(if present { 1.0 } else { 0.0 });
    }

    pub fn set_temperature(&self, labels: &DeviceLabels, celsius: f64) {
        self.temperature.with_label_values(&labels.values()).set(celsius);
    }

    pub fn set_switch_state(&self, labels: &DeviceLabels, state: f64) {
        self.switch_state.with_label_values(&labels.values()).set(state);
    }

    /// Power in W.
    pub fn set_power(&self, labels: &DeviceLabels, watts: f64) {
        self.power.with_label_values(&labels.values()).set(watts);
    }

    pub fn set_energy(&self, labels: &DeviceLabels, watt_hours: f64) {
        self.energy.with_label_values(&labels.values()).set(watt_hours);
    }

    /// Drop every series of a device. Series that were never written are skipped.
    pub fn remove(&self, labels: &DeviceLabels) {
        for vec in self.all() {
            // Fails only for a missing series
            let _ = vec.remove_label_values(&labels.values());
        }
    }
}
