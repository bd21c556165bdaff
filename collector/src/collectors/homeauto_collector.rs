use crate::{
    collectors::{
        CollectFuture,
        Collector,
    },
    metrics::{
        DeviceLabels,
        FieldKind,
        HomeAutoMetrics,
        Metrics,
    },
};
use fritzbox_client::{
    Device,
    DeviceClient,
};
use std::collections::HashSet;

/// A numeric reading of a device, or why its raw value was unusable.
pub type Reading = Result<f64, FieldParseError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Cannot parse {field} value {raw:?}")]
pub struct FieldParseError {
    pub field: FieldKind,
    pub raw: String,
}

/// Everything published for one device in one cycle. A reading is `None` when the device lacks the
/// capability.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSample {
    pub labels: DeviceLabels,
    pub present: bool,
    pub temperature: Option<Reading>,
    pub switch_state: Option<Reading>,
    pub power: Option<Reading>,
    pub energy: Option<Reading>,
}

impl DeviceSample {
    pub fn from_device(device: &Device) -> Self {
        Self {
            labels: DeviceLabels {
                uuid: device.identifier.clone(),
                name: device.name.clone(),
                productname: device.productname.clone(),
            },
            present: device.is_present(),
            temperature: device.temperature().map(|temperature| {
                parse_reading(FieldKind::Temperature, &temperature.fmt_celsius()).map_err(|err| FieldParseError {
                    raw: temperature.celsius.clone(),
                    ..err
                })
            }),
            switch_state: device
                .switch()
                .map(|switch| parse_reading(FieldKind::SwitchState, &switch.state)),
            power: device
                .powermeter()
                .map(|meter| parse_reading(FieldKind::Power, &meter.power).map(|milliwatts| milliwatts * 0.001)),
            energy: device
                .powermeter()
                .map(|meter| parse_reading(FieldKind::Energy, &meter.energy)),
        }
    }

    fn write(&self, metrics: &Metrics) {
        let (labels, homeauto) = (&self.labels, &metrics.homeauto);
        homeauto.set_present(labels, self.present);

        let readings: [(&Option<Reading>, fn(&HomeAutoMetrics, &DeviceLabels, f64)); 4] = [
            (&self.temperature, HomeAutoMetrics::set_temperature),
            (&self.switch_state, HomeAutoMetrics::set_switch_state),
            (&self.power, HomeAutoMetrics::set_power),
            (&self.energy, HomeAutoMetrics::set_energy),
        ];
        for (reading, set) in readings {
            match reading {
                Some(Ok(value)) => set(homeauto, labels, *value),
                Some(Err(err)) => {
                    debug!(uuid = %labels.uuid, name = %labels.name, "{err}");
                    metrics.exporter.inc_field_parse_errors(err.field);
                }
                None => {}
            }
        }
    }
}

fn parse_reading(field: FieldKind, raw: &str) -> Reading {
    raw.trim().parse::<f64>().map_err(|_| FieldParseError {
        field,
        raw: raw.to_string(),
    })
}

/// Presence and sensor readings of every smart home device.
#[derive(Debug, Default)]
pub struct HomeAutoCollector {
    prune_stale_devices: bool,
    seen: HashSet<DeviceLabels>,
}

impl HomeAutoCollector {
    /// With `prune_stale_devices`, series of devices missing from the latest successful device list are
    /// dropped. Otherwise they keep their last value.
    pub fn new(prune_stale_devices: bool) -> Self {
        Self {
            prune_stale_devices,
            seen: HashSet::new(),
        }
    }
}

impl Collector for HomeAutoCollector {
    fn name(&self) -> &'static str {
        "homeauto"
    }

    fn collect<'a>(&'a mut self, client: &'a dyn DeviceClient, metrics: &'a Metrics) -> CollectFuture<'a> {
        Box::pin(async move {
            let list = client.list().await?;
            debug!(devices = list.devices.len(), "Fetched device list");

            let mut identifiers = HashSet::new();
            let mut seen = HashSet::new();
            for device in &list.devices {
                if !identifiers.insert(device.identifier.as_str()) {
                    warn!(uuid = %device.identifier, "Device reported twice, keeping the first entry");
                    continue;
                }
                let sample = DeviceSample::from_device(device);
                sample.write(metrics);
                seen.insert(sample.labels);
            }

            if self.prune_stale_devices {
                for stale in self.seen.difference(&seen) {
                    info!(uuid = %stale.uuid, name = %stale.name, "Device disappeared, removing its series");
                    metrics.homeauto.remove(stale);
                }
            }
            self.seen = seen;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collectors::ScrapeError,
        testing::{
            device,
            smart_plug,
            FakeConnector,
            Script,
        },
        Connector,
    };
    use fritzbox_client::homeauto::{
        Powermeter,
        Temperature,
    };
    use pretty_assertions::assert_eq;
    use std::sync::{
        atomic::Ordering,
        Arc,
    };

    fn labels<'a>(uuid: &'a str, name: &'a str) -> [(&'a str, &'a str); 3] {
        [("uuid", uuid), ("name", name), ("productname", "FRITZ!DECT 200")]
    }

    async fn scrape(
        collector: &mut HomeAutoCollector,
        script: &Arc<Script>,
        metrics: &Metrics,
    ) -> Result<(), ScrapeError> {
        let mut client = FakeConnector::new(script.clone()).connect().unwrap();
        client.login().await.unwrap();
        collector.collect(client.as_ref(), metrics).await
    }

    #[test]
    fn sample_of_a_smart_plug() {
        let sample = DeviceSample::from_device(&smart_plug("1", "Kitchen"));

        assert!(sample.present);
        assert_eq!(sample.temperature, Some(Ok(21.5)));
        assert_eq!(sample.switch_state, Some(Ok(1.0)));
        let power = sample.power.unwrap().unwrap();
        assert!((power - 1.5).abs() < 1e-9, "{power}");
        assert_eq!(sample.energy, Some(Ok(75519.0)));
    }

    #[test]
    fn sample_without_capabilities() {
        let sample = DeviceSample::from_device(&device("2", "Hallway", false));

        assert!(!sample.present);
        assert_eq!(sample.temperature, None);
        assert_eq!(sample.switch_state, None);
        assert_eq!(sample.power, None);
        assert_eq!(sample.energy, None);
    }

    #[test]
    fn unparsable_readings() {
        let sample = DeviceSample::from_device(
            &device("3", "Bedroom", true)
                .with_temperature(Temperature {
                    celsius: "N/A".to_string(),
                    offset: "0".to_string(),
                })
                .with_powermeter(Powermeter {
                    power: String::new(),
                    energy: "12".to_string(),
                }),
        );

        assert!(matches!(
            sample.temperature,
            Some(Err(FieldParseError {
                field: FieldKind::Temperature,
                ..
            }))
        ));
        assert!(matches!(
            sample.power,
            Some(Err(FieldParseError {
                field: FieldKind::Power,
                ..
            }))
        ));
        assert_eq!(sample.energy, Some(Ok(12.0)));
    }

    #[tokio::test]
    async fn writes_every_device() {
        let script = Script::with_devices(vec![smart_plug("1", "Kitchen"), device("2", "Hallway", false)]);
        let metrics = Metrics::new().unwrap();
        let mut collector = HomeAutoCollector::new(false);

        scrape(&mut collector, &script, &metrics).await.unwrap();

        assert_eq!(metrics.sample("fritzbox_homeauto_device_present", &labels("1", "Kitchen")), Some(1.0));
        assert_eq!(metrics.sample("fritzbox_homeauto_device_present", &labels("2", "Hallway")), Some(0.0));
        assert_eq!(metrics.sample("fritzbox_homeauto_device_temperature", &labels("1", "Kitchen")), Some(21.5));
        assert_eq!(metrics.sample("fritzbox_homeauto_device_switch_state", &labels("1", "Kitchen")), Some(1.0));
        assert_eq!(metrics.sample("fritzbox_homeauto_device_energy", &labels("1", "Kitchen")), Some(75519.0));
        // No capabilities, no readings
        assert_eq!(metrics.sample("fritzbox_homeauto_device_power", &labels("2", "Hallway")), None);
        assert_eq!(metrics.series_count("fritzbox_homeauto_device_power"), 1);
    }

    #[tokio::test]
    async fn unparsable_temperature_keeps_the_previous_value() {
        let script = Script::with_devices(vec![smart_plug("1", "Kitchen")]);
        let metrics = Metrics::new().unwrap();
        let mut collector = HomeAutoCollector::new(false);
        scrape(&mut collector, &script, &metrics).await.unwrap();

        script.set_devices(vec![device("1", "Kitchen", true).with_temperature(Temperature {
            celsius: "N/A".to_string(),
            offset: "0".to_string(),
        })]);
        scrape(&mut collector, &script, &metrics).await.unwrap();

        assert_eq!(metrics.sample("fritzbox_homeauto_device_temperature", &labels("1", "Kitchen")), Some(21.5));
        assert_eq!(metrics.sample("fritzbox_homeauto_device_present", &labels("1", "Kitchen")), Some(1.0));
        assert_eq!(
            metrics.sample("fritzbox_exporter_field_parse_errors_total", &[("field", "temperature")]),
            Some(1.0)
        );
    }

    #[tokio::test]
    async fn failed_list_writes_nothing() {
        let script = Script::with_devices(vec![smart_plug("1", "Kitchen")]);
        script.fail_list.store(true, Ordering::SeqCst);
        let metrics = Metrics::new().unwrap();
        let mut collector = HomeAutoCollector::new(true);

        assert!(matches!(scrape(&mut collector, &script, &metrics).await, Err(ScrapeError::Query(_))));
        assert_eq!(metrics.series_count("fritzbox_homeauto_device_present"), 0);
    }

    #[tokio::test]
    async fn duplicate_identifiers_keep_the_first_entry() {
        let script = Script::with_devices(vec![device("1", "Kitchen", true), device("1", "Renamed", false)]);
        let metrics = Metrics::new().unwrap();

        scrape(&mut HomeAutoCollector::new(false), &script, &metrics).await.unwrap();

        assert_eq!(metrics.series_count("fritzbox_homeauto_device_present"), 1);
        assert_eq!(metrics.sample("fritzbox_homeauto_device_present", &labels("1", "Kitchen")), Some(1.0));
    }

    #[tokio::test]
    async fn vanished_devices_are_kept_by_default() {
        let script = Script::with_devices(vec![smart_plug("1", "Kitchen"), device("2", "Hallway", true)]);
        let metrics = Metrics::new().unwrap();
        let mut collector = HomeAutoCollector::new(false);
        scrape(&mut collector, &script, &metrics).await.unwrap();

        script.set_devices(vec![device("2", "Hallway", true)]);
        scrape(&mut collector, &script, &metrics).await.unwrap();

        assert_eq!(metrics.sample("fritzbox_homeauto_device_present", &labels("1", "Kitchen")), Some(1.0));
        assert_eq!(metrics.sample("fritzbox_homeauto_device_power", &labels("1", "Kitchen")), Some(1.5));
    }

    #[tokio::test]
    async fn vanished_devices_are_pruned_when_enabled() {
        let script = Script::with_devices(vec![smart_plug("1", "Kitchen"), device("2", "Hallway", true)]);
        let metrics = Metrics::new().unwrap();
        let mut collector = HomeAutoCollector::new(true);
        scrape(&mut collector, &script, &metrics).await.unwrap();

        // A failed list prunes nothing
        script.fail_list.store(true, Ordering::SeqCst);
        assert!(scrape(&mut collector, &script, &metrics).await.is_err());
        assert_eq!(metrics.series_count("fritzbox_homeauto_device_present"), 2);

        script.fail_list.store(false, Ordering::SeqCst);
        script.set_devices(vec![device("2", "Hallway", true)]);
        scrape(&mut collector, &script, &metrics).await.unwrap();

        assert_eq!(metrics.sample("fritzbox_homeauto_device_present", &labels("1", "Kitchen")), None);
        assert_eq!(metrics.series_count("fritzbox_homeauto_device_power"), 0);
        assert_eq!(metrics.sample("fritzbox_homeauto_device_present", &labels("2", "Hallway")), Some(1.0));
    }

    #[tokio::test]
    async fn renamed_device_drops_the_old_label_set_when_pruning() {
        let script = Script::with_devices(vec![device("1", "Kitchen", true)]);
        let metrics = Metrics::new().unwrap();
        let mut collector = HomeAutoCollector::new(true);
        scrape(&mut collector, &script, &metrics).await.unwrap();

        script.set_devices(vec![device("1", "Pantry", true)]);
        scrape(&mut collector, &script, &metrics).await.unwrap();

        assert_eq!(metrics.series_count("fritzbox_homeauto_device_present"), 1);
        assert_eq!(metrics.sample("fritzbox_homeauto_device_present", &labels("1", "Pantry")), Some(1.0));
    }
}
