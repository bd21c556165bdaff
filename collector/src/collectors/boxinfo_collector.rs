use crate::{
    collectors::{
        CollectFuture,
        Collector,
    },
    metrics::{
        BoxLabels,
        Metrics,
    },
};
use fritzbox_client::{
    boxinfo::{
        FirmwareVersion,
        Runtime,
    },
    DeviceClient,
};

const DAYS_PER_YEAR: f64 = 365.2422;
const DAYS_PER_MONTH: f64 = 30.43685;

/// Lifetime and reboot count of the box itself.
#[derive(Debug, Default)]
pub struct BoxInfoCollector;

impl BoxInfoCollector {
    pub fn new() -> Self {
        Self
    }
}

/// `<major>.<minor>.<revision>`, e.g. `07.12.03`. The image number is not part of it.
pub fn firmware_version_label(firmware: &FirmwareVersion) -> String {
    format!(
        "{}.{}.{}",
        firmware.os_version_major, firmware.os_version_minor, firmware.os_version_revision
    )
}

/// Total runtime in days. The box reports years and months only as calendar units, so they are
/// converted with their mean length. Hours are ignored.
pub fn runtime_days(runtime: &Runtime) -> f64 {
    f64::from(runtime.years) * DAYS_PER_YEAR + f64::from(runtime.months) * DAYS_PER_MONTH + f64::from(runtime.days)
}

impl Collector for BoxInfoCollector {
    fn name(&self) -> &'static str {
        "boxinfo"
    }

    fn collect<'a>(&'a mut self, client: &'a dyn DeviceClient, metrics: &'a Metrics) -> CollectFuture<'a> {
        Box::pin(async move {
            let info = client.box_info().await?;
            let labels = BoxLabels {
                model: info.model.name.clone(),
                firmware_version: firmware_version_label(&info.firmware),
            };
            let lifetime = runtime_days(&info.runtime);
            debug!(model = %labels.model, firmware = %labels.firmware_version, lifetime, "Fetched box info");

            metrics.boxinfo.set(&labels, lifetime, info.runtime.reboots);
            Ok(())
        })
    }
}
