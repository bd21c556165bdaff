//! A scriptable in-memory box for the tests of this crate.

use crate::session::Connector;
use fritzbox_client::{
    boxinfo::{
        FirmwareVersion,
        Model,
        Runtime,
    },
    homeauto::{
        Powermeter,
        Switch,
        Temperature,
    },
    BoxInfo,
    ClientFuture,
    Device,
    DeviceClient,
    DeviceList,
    FritzError,
    StatusCode,
};
use std::{
    sync::{
        atomic::{
            AtomicBool,
            AtomicUsize,
            Ordering,
        },
        Arc,
        Mutex,
    },
    time::Duration,
};

/// What the fake box answers, and what it observed.
#[derive(Default)]
pub(crate) struct Script {
    pub fail_connect: AtomicBool,
    pub reject_login: AtomicBool,
    pub fail_list: AtomicBool,
    pub fail_box_info: AtomicBool,
    pub devices: Mutex<Vec<Device>>,
    pub box_info: Mutex<Option<BoxInfo>>,
    pub login_delay: Mutex<Duration>,
    pub query_delay: Mutex<Duration>,

    pub connects: AtomicUsize,
    pub logins: AtomicUsize,
    pub queries: AtomicUsize,
    pub logins_in_progress: AtomicUsize,
    /// Queries that ran while a login was in progress.
    pub overlaps: AtomicUsize,
}

impl Script {
    pub fn with_devices(devices: Vec<Device>) -> Arc<Self> {
        let script = Self::default();
        *script.devices.lock().unwrap() = devices;
        *script.box_info.lock().unwrap() = Some(box_info());
        Arc::new(script)
    }

    pub fn set_devices(&self, devices: Vec<Device>) {
        *self.devices.lock().unwrap() = devices;
    }

    async fn query_started(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.logins_in_progress.load(Ordering::SeqCst) > 0 {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        let delay = *self.query_delay.lock().unwrap();
        pause(delay).await;
    }
}

async fn pause(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}

pub(crate) struct FakeClient {
    script: Arc<Script>,
    logged_in: bool,
}

impl DeviceClient for FakeClient {
    fn login(&mut self) -> ClientFuture<'_, ()> {
        Box::pin(async move {
            self.logged_in = false;
            self.script.logins.fetch_add(1, Ordering::SeqCst);
            self.script.logins_in_progress.fetch_add(1, Ordering::SeqCst);
            let delay = *self.script.login_delay.lock().unwrap();
            pause(delay).await;
            self.script.logins_in_progress.fetch_sub(1, Ordering::SeqCst);

            if self.script.reject_login.load(Ordering::SeqCst) {
                return Err(FritzError::LoginRejected { block_time: 0 });
            }
            self.logged_in = true;
            Ok(())
        })
    }

    fn list(&self) -> ClientFuture<'_, DeviceList> {
        Box::pin(async move {
            if !self.logged_in {
                return Err(FritzError::NotLoggedIn);
            }
            self.script.query_started().await;
            if self.script.fail_list.load(Ordering::SeqCst) {
                return Err(FritzError::UnexpectedStatus {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    path: "/webservices/homeautoswitch.lua".to_string(),
                });
            }
            Ok(DeviceList {
                devices: self.script.devices.lock().unwrap().clone(),
            })
        })
    }

    fn box_info(&self) -> ClientFuture<'_, BoxInfo> {
        Box::pin(async move {
            if !self.logged_in {
                return Err(FritzError::NotLoggedIn);
            }
            self.script.query_started().await;
            if self.script.fail_box_info.load(Ordering::SeqCst) {
                return Err(FritzError::MalformedBoxInfo("Login required".to_string()));
            }
            self.script
                .box_info
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| FritzError::MalformedBoxInfo(String::new()))
        })
    }
}

pub(crate) struct FakeConnector {
    script: Arc<Script>,
}

impl FakeConnector {
    pub fn new(script: Arc<Script>) -> Self {
        Self { script }
    }
}

impl Connector for FakeConnector {
    fn connect(&self) -> Result<Box<dyn DeviceClient>, FritzError> {
        self.script.connects.fetch_add(1, Ordering::SeqCst);
        if self.script.fail_connect.load(Ordering::SeqCst) {
            return Err(FritzError::MalformedBoxInfo("unreachable".to_string()));
        }
        Ok(Box::new(FakeClient {
            script: self.script.clone(),
            logged_in: false,
        }))
    }
}

/// A device without any capabilities.
pub(crate) fn device(identifier: &str, name: &str, present: bool) -> Device {
    let mut device = Device::default();
    device.identifier = identifier.to_string();
    device.name = name.to_string();
    device.productname = "FRITZ!DECT 200".to_string();
    device.present = if present { "1" } else { "0" }.to_string();
    device
}

pub(crate) fn smart_plug(identifier: &str, name: &str) -> Device {
    device(identifier, name, true)
        .with_switch(Switch {
            state: "1".to_string(),
        })
        .with_powermeter(Powermeter {
            power: "1500".to_string(),
            energy: "75519".to_string(),
        })
        .with_temperature(Temperature {
            celsius: "215".to_string(),
            offset: "0".to_string(),
        })
}

pub(crate) fn box_info() -> BoxInfo {
    BoxInfo {
        model: Model {
            name: "FRITZ!Box 7590".to_string(),
            annex: "B".to_string(),
        },
        runtime: Runtime {
            hours: 23,
            days: 3,
            months: 2,
            years: 1,
            reboots: 12,
        },
        firmware: FirmwareVersion {
            image: "154".to_string(),
            os_version_major: "07".to_string(),
            os_version_minor: "12".to_string(),
            os_version_revision: "03".to_string(),
        },
        branding: "avm".to_string(),
    }
}
