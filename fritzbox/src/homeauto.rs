//! Smart home devices as reported by `getdevicelistinfos`.

use crate::error::Result;
use serde::Deserialize;

pub(crate) const HOMEAUTO_PATH: &str = "/webservices/homeautoswitch.lua";

const POWER_METER_BIT: u32 = 1 << 7;
const TEMPERATURE_SENSOR_BIT: u32 = 1 << 8;
const SWITCH_BIT: u32 = 1 << 9;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceList {
    #[serde(rename = "device", default)]
    pub devices: Vec<Device>,
}

impl DeviceList {
    pub(crate) fn parse(xml: &str) -> Result<Self> {
        Ok(quick_xml::de::from_str(xml)?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Device {
    /// AIN of the device, unique within one device list.
    #[serde(rename = "@identifier")]
    pub identifier: String,
    #[serde(rename = "@productname", default)]
    pub productname: String,
    #[serde(rename = "@functionbitmask", default)]
    pub functionbitmask: u32,
    #[serde(default)]
    pub name: String,
    /// `1` when the device is connected to the box.
    #[serde(default)]
    pub present: String,
    #[serde(rename = "switch", default)]
    switch_element: Option<Switch>,
    #[serde(rename = "powermeter", default)]
    powermeter_element: Option<Powermeter>,
    #[serde(rename = "temperature", default)]
    temperature_element: Option<Temperature>,
}

impl Device {
    pub fn is_present(&self) -> bool {
        self.present.trim() == "1"
    }

    pub fn is_switch(&self) -> bool {
        self.functionbitmask & SWITCH_BIT != 0
    }

    pub fn can_measure_power(&self) -> bool {
        self.functionbitmask & POWER_METER_BIT != 0
    }

    pub fn can_measure_temperature(&self) -> bool {
        self.functionbitmask & TEMPERATURE_SENSOR_BIT != 0
    }

    pub fn switch(&self) -> Option<&Switch> {
        self.switch_element.as_ref().filter(|_| self.is_switch())
    }

    pub fn powermeter(&self) -> Option<&Powermeter> {
        self.powermeter_element.as_ref().filter(|_| self.can_measure_power())
    }

    pub fn temperature(&self) -> Option<&Temperature> {
        self.temperature_element.as_ref().filter(|_| self.can_measure_temperature())
    }

    #[cfg(feature = "test-util")]
    pub fn with_switch(mut self, switch: Switch) -> Self {
        self.functionbitmask |= SWITCH_BIT;
        self.switch_element = Some(switch);
        self
    }

    #[cfg(feature = "test-util")]
    pub fn with_powermeter(mut self, powermeter: Powermeter) -> Self {
        self.functionbitmask |= POWER_METER_BIT;
        self.powermeter_element = Some(powermeter);
        self
    }

    #[cfg(feature = "test-util")]
    pub fn with_temperature(mut self, temperature: Temperature) -> Self {
        self.functionbitmask |= TEMPERATURE_SENSOR_BIT;
        self.temperature_element = Some(temperature);
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Switch {
    /// `0` or `1`, empty while unknown.
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Powermeter {
    /// Current power in mW.
    #[serde(default)]
    pub power: String,
    /// Energy in Wh since the device was first put into operation.
    #[serde(default)]
    pub energy: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Temperature {
    /// Tenths of a degree Celsius, offset already applied.
    #[serde(default)]
    pub celsius: String,
    #[serde(default)]
    pub offset: String,
}

impl Temperature {
    /// Degrees Celsius with one decimal, e.g. `"21.5"`. Empty if the box reported garbage.
    pub fn fmt_celsius(&self) -> String {
        match self.celsius.trim().parse::<f64>() {
            Ok(tenths) => format!("{:.1}", tenths * 0.1),
            Err(_) => String::new(),
        }
    }
}
