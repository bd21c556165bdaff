//! Durations in the config file use humantime syntax, e.g. `5s` or `1m 30s`.

use serde::{
    de::Error as _,
    Deserialize,
    Deserializer,
};
use std::time::Duration;

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(raw.trim()).map_err(|e| D::Error::custom(format!("invalid duration {raw:?}: {e}")))
}
