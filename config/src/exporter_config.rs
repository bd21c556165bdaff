use serde::Deserialize;
use std::{
    net::SocketAddr,
    time::Duration,
};

#[derive(Clone, Debug, Deserialize)]
pub struct ExporterConfig {
    /// Address the `/metrics` endpoint binds to.
    pub listen_address: SocketAddr,
    /// Upper bound for one collection cycle. A cycle running longer counts as failed.
    #[serde(deserialize_with = "crate::duration::deserialize")]
    pub scrape_timeout: Duration,
    /// Requests arriving sooner than this after the last completed cycle are served from the registry as is.
    /// Zero disables throttling.
    #[serde(deserialize_with = "crate::duration::deserialize")]
    pub min_scrape_interval: Duration,
    /// Drop device series that disappeared from the device list since the previous scrape.
    pub prune_stale_devices: bool,
}
