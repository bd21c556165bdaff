//! # FRITZ!Box Exporter Collector
//!
//! The scrape pipeline behind `/metrics`: keeps an authenticated session to the box, runs the scrape
//! routines against it and writes their results into a Prometheus registry.
//!
//! ## Architecture
//!
//! - **`session`**: Owns the device client and re-authenticates it before every cycle
//! - **`metrics`**: The registry and the typed instruments the routines write to
//! - **`collectors`**: Self-contained scrape routines and the orchestrator running them
//!   - **`HomeAutoCollector`**: Presence and sensor readings of the smart home devices
//!   - **`BoxInfoCollector`**: Lifetime and reboot count of the box itself
//!   - **`Orchestrator`**: Serializes scrape cycles and maintains the exporter's own metrics

#[macro_use]
extern crate tracing;

pub mod collectors;
pub mod metrics;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use collectors::*;
pub use metrics::Metrics;
pub use session::{
    ConnectError,
    Connector,
    FritzConnector,
    SessionManager,
};
