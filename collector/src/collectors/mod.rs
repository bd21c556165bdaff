//! # Collectors Module
//!
//! - **`Collector` trait**: One scrape routine, run once per cycle against an authenticated client
//! - **`HomeAutoCollector`**: Smart home device inventory (presence, temperature, switch, power, energy)
//! - **`BoxInfoCollector`**: Lifetime and reboots of the box
//! - **`Orchestrator`**: Serializes cycles, authenticates, runs every routine and keeps the exporter's own
//!   health metrics up to date
//!
//! Routines are independent. A failing routine is counted and logged, the others still run.

pub mod boxinfo_collector;
pub mod collector;
pub mod homeauto_collector;
pub mod orchestrator;

pub use boxinfo_collector::BoxInfoCollector;
pub use collector::{
    CollectFuture,
    Collector,
    ScrapeError,
};
pub use homeauto_collector::{
    DeviceSample,
    FieldParseError,
    HomeAutoCollector,
};
pub use orchestrator::{
    CollectionOutcome,
    Orchestrator,
    OrchestratorOptions,
};
