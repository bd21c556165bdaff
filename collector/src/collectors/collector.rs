use crate::metrics::Metrics;
use fritzbox_client::{
    DeviceClient,
    FritzError,
};
use std::{
    future::Future,
    pin::Pin,
};

pub type CollectFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ScrapeError>> + Send + 'a>>;

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Query to the FRITZ!Box failed: {0}")]
    Query(#[from] FritzError),
}

/// One scrape routine run by the orchestrator on every cycle.
pub trait Collector: Send {
    /// Used as the `collector` label of the scrape error counter.
    fn name(&self) -> &'static str;

    /// Query the box and write the results. Nothing is written when the query itself fails.
    fn collect<'a>(&'a mut self, client: &'a dyn DeviceClient, metrics: &'a Metrics) -> CollectFuture<'a>;
}
