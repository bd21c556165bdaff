#[macro_use]
extern crate tracing;

mod logging;

pub use fritzbox_exporter_config::{
    Args,
    Config,
};
pub use logging::init_logging;

use eyre::{
    Context as _,
    Result,
};
use fritzbox_client::ConnectionOptions;
use fritzbox_exporter_collector::{
    BoxInfoCollector,
    Collector,
    FritzConnector,
    HomeAutoCollector,
    Metrics,
    Orchestrator,
    OrchestratorOptions,
};
use fritzbox_exporter_config::{
    ExporterConfig,
    FritzBoxConfig,
};
use fritzbox_exporter_http::create_router;
use std::sync::Arc;
use tokio::net::TcpListener;

pub fn connection_options(config: &FritzBoxConfig) -> ConnectionOptions {
    ConnectionOptions {
        url: config.url.clone(),
        username: config.username.clone(),
        password: config.password.clone(),
        skip_tls_verify: config.skip_tls_verify,
        request_timeout: config.request_timeout,
    }
}

pub fn orchestrator_options(config: &ExporterConfig) -> OrchestratorOptions {
    OrchestratorOptions {
        scrape_timeout: config.scrape_timeout,
        min_scrape_interval: config.min_scrape_interval,
    }
}

/// Wire the scrape pipeline to a fresh registry. Nothing talks to the box before the first scrape.
pub fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let metrics = Arc::new(Metrics::new().wrap_err("Failed to register the metrics")?);
    let collectors: Vec<Box<dyn Collector>> = vec![
        Box::new(HomeAutoCollector::new(config.exporter.prune_stale_devices)),
        Box::new(BoxInfoCollector::new()),
    ];

    Ok(Orchestrator::new(
        Box::new(FritzConnector::new(connection_options(&config.fritzbox))),
        collectors,
        metrics,
        orchestrator_options(&config.exporter),
    ))
}

/// Serve `/metrics` until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    let orchestrator = build_orchestrator(&config)?;
    let app = create_router(Arc::new(orchestrator));

    let address = config.exporter.listen_address;
    let listener = TcpListener::bind(address)
        .await
        .wrap_err_with(|| format!("Failed to listen on {address}"))?;
    info!(%address, fritzbox = %config.fritzbox.url, "Exporter listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server failed")?;
    info!("Exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(err) => {
            error!("Cannot listen for Ctrl-C, running until killed: {err}");
            std::future::pending::<()>().await;
        }
    }
}
