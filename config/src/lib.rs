#[macro_use]
extern crate tracing;

mod args;
mod duration;
mod exporter_config;
mod fritzbox_config;

pub use args::{
    Args,
    DEFAULT_CONFIG_FILE,
};
pub use exporter_config::ExporterConfig;
use eyre::{
    eyre,
    Context as _,
    Result,
};
pub use fritzbox_config::FritzBoxConfig;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub fritzbox: FritzBoxConfig,
    pub exporter: ExporterConfig,
}

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

/// Environment overrides look like `FRITZBOX_EXPORTER__FRITZBOX__PASSWORD`.
const ENV_PREFIX: &str = "FRITZBOX_EXPORTER";

impl Config {
    /// Layers, lowest first: built-in defaults, the config file, environment, command line.
    pub fn new(args: &Args) -> Result<Self> {
        info!(path = ?args.config, "Reading configuration");

        let builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml))
            .add_source(
                config::File::from(args.config.as_path())
                    .format(config::FileFormat::Yaml)
                    .required(true),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .add_source(args.clone());

        let cfg: Self = builder
            .build()
            .and_then(|built| built.try_deserialize())
            .wrap_err_with(|| format!("Failed to load configuration from {:?}", args.config))?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fritzbox.url.trim().is_empty() {
            return Err(eyre!("fritzbox.url must not be empty"));
        }
        if self.exporter.scrape_timeout.is_zero() {
            return Err(eyre!("exporter.scrape_timeout must be greater than zero"));
        }
        if self.fritzbox.password.is_empty() {
            warn!("fritzbox.password is empty, the login will most likely be rejected");
        }
        Ok(())
    }
}
